//! Plain-text presentation of a session.

use blockslide_core::{BlockId, Event, LossReason, MoveRejection, SelectionRejection, TileKind};
use blockslide_rendering::{BoardPresentation, Glyph, Palette, Scene};
use blockslide_session::{query, Session};

const BLOCK_GLYPHS: &[u8] = b"123456789";
const FINISH_GLYPHS: &[u8] = b"abcdefghi";

/// Renders the board top row first, one text line per row.
pub(crate) fn board(session: &Session) -> String {
    let scene = scene(session);
    let mut text = String::new();
    for row in scene.glyph_rows() {
        text.extend(row.into_iter().map(glyph_char));
        text.push('\n');
    }
    text
}

/// Status line shown after every command.
pub(crate) fn hud(session: &Session) -> String {
    let name = query::level_name(session);
    let name = if name.is_empty() { "untitled" } else { name };
    format!(
        "LEVEL {name}  MOVE: {}  STARS: {}",
        query::moves_left(session),
        query::star_rating(session).value()
    )
}

/// One-line narration of the events a player should notice.
pub(crate) fn describe(event: &Event) -> Option<String> {
    let line = match event {
        Event::BlockSelected { block } => format!("selected block {}", label(*block)),
        Event::SelectionRejected { reason, .. } => match reason {
            SelectionRejection::Busy => "selection ignored while a move resolves".to_owned(),
            SelectionRejection::SessionOver => "the level is over".to_owned(),
        },
        Event::MoveRejected { block, reason, .. } => match reason {
            MoveRejection::NotControllable => format!("block {} is locked", label(*block)),
            MoveRejection::Busy => "move ignored while another resolves".to_owned(),
            MoveRejection::SessionOver => "the level is over".to_owned(),
        },
        Event::MoveBlocked { block, direction } => {
            format!("block {} cannot move {direction:?}", label(*block))
        }
        Event::TeleportTraversed { block, .. } => {
            format!("block {} went through a teleport", label(*block))
        }
        Event::PitFall { block, .. } => format!("block {} fell into a pit", label(*block)),
        Event::BlockFinished { block } => format!("block {} is home", label(*block)),
        Event::BlockLocked { block } => format!("block {} locked in place", label(*block)),
        Event::LevelWon {
            applied_moves,
            rating,
        } => format!(
            "solved in {applied_moves} moves, {} stars",
            rating.value().max(0)
        ),
        Event::LevelLost { reason } => match reason {
            LossReason::PitFall => "level lost, type restart to try again".to_owned(),
            LossReason::MovesExhausted => "out of moves, type restart to try again".to_owned(),
        },
        _ => return None,
    };
    Some(line)
}

fn scene(session: &Session) -> Scene {
    let level = query::level(session);
    let board = BoardPresentation {
        columns: level.width,
        rows: level.height,
        cell_length: 1.0,
        chess_background: false,
    };
    Scene::from_snapshots(
        board,
        query::grid_view(session),
        &query::block_view(session),
        query::tile_view(session),
        query::selected_block(session),
        &Palette::default(),
    )
}

fn label(block: BlockId) -> u32 {
    block.get() + 1
}

fn indexed_glyph(table: &[u8], block: BlockId, fallback: char) -> char {
    usize::try_from(block.get())
        .ok()
        .and_then(|index| table.get(index))
        .map_or(fallback, |byte| char::from(*byte))
}

fn glyph_char(glyph: Glyph) -> char {
    match glyph {
        Glyph::Floor => '.',
        Glyph::Wall => '#',
        Glyph::Finish(block) => indexed_glyph(FINISH_GLYPHS, block, 'x'),
        Glyph::Block(block) => indexed_glyph(BLOCK_GLYPHS, block, '*'),
        Glyph::Tile(kind) => match kind {
            TileKind::Teleport => '@',
            TileKind::Pit => 'O',
            TileKind::Stopper => '+',
            TileKind::Breaker => '%',
            TileKind::Invisibility => '?',
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockslide_core::{BlockDefinition, CellCoord, LevelDefinition, StarRating, TileDefinition};
    use blockslide_session::Config;

    fn session() -> Session {
        let level = LevelDefinition::new(5, 4, 7)
            .with_name("tiny")
            .with_block(BlockDefinition::new(CellCoord::new(1, 1), CellCoord::new(3, 2)))
            .with_tile(TileDefinition::new(TileKind::Pit, CellCoord::new(2, 2)));
        Session::new(level, Config::new()).expect("valid level")
    }

    #[test]
    fn board_prints_top_row_first() {
        assert_eq!(board(&session()), "#####\n#.Oa#\n#1..#\n#####\n");
    }

    #[test]
    fn hud_reports_moves_and_stars() {
        assert_eq!(hud(&session()), "LEVEL tiny  MOVE: 7  STARS: -1");
    }

    #[test]
    fn notable_events_are_described() {
        assert_eq!(
            describe(&Event::LevelWon {
                applied_moves: 4,
                rating: StarRating::Two
            }),
            Some("solved in 4 moves, 2 stars".to_owned())
        );
        assert_eq!(
            describe(&Event::MovesChanged {
                applied: 1,
                left: 2
            }),
            None
        );
    }
}
