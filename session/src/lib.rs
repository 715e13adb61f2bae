#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative puzzle session that sequences selection, slides, finish
//! bookkeeping and scoring for a single level.

mod grid;
mod level;
mod tiles;

use blockslide_core::{
    BlockId, BlockSnapshot, BlockView, CellCoord, Command, Direction, Event, LevelDefinition,
    LossReason, MoveRejection, SelectionRejection, SessionState,
};
use blockslide_system_finish::{Config as FinishConfig, FinishTracker};
use blockslide_system_resolver::{resolve, Halt, SlideEvent, SlideRequest, SlideRules};
use blockslide_system_scoring::Scoring;
use tracing::{debug, info, warn};

use crate::{grid::Grid, tiles::TileRegistry};

pub use level::{LevelError, Subject};

/// Gameplay switches that are not part of the level definition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    lock_finished_blocks: bool,
    hidden_invisibility_passable: bool,
}

impl Config {
    /// Creates the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lock_finished_blocks: false,
            hidden_invisibility_passable: false,
        }
    }

    /// Makes blocks uncontrollable once they first reach a finish cell.
    #[must_use]
    pub const fn with_lock_finished_blocks(mut self, enabled: bool) -> Self {
        self.lock_finished_blocks = enabled;
        self
    }

    /// Lets blocks slide through invisibility tiles while they are hidden.
    #[must_use]
    pub const fn with_hidden_invisibility_passable(mut self, enabled: bool) -> Self {
        self.hidden_invisibility_passable = enabled;
        self
    }

    /// Reports whether finished blocks become uncontrollable.
    #[must_use]
    pub const fn lock_finished_blocks(&self) -> bool {
        self.lock_finished_blocks
    }

    /// Reports whether hidden invisibility tiles can be crossed.
    #[must_use]
    pub const fn hidden_invisibility_passable(&self) -> bool {
        self.hidden_invisibility_passable
    }
}

#[derive(Clone, Debug)]
struct Block {
    id: BlockId,
    cell: CellCoord,
    finish: CellCoord,
    extra_finishes: Vec<CellCoord>,
    universal: bool,
    collide_with_walls: bool,
    collide_with_blocks: bool,
    controllable: bool,
    speed: f32,
}

/// Represents one play-through of a level.
#[derive(Debug)]
pub struct Session {
    level: LevelDefinition,
    config: Config,
    grid: Grid,
    tiles: TileRegistry,
    blocks: Vec<Block>,
    selected: usize,
    state: SessionState,
    breaker_armed: bool,
    finish: FinishTracker,
    scoring: Scoring,
}

impl Session {
    /// Validates the level and prepares a fresh session.
    ///
    /// Blocks that start on an accepted finish cell count as finished right
    /// away. A level whose blocks are all finished before the first move is
    /// rejected.
    pub fn new(level: LevelDefinition, config: Config) -> Result<Self, LevelError> {
        level::validate(&level)?;
        let session = Self::build(level, config);
        if session.finish.all_finished() {
            return Err(LevelError::AlreadySolved);
        }
        Ok(session)
    }

    /// Discards all progress and starts the stored level over.
    pub fn restart(&mut self) {
        info!(level = %self.level.name, "restarting level");
        *self = Self::build(self.level.clone(), self.config);
    }

    /// Selects the block at `index`, clamped to the valid range.
    ///
    /// Returns `false` and reports [`Event::SelectionRejected`] unless the
    /// session is idle.
    pub fn select_block(&mut self, index: usize, out: &mut Vec<Event>) -> bool {
        if let Some(reason) = self.selection_rejection() {
            out.push(Event::SelectionRejected { index, reason });
            return false;
        }

        let clamped = index.min(self.blocks.len().saturating_sub(1));
        let Some(block) = self.blocks.get(clamped) else {
            return false;
        };
        self.selected = clamped;
        out.push(Event::BlockSelected { block: block.id });
        true
    }

    /// Slides the selected block in `direction`.
    ///
    /// Returns `true` when the request was accepted, including moves that
    /// resolve back to the starting cell and are discarded.
    pub fn attempt_move(&mut self, direction: Direction, out: &mut Vec<Event>) -> bool {
        let Some(block) = self.blocks.get(self.selected) else {
            return false;
        };
        let id = block.id;

        if let Some(reason) = self.move_rejection(block) {
            debug!(block = id.get(), ?direction, ?reason, "move rejected");
            out.push(Event::MoveRejected {
                block: id,
                direction,
                reason,
            });
            return false;
        }

        let request = SlideRequest {
            block: id,
            start: block.cell,
            direction,
            collide_with_walls: block.collide_with_walls,
            collide_with_blocks: block.collide_with_blocks,
        };
        self.state = SessionState::Resolving;
        let rules = SlideRules {
            breaker_armed: self.breaker_armed,
            hidden_invisibility_passable: self.config.hidden_invisibility_passable,
        };
        let resolved = resolve(request, self.grid.view(), self.tiles.view(), rules);

        if resolved.halt == Halt::LoopGuard {
            warn!(
                block = id.get(),
                ?direction,
                cell = ?resolved.final_cell,
                "slide exceeded the step budget and was cut short"
            );
        }

        if resolved.is_noop() {
            debug!(block = id.get(), ?direction, halt = ?resolved.halt, "move blocked");
            out.push(Event::MoveBlocked {
                block: id,
                direction,
            });
            self.state = SessionState::Idle;
            return true;
        }

        debug!(
            block = id.get(),
            ?direction,
            from = ?resolved.start,
            to = ?resolved.final_cell,
            halt = ?resolved.halt,
            "move resolved"
        );

        self.grid.relocate(id, resolved.start, resolved.final_cell);
        if let Some(block) = self.blocks.get_mut(self.selected) {
            block.cell = resolved.final_cell;
        }
        self.breaker_armed = resolved.breaker_armed;

        out.push(Event::BlockSlid {
            block: id,
            from: resolved.start,
            to: resolved.final_cell,
            path: resolved.path.clone(),
        });
        for event in &resolved.events {
            if let Some(event) = translate(id, event) {
                out.push(event);
            }
        }

        let applied = self.scoring.applied_moves().saturating_add(1);
        self.tiles
            .advance_invisibility_tiles(direction, applied, self.grid.view(), out);
        self.scoring.record_move(out);
        self.evaluate_finish(out);

        let outcome = if resolved.pit_fall().is_some() {
            Some(Outcome::Lost(LossReason::PitFall))
        } else if self.finish.all_finished() {
            Some(Outcome::Won)
        } else if self.scoring.is_exhausted() {
            Some(Outcome::Lost(LossReason::MovesExhausted))
        } else {
            None
        };

        match outcome {
            Some(Outcome::Won) => {
                self.state = SessionState::Won;
                let applied_moves = self.scoring.applied_moves();
                let rating = self.scoring.rating();
                info!(level = %self.level.name, applied_moves, ?rating, "level won");
                out.push(Event::SessionStateChanged {
                    state: SessionState::Won,
                });
                out.push(Event::LevelWon {
                    applied_moves,
                    rating,
                });
            }
            Some(Outcome::Lost(reason)) => {
                self.state = SessionState::Lost;
                info!(level = %self.level.name, ?reason, "level lost");
                out.push(Event::SessionStateChanged {
                    state: SessionState::Lost,
                });
                out.push(Event::LevelLost { reason });
            }
            None => self.state = SessionState::Idle,
        }

        true
    }

    fn build(level: LevelDefinition, config: Config) -> Self {
        let mut grid = Grid::new(level.width, level.height, &level.walls);
        let blocks: Vec<Block> = level
            .blocks
            .iter()
            .enumerate()
            .map(|(index, definition)| Block {
                id: BlockId::new(u32::try_from(index).unwrap_or(u32::MAX)),
                cell: definition.start,
                finish: definition.finish,
                extra_finishes: definition.extra_finishes.clone(),
                universal: definition.universal,
                collide_with_walls: definition.collide_with_walls,
                collide_with_blocks: definition.collide_with_blocks,
                controllable: definition.controllable,
                speed: definition.speed,
            })
            .collect();
        for block in &blocks {
            grid.set_occupied(block.cell, Some(block.id));
        }

        let mut session = Self {
            tiles: TileRegistry::from_definitions(&level.tiles),
            finish: FinishTracker::new(FinishConfig::new(config.lock_finished_blocks)),
            scoring: Scoring::new(level.moves, level.stars),
            level,
            config,
            grid,
            blocks,
            selected: 0,
            state: SessionState::Idle,
            breaker_armed: false,
        };

        let mut initial = Vec::new();
        session.evaluate_finish(&mut initial);
        debug!(
            level = %session.level.name,
            blocks = session.blocks.len(),
            unfinished = session.finish.unfinished_count(),
            "session prepared"
        );
        session
    }

    fn evaluate_finish(&mut self, out: &mut Vec<Event>) {
        let start = out.len();
        self.finish.evaluate(&self.block_view(), out);

        for event in &out[start..] {
            if let Event::BlockLocked { block } = event {
                if let Some(entry) = self.blocks.iter_mut().find(|entry| entry.id == *block) {
                    entry.controllable = false;
                }
            }
        }
    }

    fn block_view(&self) -> BlockView {
        BlockView::from_snapshots(
            self.blocks
                .iter()
                .map(|block| BlockSnapshot {
                    id: block.id,
                    cell: block.cell,
                    finish: block.finish,
                    extra_finishes: block.extra_finishes.clone(),
                    universal: block.universal,
                    collide_with_walls: block.collide_with_walls,
                    collide_with_blocks: block.collide_with_blocks,
                    finished: self.finish.is_finished(block.id),
                    controllable: block.controllable,
                    speed: block.speed,
                })
                .collect(),
        )
    }

    fn selection_rejection(&self) -> Option<SelectionRejection> {
        match self.state {
            SessionState::Idle => None,
            SessionState::Resolving => Some(SelectionRejection::Busy),
            SessionState::Won | SessionState::Lost => Some(SelectionRejection::SessionOver),
        }
    }

    fn move_rejection(&self, block: &Block) -> Option<MoveRejection> {
        match self.state {
            SessionState::Idle if block.controllable => None,
            SessionState::Idle => Some(MoveRejection::NotControllable),
            SessionState::Resolving => Some(MoveRejection::Busy),
            SessionState::Won | SessionState::Lost => Some(MoveRejection::SessionOver),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Outcome {
    Won,
    Lost(LossReason),
}

fn translate(block: BlockId, event: &SlideEvent) -> Option<Event> {
    match *event {
        SlideEvent::Teleported { tile, entry, exit } => Some(Event::TeleportTraversed {
            block,
            tile,
            entry,
            exit,
        }),
        SlideEvent::BreakerArmed { cell, .. } => Some(Event::BreakerArmed { block, cell }),
        SlideEvent::BreakerPassed { cell, .. } => Some(Event::BreakerPassed { block, cell }),
        SlideEvent::PitFall { cell, .. } => Some(Event::PitFall { block, cell }),
        SlideEvent::LoopGuardTripped { .. } => None,
    }
}

/// Applies the provided command to the session, reporting every change.
pub fn apply(session: &mut Session, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SelectBlock { index } => {
            let _ = session.select_block(index, out_events);
        }
        Command::AttemptMove { direction } => {
            let _ = session.attempt_move(direction, out_events);
        }
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use blockslide_core::{
        BlockId, BlockView, CellCoord, GridView, LevelDefinition, SessionState, StarRating,
        TileSnapshot, TileView,
    };

    use super::{Config, Session};

    /// Current session state.
    #[must_use]
    pub fn state(session: &Session) -> SessionState {
        session.state
    }

    /// Level definition the session was built from.
    #[must_use]
    pub fn level(session: &Session) -> &LevelDefinition {
        &session.level
    }

    /// Display name of the level.
    #[must_use]
    pub fn level_name(session: &Session) -> &str {
        &session.level.name
    }

    /// Gameplay switches in effect.
    #[must_use]
    pub fn config(session: &Session) -> Config {
        session.config
    }

    /// Index of the selected block.
    #[must_use]
    pub fn selected_index(session: &Session) -> usize {
        session.selected
    }

    /// Identifier of the selected block.
    #[must_use]
    pub fn selected_block(session: &Session) -> Option<BlockId> {
        session.blocks.get(session.selected).map(|block| block.id)
    }

    /// Captures a read-only view of every block.
    #[must_use]
    pub fn block_view(session: &Session) -> BlockView {
        session.block_view()
    }

    /// Captures a read-only view of every special tile.
    #[must_use]
    pub fn tile_view(session: &Session) -> TileView<'_> {
        session.tiles.view()
    }

    /// Every special tile in identifier order, active or not.
    #[must_use]
    pub fn tile_snapshots(session: &Session) -> &[TileSnapshot] {
        session.tiles.snapshots()
    }

    /// Returns the highest-precedence active tile covering the cell.
    #[must_use]
    pub fn tile_at(session: &Session, cell: CellCoord) -> Option<&TileSnapshot> {
        session.tiles.tile_at(cell)
    }

    /// Exposes a read-only view of the wall and block layers.
    #[must_use]
    pub fn grid_view(session: &Session) -> GridView<'_> {
        session.grid.view()
    }

    /// Moves remaining in the budget.
    #[must_use]
    pub fn moves_left(session: &Session) -> u32 {
        session.scoring.moves_left()
    }

    /// Moves applied since the level started.
    #[must_use]
    pub fn applied_moves(session: &Session) -> u32 {
        session.scoring.applied_moves()
    }

    /// Current star rating.
    #[must_use]
    pub fn star_rating(session: &Session) -> StarRating {
        session.scoring.rating()
    }

    /// Number of blocks that do not rest on an accepted finish cell.
    #[must_use]
    pub fn unfinished_count(session: &Session) -> usize {
        session.finish.unfinished_count()
    }

    /// Number of blocks resting on an accepted finish cell.
    #[must_use]
    pub fn finished_count(session: &Session) -> usize {
        session.finish.finished_count()
    }

    /// Reports whether the next breaker crossed lets the block through.
    #[must_use]
    pub fn breaker_armed(session: &Session) -> bool {
        session.breaker_armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockslide_core::BlockDefinition;

    fn two_block_level() -> LevelDefinition {
        LevelDefinition::new(6, 6, 5)
            .with_block(BlockDefinition::new(CellCoord::new(1, 1), CellCoord::new(4, 4)))
            .with_block(BlockDefinition::new(CellCoord::new(4, 1), CellCoord::new(1, 4)))
    }

    #[test]
    fn config_setters_compose() {
        let config = Config::new()
            .with_lock_finished_blocks(true)
            .with_hidden_invisibility_passable(true);
        assert!(config.lock_finished_blocks());
        assert!(config.hidden_invisibility_passable());
        assert_eq!(Config::default(), Config::new());
    }

    #[test]
    fn grid_tracks_block_positions_after_moves() {
        let mut session = Session::new(two_block_level(), Config::new()).expect("valid level");
        let mut events = Vec::new();

        assert!(session.attempt_move(Direction::Right, &mut events));

        let grid = query::grid_view(&session);
        assert_eq!(grid.occupant(CellCoord::new(3, 1)), Some(BlockId::new(0)));
        assert_eq!(grid.occupant(CellCoord::new(1, 1)), None);
        assert_eq!(grid.occupant(CellCoord::new(4, 1)), Some(BlockId::new(1)));
    }

    #[test]
    fn restart_restores_the_initial_layout() {
        let mut session = Session::new(two_block_level(), Config::new()).expect("valid level");
        let mut events = Vec::new();
        assert!(session.select_block(1, &mut events));
        assert!(session.attempt_move(Direction::Up, &mut events));

        session.restart();

        assert_eq!(query::applied_moves(&session), 0);
        assert_eq!(query::selected_index(&session), 0);
        let view = query::block_view(&session);
        assert_eq!(
            view.get(BlockId::new(1)).map(|block| block.cell),
            Some(CellCoord::new(4, 1))
        );
    }
}
