use blockslide_core::{
    BlockId, CellCoord, Direction, GridView, TileId, TileKind, TileSnapshot, TileView,
};
use blockslide_system_resolver::{
    resolve, Halt, ResolvedPath, SlideEvent, SlideRequest, SlideRules,
};

struct Fixture {
    columns: u32,
    rows: u32,
    walls: Vec<bool>,
    occupants: Vec<Option<BlockId>>,
    tiles: Vec<TileSnapshot>,
}

impl Fixture {
    fn bordered(columns: u32, rows: u32) -> Self {
        let mut walls = Vec::new();
        for row in 0..rows {
            for column in 0..columns {
                walls.push(row == 0 || column == 0 || row == rows - 1 || column == columns - 1);
            }
        }
        Self {
            columns,
            rows,
            occupants: vec![None; walls.len()],
            walls,
            tiles: Vec::new(),
        }
    }

    fn index(&self, cell: CellCoord) -> usize {
        (cell.row() * self.columns + cell.column()) as usize
    }

    fn wall(mut self, cell: CellCoord) -> Self {
        let index = self.index(cell);
        self.walls[index] = true;
        self
    }

    fn block(mut self, id: u32, cell: CellCoord) -> Self {
        let index = self.index(cell);
        self.occupants[index] = Some(BlockId::new(id));
        self
    }

    fn tile(mut self, kind: TileKind, cell: CellCoord, pair: Option<CellCoord>) -> Self {
        let id = TileId::new(self.tiles.len() as u32);
        self.tiles.push(TileSnapshot {
            id,
            kind,
            cell,
            pair,
            active: true,
            visible: true,
            symmetric: false,
            period: 0,
        });
        self
    }

    fn slide(&self, id: u32, direction: Direction, rules: SlideRules) -> ResolvedPath {
        self.slide_with(id, direction, true, true, rules)
    }

    fn slide_with(
        &self,
        id: u32,
        direction: Direction,
        collide_with_walls: bool,
        collide_with_blocks: bool,
        rules: SlideRules,
    ) -> ResolvedPath {
        let block = BlockId::new(id);
        let index = self
            .occupants
            .iter()
            .position(|occupant| *occupant == Some(block))
            .expect("block placed in fixture");
        let start = CellCoord::new(index as u32 % self.columns, index as u32 / self.columns);
        resolve(
            SlideRequest {
                block,
                start,
                direction,
                collide_with_walls,
                collide_with_blocks,
            },
            GridView::new(&self.walls, &self.occupants, self.columns, self.rows),
            TileView::new(&self.tiles),
            rules,
        )
    }
}

#[test]
fn unobstructed_slides_stop_beside_the_border() {
    let fixture = Fixture::bordered(7, 6).block(0, CellCoord::new(3, 2));
    let expectations = [
        (Direction::Up, CellCoord::new(3, 4)),
        (Direction::Down, CellCoord::new(3, 1)),
        (Direction::Left, CellCoord::new(1, 2)),
        (Direction::Right, CellCoord::new(5, 2)),
    ];

    for (direction, expected) in expectations {
        let resolved = fixture.slide(0, direction, SlideRules::default());
        assert_eq!(resolved.final_cell, expected, "sliding {direction:?}");
        assert_eq!(resolved.halt, Halt::Wall);
        assert!(resolved.events.is_empty());
    }
}

#[test]
fn adjacent_wall_produces_noop() {
    let fixture = Fixture::bordered(6, 6)
        .wall(CellCoord::new(3, 2))
        .block(0, CellCoord::new(2, 2));

    let resolved = fixture.slide(0, Direction::Right, SlideRules::default());

    assert!(resolved.is_noop());
    assert!(resolved.path.is_empty());
    assert_eq!(resolved.halt, Halt::Wall);
}

#[test]
fn blocks_stop_against_other_blocks() {
    let fixture = Fixture::bordered(8, 5)
        .block(0, CellCoord::new(1, 2))
        .block(1, CellCoord::new(5, 2));

    let resolved = fixture.slide(0, Direction::Right, SlideRules::default());

    assert_eq!(resolved.final_cell, CellCoord::new(4, 2));
    assert_eq!(resolved.halt, Halt::Block(BlockId::new(1)));
    assert_eq!(
        resolved.path,
        vec![
            CellCoord::new(2, 2),
            CellCoord::new(3, 2),
            CellCoord::new(4, 2)
        ]
    );
}

#[test]
fn pass_through_block_never_rests_on_another_block() {
    let fixture = Fixture::bordered(6, 5)
        .block(0, CellCoord::new(2, 2))
        .block(1, CellCoord::new(4, 2));

    let resolved = fixture.slide_with(0, Direction::Right, true, false, SlideRules::default());

    assert_eq!(resolved.final_cell, CellCoord::new(3, 2));
    assert_eq!(resolved.path, vec![CellCoord::new(3, 2)]);
}

#[test]
fn pass_through_block_adjacent_to_border_is_noop() {
    let fixture = Fixture::bordered(5, 5)
        .block(0, CellCoord::new(2, 2))
        .block(1, CellCoord::new(3, 2));

    let resolved = fixture.slide_with(0, Direction::Right, true, false, SlideRules::default());

    assert!(resolved.is_noop());
}

#[test]
fn wall_passing_block_stops_at_level_edge() {
    let fixture = Fixture::bordered(5, 5).block(0, CellCoord::new(2, 2));

    let resolved = fixture.slide_with(0, Direction::Left, false, true, SlideRules::default());

    assert_eq!(resolved.final_cell, CellCoord::new(0, 2));
    assert_eq!(resolved.halt, Halt::OutOfBounds);
}

#[test]
fn stopper_halts_exactly_on_the_tile() {
    let fixture = Fixture::bordered(6, 6)
        .block(0, CellCoord::new(1, 1))
        .tile(TileKind::Stopper, CellCoord::new(3, 1), None);

    let resolved = fixture.slide(0, Direction::Right, SlideRules::default());

    assert_eq!(resolved.final_cell, CellCoord::new(3, 1));
    assert_eq!(resolved.halt, Halt::Stopper(TileId::new(0)));
}

#[test]
fn teleport_continues_sliding_from_paired_cell() {
    let fixture = Fixture::bordered(9, 7)
        .block(0, CellCoord::new(1, 1))
        .tile(
            TileKind::Teleport,
            CellCoord::new(3, 1),
            Some(CellCoord::new(3, 4)),
        );

    let resolved = fixture.slide(0, Direction::Right, SlideRules::default());

    assert_eq!(resolved.final_cell, CellCoord::new(7, 4));
    assert_eq!(
        resolved.events,
        vec![SlideEvent::Teleported {
            tile: TileId::new(0),
            entry: CellCoord::new(3, 1),
            exit: CellCoord::new(3, 4),
        }]
    );
    assert_eq!(resolved.path[0], CellCoord::new(2, 1));
    assert_eq!(resolved.path[1], CellCoord::new(3, 1));
    assert_eq!(resolved.path[2], CellCoord::new(3, 4));
}

#[test]
fn teleport_works_in_both_directions() {
    let fixture = Fixture::bordered(9, 7)
        .block(0, CellCoord::new(7, 4))
        .tile(
            TileKind::Teleport,
            CellCoord::new(3, 1),
            Some(CellCoord::new(3, 4)),
        );

    let resolved = fixture.slide(0, Direction::Left, SlideRules::default());

    assert_eq!(resolved.final_cell, CellCoord::new(1, 1));
}

#[test]
fn teleport_exit_blocked_right_after_warp_stops_on_exit() {
    let fixture = Fixture::bordered(9, 7)
        .block(0, CellCoord::new(1, 1))
        .wall(CellCoord::new(4, 4))
        .tile(
            TileKind::Teleport,
            CellCoord::new(3, 1),
            Some(CellCoord::new(3, 4)),
        );

    let resolved = fixture.slide(0, Direction::Right, SlideRules::default());

    assert_eq!(resolved.final_cell, CellCoord::new(3, 4));
}

#[test]
fn occupied_teleport_exit_keeps_block_on_entry() {
    let fixture = Fixture::bordered(9, 7)
        .block(0, CellCoord::new(1, 1))
        .block(1, CellCoord::new(3, 4))
        .tile(
            TileKind::Teleport,
            CellCoord::new(3, 1),
            Some(CellCoord::new(3, 4)),
        );

    let resolved = fixture.slide(0, Direction::Right, SlideRules::default());

    assert_eq!(resolved.final_cell, CellCoord::new(3, 1));
    assert_eq!(resolved.halt, Halt::TeleportExitBlocked(TileId::new(0)));
    assert!(resolved.events.is_empty());
}

#[test]
fn pit_halts_the_slide_and_reports_fall() {
    let fixture = Fixture::bordered(7, 5)
        .block(0, CellCoord::new(1, 2))
        .tile(TileKind::Pit, CellCoord::new(3, 2), None);

    let resolved = fixture.slide(0, Direction::Right, SlideRules::default());

    assert_eq!(resolved.final_cell, CellCoord::new(3, 2));
    assert_eq!(resolved.pit_fall(), Some(CellCoord::new(3, 2)));
}

#[test]
fn breaker_halts_when_unarmed_and_passes_when_armed() {
    let fixture = Fixture::bordered(8, 5)
        .block(0, CellCoord::new(1, 2))
        .tile(TileKind::Breaker, CellCoord::new(3, 2), None);

    let first = fixture.slide(0, Direction::Right, SlideRules::default());
    assert_eq!(first.final_cell, CellCoord::new(3, 2));
    assert!(first.breaker_armed);

    let second = fixture.slide(
        0,
        Direction::Right,
        SlideRules {
            breaker_armed: true,
            ..SlideRules::default()
        },
    );
    assert_eq!(second.final_cell, CellCoord::new(6, 2));
    assert!(!second.breaker_armed);
    assert!(matches!(
        second.events.as_slice(),
        [SlideEvent::BreakerPassed { .. }]
    ));
}

#[test]
fn tile_precedence_prefers_stopper_over_pit() {
    let fixture = Fixture::bordered(7, 5)
        .block(0, CellCoord::new(1, 2))
        .tile(TileKind::Pit, CellCoord::new(3, 2), None)
        .tile(TileKind::Stopper, CellCoord::new(3, 2), None);

    let resolved = fixture.slide(0, Direction::Right, SlideRules::default());

    assert_eq!(resolved.halt, Halt::Stopper(TileId::new(1)));
    assert_eq!(resolved.pit_fall(), None);
}

#[test]
fn invisibility_tile_blocks_even_when_hidden() {
    let mut fixture = Fixture::bordered(7, 5)
        .block(0, CellCoord::new(1, 2))
        .tile(TileKind::Invisibility, CellCoord::new(4, 2), None);
    fixture.tiles[0].visible = false;

    let blocked = fixture.slide(0, Direction::Right, SlideRules::default());
    assert_eq!(blocked.final_cell, CellCoord::new(3, 2));
    assert_eq!(blocked.halt, Halt::InvisibilityTile(TileId::new(0)));

    let passable = fixture.slide(
        0,
        Direction::Right,
        SlideRules {
            hidden_invisibility_passable: true,
            ..SlideRules::default()
        },
    );
    assert_eq!(passable.final_cell, CellCoord::new(5, 2));
}

#[test]
fn hidden_invisibility_tile_defers_to_a_stacked_stopper() {
    let mut fixture = Fixture::bordered(7, 5)
        .block(0, CellCoord::new(1, 2))
        .tile(TileKind::Invisibility, CellCoord::new(3, 2), None)
        .tile(TileKind::Stopper, CellCoord::new(3, 2), None);
    fixture.tiles[0].visible = false;

    let resolved = fixture.slide(
        0,
        Direction::Right,
        SlideRules {
            hidden_invisibility_passable: true,
            ..SlideRules::default()
        },
    );
    assert_eq!(resolved.final_cell, CellCoord::new(3, 2));
    assert_eq!(resolved.halt, Halt::Stopper(TileId::new(1)));
}

#[test]
fn teleport_cycle_trips_loop_guard() {
    // Entering (3,2) warps back to (1,2), so sliding right never ends.
    let fixture = Fixture::bordered(7, 5)
        .block(0, CellCoord::new(2, 2))
        .tile(
            TileKind::Teleport,
            CellCoord::new(3, 2),
            Some(CellCoord::new(1, 2)),
        );

    let resolved = fixture.slide(0, Direction::Right, SlideRules::default());

    assert_eq!(resolved.halt, Halt::LoopGuard);
    assert!(matches!(
        resolved.events.last(),
        Some(SlideEvent::LoopGuardTripped { .. })
    ));
    assert!(resolved.path.len() <= 7 * 5 * 2 + 1);
}

#[test]
fn inactive_tiles_are_ignored() {
    let mut fixture = Fixture::bordered(7, 5)
        .block(0, CellCoord::new(1, 2))
        .tile(TileKind::Stopper, CellCoord::new(3, 2), None);
    fixture.tiles[0].active = false;

    let resolved = fixture.slide(0, Direction::Right, SlideRules::default());

    assert_eq!(resolved.final_cell, CellCoord::new(5, 2));
}
