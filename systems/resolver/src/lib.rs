#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure movement-resolution system that computes where a sliding block comes to rest.
//!
//! The resolver never mutates anything. It walks the [`GridView`] and
//! [`TileView`] snapshots from the block's cell in a single direction and
//! reports the resting cell, every cell visited on the way, and the tile
//! interactions that happened. The session decides whether to commit it.

use blockslide_core::{
    BlockId, CellCoord, CellState, Direction, GridView, SlideBehaviour, TileId, TileView,
};

/// Describes the block that is about to slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlideRequest {
    /// Block that slides.
    pub block: BlockId,
    /// Cell the block rests on before the slide.
    pub start: CellCoord,
    /// Direction of travel.
    pub direction: Direction,
    /// Whether walls stop the block.
    pub collide_with_walls: bool,
    /// Whether other blocks stop the block.
    pub collide_with_blocks: bool,
}

/// Session-owned switches that influence resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlideRules {
    /// Shared breaker toggle. When set, the next breaker entered lets the block pass.
    pub breaker_armed: bool,
    /// Lets blocks pass invisibility tiles while the tiles are hidden.
    pub hidden_invisibility_passable: bool,
}

/// Reason a slide came to an end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Halt {
    /// The next cell lies outside the level.
    OutOfBounds,
    /// The next cell is a wall and the block collides with walls.
    Wall,
    /// The next cell holds a block and the block collides with blocks.
    Block(BlockId),
    /// An active invisibility tile sits on the next cell.
    InvisibilityTile(TileId),
    /// The block entered a stopper.
    Stopper(TileId),
    /// The block fell into a pit.
    Pit(TileId),
    /// An unarmed breaker halted the block.
    Breaker(TileId),
    /// The paired cell of a teleport was blocked, so the block stayed on the entry cell.
    TeleportExitBlocked(TileId),
    /// The slide exceeded the number of steps any finite slide can take.
    LoopGuard,
}

/// Tile interactions observed while resolving a slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideEvent {
    /// The block warped between the cells of a teleport.
    Teleported {
        /// Teleport tile that was used.
        tile: TileId,
        /// Cell the block entered.
        entry: CellCoord,
        /// Cell the block emerged from.
        exit: CellCoord,
    },
    /// An unarmed breaker halted the block and armed the shared toggle.
    BreakerArmed {
        /// Breaker tile.
        tile: TileId,
        /// Cell of the breaker.
        cell: CellCoord,
    },
    /// An armed breaker let the block pass and cleared the shared toggle.
    BreakerPassed {
        /// Breaker tile.
        tile: TileId,
        /// Cell of the breaker.
        cell: CellCoord,
    },
    /// The block fell into a pit.
    PitFall {
        /// Pit tile.
        tile: TileId,
        /// Cell of the pit.
        cell: CellCoord,
    },
    /// The slide was cut short by the loop guard.
    LoopGuardTripped {
        /// Cell the block was on when the guard fired.
        cell: CellCoord,
    },
}

/// Outcome of resolving a single slide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Block that slid.
    pub block: BlockId,
    /// Direction of travel.
    pub direction: Direction,
    /// Cell the block started on.
    pub start: CellCoord,
    /// Cell the block rests on after the slide.
    pub final_cell: CellCoord,
    /// Cells visited after leaving `start`, in order. Ends with `final_cell` unless the move is a no-op.
    pub path: Vec<CellCoord>,
    /// Tile interactions in the order they happened.
    pub events: Vec<SlideEvent>,
    /// Why the slide ended.
    pub halt: Halt,
    /// Breaker toggle to store if the move is committed.
    pub breaker_armed: bool,
}

impl ResolvedPath {
    /// Reports whether the block would end where it started.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.final_cell == self.start
    }

    /// Returns the pit cell if the block fell into one.
    #[must_use]
    pub fn pit_fall(&self) -> Option<CellCoord> {
        self.events.iter().find_map(|event| match event {
            SlideEvent::PitFall { cell, .. } => Some(*cell),
            _ => None,
        })
    }
}

/// Resolves the resting cell of a block sliding across the provided views.
///
/// Every step first checks obstacles (bounds, walls, blocks, invisibility
/// tiles) and then applies the highest-precedence tile on the next cell in
/// the order teleport, stopper, pit, breaker. Pass-through blocks never come
/// to rest on another block: the slide settles on the last visited cell that
/// is free of other blocks.
#[must_use]
pub fn resolve(
    request: SlideRequest,
    grid: GridView<'_>,
    tiles: TileView<'_>,
    rules: SlideRules,
) -> ResolvedPath {
    let mut trail = Trail::new(rules.breaker_armed);
    let step_budget = grid.cell_count().saturating_mul(2).saturating_add(1);
    let mut cursor = request.start;

    let halt = loop {
        if trail.cells.len() >= step_budget {
            trail.record(SlideEvent::LoopGuardTripped { cell: cursor });
            break Halt::LoopGuard;
        }

        let Some(next) = cursor
            .neighbor(request.direction)
            .filter(|cell| grid.contains(*cell))
        else {
            break Halt::OutOfBounds;
        };

        if let Some(halt) = obstacle(&request, next, &grid, &tiles, &rules) {
            break halt;
        }

        let Some((tile, behaviour)) = tiles.behaviour_at(next) else {
            trail.enter(next);
            cursor = next;
            continue;
        };

        match behaviour {
            SlideBehaviour::Teleport => {
                let exit = tile.teleport_exit(next).unwrap_or(next);
                trail.enter(next);
                let exit_blocked = !grid.contains(exit)
                    || obstacle(&request, exit, &grid, &tiles, &rules).is_some();
                if exit_blocked {
                    break Halt::TeleportExitBlocked(tile.id);
                }
                trail.enter(exit);
                trail.record(SlideEvent::Teleported {
                    tile: tile.id,
                    entry: next,
                    exit,
                });
                cursor = exit;
            }
            SlideBehaviour::Stopper => {
                trail.enter(next);
                break Halt::Stopper(tile.id);
            }
            SlideBehaviour::Pit => {
                trail.enter(next);
                trail.record(SlideEvent::PitFall {
                    tile: tile.id,
                    cell: next,
                });
                break Halt::Pit(tile.id);
            }
            SlideBehaviour::Breaker => {
                trail.enter(next);
                if trail.armed() {
                    trail.set_armed(false);
                    trail.record(SlideEvent::BreakerPassed {
                        tile: tile.id,
                        cell: next,
                    });
                    cursor = next;
                } else {
                    trail.set_armed(true);
                    trail.record(SlideEvent::BreakerArmed {
                        tile: tile.id,
                        cell: next,
                    });
                    break Halt::Breaker(tile.id);
                }
            }
        }
    };

    trail.settle(request.block, &grid);
    let final_cell = trail.cells.last().copied().unwrap_or(request.start);
    let breaker_armed = trail.armed();

    ResolvedPath {
        block: request.block,
        direction: request.direction,
        start: request.start,
        final_cell,
        path: trail.cells,
        events: trail.events.into_iter().map(|(_, event)| event).collect(),
        halt,
        breaker_armed,
    }
}

fn obstacle(
    request: &SlideRequest,
    cell: CellCoord,
    grid: &GridView<'_>,
    tiles: &TileView<'_>,
    rules: &SlideRules,
) -> Option<Halt> {
    match grid.classify(cell) {
        CellState::OutOfBounds => return Some(Halt::OutOfBounds),
        CellState::Wall if request.collide_with_walls => return Some(Halt::Wall),
        CellState::Block(other) if other != request.block && request.collide_with_blocks => {
            return Some(Halt::Block(other));
        }
        _ => {}
    }

    tiles
        .invisibility_at(cell)
        .filter(|tile| tile.visible || !rules.hidden_invisibility_passable)
        .map(|tile| Halt::InvisibilityTile(tile.id))
}

/// Cells entered during a slide together with the breaker toggle after each one.
#[derive(Debug)]
struct Trail {
    initial_armed: bool,
    cells: Vec<CellCoord>,
    armed_after: Vec<bool>,
    events: Vec<(usize, SlideEvent)>,
}

impl Trail {
    fn new(initial_armed: bool) -> Self {
        Self {
            initial_armed,
            cells: Vec::new(),
            armed_after: Vec::new(),
            events: Vec::new(),
        }
    }

    fn enter(&mut self, cell: CellCoord) {
        let armed = self.armed();
        self.cells.push(cell);
        self.armed_after.push(armed);
    }

    fn armed(&self) -> bool {
        self.armed_after
            .last()
            .copied()
            .unwrap_or(self.initial_armed)
    }

    fn set_armed(&mut self, armed: bool) {
        if let Some(last) = self.armed_after.last_mut() {
            *last = armed;
        }
    }

    fn record(&mut self, event: SlideEvent) {
        self.events.push((self.cells.len(), event));
    }

    /// Drops trailing cells held by other blocks along with what happened on them.
    fn settle(&mut self, block: BlockId, grid: &GridView<'_>) {
        let keep = self
            .cells
            .iter()
            .rposition(|cell| grid.occupant(*cell).map_or(true, |other| other == block))
            .map_or(0, |index| index + 1);

        if keep == self.cells.len() {
            return;
        }

        self.cells.truncate(keep);
        self.armed_after.truncate(keep);
        self.events.retain(|(index, _)| *index <= keep);
    }
}
