#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Blockslide puzzle engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative puzzle session, and pure systems. Adapters submit
//! [`Command`] values describing player intent, the session executes those
//! commands via its `apply` entry point, and then reports [`Event`] values
//! describing every observable consequence. Systems only ever see the
//! immutable [`GridView`], [`TileView`] and [`BlockView`] snapshots defined
//! here.

use serde::{Deserialize, Serialize};

mod level;

pub use level::{
    BlockDefinition, LevelDefinition, StarThresholds, TileDefinition, DEFAULT_BLOCK_SPEED,
    LEVEL_FORMAT_VERSION, MAX_LEVEL_EDGE,
};

/// Commands that express all permissible session mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Selects the block that subsequent moves will slide.
    SelectBlock {
        /// Zero-based index into the level's block list. Clamped to the valid range.
        index: usize,
    },
    /// Slides the selected block in the provided direction.
    AttemptMove {
        /// Direction of travel for the slide.
        direction: Direction,
    },
}

/// Events reported by the session after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a block became the active selection.
    BlockSelected {
        /// Identifier of the selected block.
        block: BlockId,
    },
    /// Reports that a selection request was refused.
    SelectionRejected {
        /// Index provided in the request.
        index: usize,
        /// Specific reason the selection failed.
        reason: SelectionRejection,
    },
    /// Reports that a move request was refused before resolution.
    MoveRejected {
        /// Block that was selected when the request arrived.
        block: BlockId,
        /// Direction provided in the request.
        direction: Direction,
        /// Specific reason the move failed.
        reason: MoveRejection,
    },
    /// Reports that a move resolved to the starting cell and was discarded.
    MoveBlocked {
        /// Block that attempted to move.
        block: BlockId,
        /// Direction of the attempted slide.
        direction: Direction,
    },
    /// Confirms that a block slid to a new resting cell.
    BlockSlid {
        /// Identifier of the block that moved.
        block: BlockId,
        /// Cell the block occupied before moving.
        from: CellCoord,
        /// Cell the block rests on after the slide.
        to: CellCoord,
        /// Every cell the block passed through after leaving `from`, in order.
        path: Vec<CellCoord>,
    },
    /// Reports that a block warped between the two cells of a teleport.
    TeleportTraversed {
        /// Block that used the teleport.
        block: BlockId,
        /// Teleport tile that was used.
        tile: TileId,
        /// Cell the block entered.
        entry: CellCoord,
        /// Paired cell the block emerged from.
        exit: CellCoord,
    },
    /// Reports that a breaker tile halted a block and armed the breaker toggle.
    BreakerArmed {
        /// Block that was halted.
        block: BlockId,
        /// Cell of the breaker tile.
        cell: CellCoord,
    },
    /// Reports that an armed breaker let a block pass and disarmed the toggle.
    BreakerPassed {
        /// Block that crossed the breaker.
        block: BlockId,
        /// Cell of the breaker tile.
        cell: CellCoord,
    },
    /// Reports that a block fell into a pit. The host should reload the level.
    PitFall {
        /// Block that fell.
        block: BlockId,
        /// Cell of the pit tile.
        cell: CellCoord,
    },
    /// Confirms that an invisibility tile shifted by one cell.
    InvisibilityTileShifted {
        /// Tile that moved.
        tile: TileId,
        /// Cell the tile occupied before moving.
        from: CellCoord,
        /// Cell the tile occupies after moving.
        to: CellCoord,
    },
    /// Reports that an invisibility tile toggled its visual visibility.
    InvisibilityTileToggled {
        /// Tile whose visibility changed.
        tile: TileId,
        /// Visibility after the toggle.
        visible: bool,
    },
    /// Reports that a block started resting on one of its finish cells.
    BlockFinished {
        /// Block that finished.
        block: BlockId,
    },
    /// Reports that a block left every finish cell it may occupy.
    BlockUnfinished {
        /// Block that is no longer finished.
        block: BlockId,
    },
    /// Reports that a block stopped accepting moves.
    BlockLocked {
        /// Block that became uncontrollable.
        block: BlockId,
    },
    /// Reports the move counters after a committed move.
    MovesChanged {
        /// Moves applied since the level started.
        applied: u32,
        /// Moves remaining in the budget.
        left: u32,
    },
    /// Reports that the star rating changed.
    StarRatingChanged {
        /// Rating after the change.
        rating: StarRating,
    },
    /// Announces that the session entered a new state.
    SessionStateChanged {
        /// State that became active.
        state: SessionState,
    },
    /// Announces that every block rests on a finish cell.
    LevelWon {
        /// Moves it took to solve the level.
        applied_moves: u32,
        /// Final star rating.
        rating: StarRating,
    },
    /// Announces that the level can no longer be solved.
    LevelLost {
        /// Specific reason the level was lost.
        reason: LossReason,
    },
}

/// Cardinal movement directions available to blocks.
///
/// Rows grow upward, matching the coordinates used by level authors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing row indices.
    Up,
    /// Movement toward decreasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in a stable order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit offset as `(column, row)` deltas.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Down => (0, -1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Unique identifier assigned to a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(u32);

impl BlockId {
    /// Creates a new block identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a special tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(u32);

impl TileId {
    /// Creates a new tile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Returns the adjacent cell in the provided direction.
    ///
    /// Yields `None` when the step would leave the non-negative quadrant; the
    /// upper bounds are checked by the grid that owns the cell.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> Option<CellCoord> {
        let (dc, dr) = direction.delta();
        let column = self.column.checked_add_signed(dc)?;
        let row = self.row.checked_add_signed(dr)?;
        Some(CellCoord::new(column, row))
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Classification of a grid cell for traversal decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellState {
    /// The cell lies outside the level.
    OutOfBounds,
    /// The cell is free.
    Empty,
    /// The cell is part of the wall layout.
    Wall,
    /// The cell holds a block.
    Block(BlockId),
}

/// Read-only view into the layered occupancy grid.
///
/// Blocks take precedence over walls so a block resting on a wall cell is
/// reported as [`CellState::Block`].
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    walls: &'a [bool],
    occupants: &'a [Option<BlockId>],
    columns: u32,
    rows: u32,
}

impl<'a> GridView<'a> {
    /// Captures a new grid view backed by the provided layers.
    #[must_use]
    pub fn new(
        walls: &'a [bool],
        occupants: &'a [Option<BlockId>],
        columns: u32,
        rows: u32,
    ) -> Self {
        Self {
            walls,
            occupants,
            columns,
            rows,
        }
    }

    /// Classifies the provided cell.
    #[must_use]
    pub fn classify(&self, cell: CellCoord) -> CellState {
        let Some(index) = self.index(cell) else {
            return CellState::OutOfBounds;
        };
        if let Some(block) = self.occupants.get(index).copied().flatten() {
            return CellState::Block(block);
        }
        if self.walls.get(index).copied().unwrap_or(true) {
            CellState::Wall
        } else {
            CellState::Empty
        }
    }

    /// Returns the block occupying the provided cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<BlockId> {
        self.index(cell)
            .and_then(|index| self.occupants.get(index).copied().flatten())
    }

    /// Reports whether the wall layer covers the provided cell.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .map_or(true, |index| self.walls.get(index).copied().unwrap_or(true))
    }

    /// Reports whether the cell lies inside the level.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Provides the dimensions of the underlying grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Number of cells held by the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.walls.len()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Kinds of special tiles that alter a slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    /// Warps the block to the paired cell and keeps it sliding.
    Teleport,
    /// Swallows the block and loses the level.
    Pit,
    /// Halts the block on the tile.
    Stopper,
    /// Halts the block once, then lets the next one through.
    Breaker,
    /// Moves every turn and blocks slides.
    Invisibility,
}

impl TileKind {
    /// Resolution priority when several tiles share a cell. Lower wins.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Invisibility => 0,
            Self::Teleport => 1,
            Self::Stopper => 2,
            Self::Pit => 3,
            Self::Breaker => 4,
        }
    }

    /// Effect on a block entering the tile, or `None` for tiles that only obstruct.
    #[must_use]
    pub const fn slide_behaviour(self) -> Option<SlideBehaviour> {
        match self {
            Self::Teleport => Some(SlideBehaviour::Teleport),
            Self::Stopper => Some(SlideBehaviour::Stopper),
            Self::Pit => Some(SlideBehaviour::Pit),
            Self::Breaker => Some(SlideBehaviour::Breaker),
            Self::Invisibility => None,
        }
    }
}

/// What happens to a block that slides onto a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlideBehaviour {
    /// Continue from the paired cell.
    Teleport,
    /// Halt on the tile.
    Stopper,
    /// Halt on the tile and lose the level.
    Pit,
    /// Halt or pass depending on the breaker toggle.
    Breaker,
}

/// Immutable representation of a single special tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileSnapshot {
    /// Identifier assigned to the tile.
    pub id: TileId,
    /// Behaviour of the tile.
    pub kind: TileKind,
    /// Primary cell covered by the tile.
    pub cell: CellCoord,
    /// Paired cell for teleports.
    pub pair: Option<CellCoord>,
    /// Whether the tile currently participates in gameplay.
    pub active: bool,
    /// Whether the tile is drawn. Purely cosmetic unless configured otherwise.
    pub visible: bool,
    /// Invisibility tiles: move with the sliding block rather than against it.
    pub symmetric: bool,
    /// Invisibility tiles: visibility toggles every `period` applied moves.
    pub period: u32,
}

impl TileSnapshot {
    /// Reports whether the tile covers the provided cell.
    #[must_use]
    pub fn covers(&self, cell: CellCoord) -> bool {
        self.cell == cell || self.pair == Some(cell)
    }

    /// Returns the cell a block emerges from after entering `entry`.
    #[must_use]
    pub fn teleport_exit(&self, entry: CellCoord) -> Option<CellCoord> {
        if self.kind != TileKind::Teleport {
            return None;
        }
        let pair = self.pair?;
        if entry == self.cell {
            Some(pair)
        } else if entry == pair {
            Some(self.cell)
        } else {
            None
        }
    }
}

/// Read-only snapshot describing all special tiles.
#[derive(Clone, Copy, Debug)]
pub struct TileView<'a> {
    tiles: &'a [TileSnapshot],
}

impl<'a> TileView<'a> {
    /// Captures a view over the provided tile snapshots.
    #[must_use]
    pub fn new(tiles: &'a [TileSnapshot]) -> Self {
        Self { tiles }
    }

    /// Iterator over every tile, active or not.
    pub fn iter(&self) -> impl Iterator<Item = &'a TileSnapshot> + 'a {
        self.tiles.iter()
    }

    /// Returns the highest-precedence active tile covering the cell.
    #[must_use]
    pub fn active_at(&self, cell: CellCoord) -> Option<&'a TileSnapshot> {
        self.tiles
            .iter()
            .filter(|tile| tile.active && tile.covers(cell))
            .min_by_key(|tile| tile.kind.precedence())
    }

    /// Returns the active invisibility tile on the cell, if any.
    #[must_use]
    pub fn invisibility_at(&self, cell: CellCoord) -> Option<&'a TileSnapshot> {
        self.tiles.iter().find(|tile| {
            tile.active && tile.kind == TileKind::Invisibility && tile.cell == cell
        })
    }

    /// Returns the highest-precedence active tile that changes a slide on entry.
    ///
    /// Invisibility tiles are obstacles rather than behaviours and are skipped.
    #[must_use]
    pub fn behaviour_at(&self, cell: CellCoord) -> Option<(&'a TileSnapshot, SlideBehaviour)> {
        self.tiles
            .iter()
            .filter(|tile| tile.active && tile.covers(cell))
            .filter_map(|tile| Some((tile, tile.kind.slide_behaviour()?)))
            .min_by_key(|(tile, _)| tile.kind.precedence())
    }
}

/// Immutable representation of a single block's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockSnapshot {
    /// Unique identifier assigned to the block.
    pub id: BlockId,
    /// Grid cell currently occupied by the block.
    pub cell: CellCoord,
    /// Primary finish cell.
    pub finish: CellCoord,
    /// Additional cells that also count as finished.
    pub extra_finishes: Vec<CellCoord>,
    /// Whether any block's finish cell satisfies this block.
    pub universal: bool,
    /// Whether walls stop this block.
    pub collide_with_walls: bool,
    /// Whether other blocks stop this block.
    pub collide_with_blocks: bool,
    /// Whether the block currently rests on an accepted finish cell.
    pub finished: bool,
    /// Whether the player may still move the block.
    pub controllable: bool,
    /// Cosmetic slide speed in cells per second.
    pub speed: f32,
}

impl BlockSnapshot {
    /// Iterator over the primary and additional finish cells of the block.
    pub fn finish_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        std::iter::once(self.finish).chain(self.extra_finishes.iter().copied())
    }
}

/// Read-only snapshot describing all blocks within the level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockView {
    snapshots: Vec<BlockSnapshot>,
}

impl BlockView {
    /// Creates a new block view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<BlockSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured block snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a single block snapshot.
    #[must_use]
    pub fn get(&self, block: BlockId) -> Option<&BlockSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == block)
    }

    /// Number of blocks captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<BlockSnapshot> {
        self.snapshots
    }
}

/// Lifecycle of a puzzle session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Waiting for selection or move input.
    Idle,
    /// A move is being resolved; no new input is accepted.
    Resolving,
    /// Every block rests on a finish cell.
    Won,
    /// The move budget ran out or a block fell into a pit.
    Lost,
}

impl SessionState {
    /// Reports whether the state is final.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Reasons a level may be lost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LossReason {
    /// The move budget reached zero before every block finished.
    MovesExhausted,
    /// A block fell into a pit.
    PitFall,
}

/// Reasons a move request may be rejected by the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// A previous move is still resolving.
    Busy,
    /// The level has already been won or lost.
    SessionOver,
    /// The selected block no longer accepts moves.
    NotControllable,
}

/// Reasons a selection request may be rejected by the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionRejection {
    /// A move is still resolving.
    Busy,
    /// The level has already been won or lost.
    SessionOver,
}

/// Scoring tier awarded for the number of applied moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StarRating {
    /// Stars are disabled for the level.
    Unrated,
    /// Solved, but above the two-star threshold.
    One,
    /// Within the two-star threshold.
    Two,
    /// Within the three-star threshold.
    Three,
}

impl StarRating {
    /// Numeric rating reported to presentation layers; `-1` means none.
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            Self::Unrated => -1,
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BlockId, CellCoord, CellState, Direction, GridView, SlideBehaviour, StarRating, TileId,
        TileKind, TileSnapshot, TileView,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    fn tile(id: u32, kind: TileKind, cell: CellCoord) -> TileSnapshot {
        TileSnapshot {
            id: TileId::new(id),
            kind,
            cell,
            pair: None,
            active: true,
            visible: true,
            symmetric: false,
            period: 0,
        }
    }

    #[test]
    fn opposite_directions_cancel_out() {
        for direction in Direction::ALL {
            let (dc, dr) = direction.delta();
            let (oc, or) = direction.opposite().delta();
            assert_eq!((dc + oc, dr + or), (0, 0));
        }
    }

    #[test]
    fn neighbor_refuses_to_underflow() {
        let origin = CellCoord::new(0, 0);
        assert_eq!(origin.neighbor(Direction::Left), None);
        assert_eq!(origin.neighbor(Direction::Down), None);
        assert_eq!(origin.neighbor(Direction::Up), Some(CellCoord::new(0, 1)));
        assert_eq!(
            origin.neighbor(Direction::Right),
            Some(CellCoord::new(1, 0))
        );
    }

    #[test]
    fn grid_view_prefers_blocks_over_walls() {
        let walls = [true, false, false, true];
        let occupants = [Some(BlockId::new(3)), None, Some(BlockId::new(1)), None];
        let view = GridView::new(&walls, &occupants, 2, 2);

        assert_eq!(
            view.classify(CellCoord::new(0, 0)),
            CellState::Block(BlockId::new(3))
        );
        assert_eq!(view.classify(CellCoord::new(1, 0)), CellState::Empty);
        assert_eq!(view.classify(CellCoord::new(1, 1)), CellState::Wall);
        assert_eq!(view.classify(CellCoord::new(2, 0)), CellState::OutOfBounds);
        assert!(view.is_wall(CellCoord::new(0, 0)));
    }

    #[test]
    fn tile_view_applies_precedence_and_skips_inactive_tiles() {
        let cell = CellCoord::new(2, 2);
        let mut breaker = tile(0, TileKind::Breaker, cell);
        let stopper = tile(1, TileKind::Stopper, cell);
        let mut teleport = tile(2, TileKind::Teleport, CellCoord::new(5, 5));
        teleport.pair = Some(cell);
        teleport.active = false;
        breaker.active = true;
        let tiles = [breaker, stopper, teleport];
        let view = TileView::new(&tiles);

        let (found, behaviour) = view.behaviour_at(cell).expect("tile present");
        assert_eq!(found.kind, TileKind::Stopper);
        assert_eq!(behaviour, SlideBehaviour::Stopper);
        assert!(view.invisibility_at(cell).is_none());
    }

    #[test]
    fn invisibility_tiles_have_no_entry_behaviour() {
        let cell = CellCoord::new(3, 1);
        let mut hidden = tile(0, TileKind::Invisibility, cell);
        hidden.visible = false;
        let tiles = [hidden];
        let view = TileView::new(&tiles);

        assert_eq!(TileKind::Invisibility.slide_behaviour(), None);
        assert!(view.behaviour_at(cell).is_none());
        assert_eq!(view.invisibility_at(cell).map(|tile| tile.id), Some(TileId::new(0)));

        let pit = tile(1, TileKind::Pit, cell);
        let stacked = [hidden, pit];
        let view = TileView::new(&stacked);
        let (found, behaviour) = view.behaviour_at(cell).expect("pit present");
        assert_eq!(found.id, TileId::new(1));
        assert_eq!(behaviour, SlideBehaviour::Pit);
    }

    #[test]
    fn teleport_exit_is_symmetric() {
        let mut teleport = tile(0, TileKind::Teleport, CellCoord::new(1, 1));
        teleport.pair = Some(CellCoord::new(4, 2));

        assert_eq!(
            teleport.teleport_exit(CellCoord::new(1, 1)),
            Some(CellCoord::new(4, 2))
        );
        assert_eq!(
            teleport.teleport_exit(CellCoord::new(4, 2)),
            Some(CellCoord::new(1, 1))
        );
        assert_eq!(teleport.teleport_exit(CellCoord::new(3, 3)), None);
    }

    #[test]
    fn unrated_stars_report_negative_one() {
        assert_eq!(StarRating::Unrated.value(), -1);
        assert_eq!(StarRating::Three.value(), 3);
    }

    #[test]
    fn tile_kind_round_trips_through_bincode() {
        assert_round_trip(&TileKind::Teleport);
        assert_round_trip(&Direction::Left);
    }
}
