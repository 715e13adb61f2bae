//! Static level description consumed read-only by the session.

use serde::{Deserialize, Serialize};

use crate::{CellCoord, TileKind};

/// Level file format understood by this build.
pub const LEVEL_FORMAT_VERSION: u32 = 1;

/// Largest accepted level width or height, border included.
pub const MAX_LEVEL_EDGE: u32 = 256;

/// Cosmetic slide speed applied when a block omits one.
pub const DEFAULT_BLOCK_SPEED: f32 = 5.0;

/// Complete description of a puzzle level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Format version of the description.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Display name shown by front ends.
    #[serde(default)]
    pub name: String,
    /// Number of columns, border included.
    pub width: u32,
    /// Number of rows, border included.
    pub height: u32,
    /// Move budget for the level.
    pub moves: u32,
    /// Star thresholds. Stars are disabled when absent.
    #[serde(default)]
    pub stars: Option<StarThresholds>,
    /// Interior wall cells. The border is always walled.
    #[serde(default)]
    pub walls: Vec<CellCoord>,
    /// Blocks in selection order.
    pub blocks: Vec<BlockDefinition>,
    /// Special tiles.
    #[serde(default)]
    pub tiles: Vec<TileDefinition>,
}

impl LevelDefinition {
    /// Creates an empty level with the provided dimensions and move budget.
    #[must_use]
    pub fn new(width: u32, height: u32, moves: u32) -> Self {
        Self {
            version: LEVEL_FORMAT_VERSION,
            name: String::new(),
            width,
            height,
            moves,
            stars: None,
            walls: Vec::new(),
            blocks: Vec::new(),
            tiles: Vec::new(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enables star rating with the provided thresholds.
    #[must_use]
    pub fn with_stars(mut self, two: u32, three: u32) -> Self {
        self.stars = Some(StarThresholds { two, three });
        self
    }

    /// Adds an interior wall.
    #[must_use]
    pub fn with_wall(mut self, cell: CellCoord) -> Self {
        self.walls.push(cell);
        self
    }

    /// Adds a block.
    #[must_use]
    pub fn with_block(mut self, block: BlockDefinition) -> Self {
        self.blocks.push(block);
        self
    }

    /// Adds a special tile.
    #[must_use]
    pub fn with_tile(mut self, tile: TileDefinition) -> Self {
        self.tiles.push(tile);
        self
    }
}

/// Move thresholds that award two or three stars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarThresholds {
    /// Maximum applied moves that still award two stars.
    pub two: u32,
    /// Maximum applied moves that still award three stars.
    pub three: u32,
}

/// Load-time description of a block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockDefinition {
    /// Starting cell.
    pub start: CellCoord,
    /// Primary finish cell.
    pub finish: CellCoord,
    /// Additional accepted finish cells.
    #[serde(default)]
    pub extra_finishes: Vec<CellCoord>,
    /// Whether any block's finish cell satisfies this block.
    #[serde(default)]
    pub universal: bool,
    /// Whether walls stop the block.
    #[serde(default = "enabled")]
    pub collide_with_walls: bool,
    /// Whether other blocks stop the block.
    #[serde(default = "enabled")]
    pub collide_with_blocks: bool,
    /// Whether the player may move the block.
    #[serde(default = "enabled")]
    pub controllable: bool,
    /// Cosmetic slide speed in cells per second.
    #[serde(default = "default_speed")]
    pub speed: f32,
}

impl BlockDefinition {
    /// Creates a colliding, controllable block.
    #[must_use]
    pub fn new(start: CellCoord, finish: CellCoord) -> Self {
        Self {
            start,
            finish,
            extra_finishes: Vec::new(),
            universal: false,
            collide_with_walls: true,
            collide_with_blocks: true,
            controllable: true,
            speed: DEFAULT_BLOCK_SPEED,
        }
    }

    /// Adds an accepted finish cell.
    #[must_use]
    pub fn with_extra_finish(mut self, cell: CellCoord) -> Self {
        self.extra_finishes.push(cell);
        self
    }

    /// Marks the block as universal.
    #[must_use]
    pub fn universal(mut self) -> Self {
        self.universal = true;
        self
    }

    /// Overrides which obstacles stop the block.
    #[must_use]
    pub fn with_collisions(mut self, walls: bool, blocks: bool) -> Self {
        self.collide_with_walls = walls;
        self.collide_with_blocks = blocks;
        self
    }

    /// Overrides whether the player may move the block.
    #[must_use]
    pub fn with_controllable(mut self, controllable: bool) -> Self {
        self.controllable = controllable;
        self
    }
}

/// Load-time description of a special tile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileDefinition {
    /// Behaviour of the tile.
    pub kind: TileKind,
    /// Primary cell.
    pub cell: CellCoord,
    /// Paired cell, required for teleports and ignored otherwise.
    #[serde(default)]
    pub pair: Option<CellCoord>,
    /// Whether the tile starts active.
    #[serde(default = "enabled")]
    pub active: bool,
    /// Invisibility tiles: visibility toggles every `period` applied moves. Zero never toggles.
    #[serde(default)]
    pub period: u32,
    /// Invisibility tiles: move with the sliding block rather than against it.
    #[serde(default)]
    pub symmetric: bool,
}

impl TileDefinition {
    /// Creates an active tile of the provided kind.
    #[must_use]
    pub fn new(kind: TileKind, cell: CellCoord) -> Self {
        Self {
            kind,
            cell,
            pair: None,
            active: true,
            period: 0,
            symmetric: false,
        }
    }

    /// Creates a teleport linking two cells.
    #[must_use]
    pub fn teleport(cell: CellCoord, pair: CellCoord) -> Self {
        Self {
            pair: Some(pair),
            ..Self::new(TileKind::Teleport, cell)
        }
    }

    /// Creates an invisibility tile.
    #[must_use]
    pub fn invisibility(cell: CellCoord, period: u32, symmetric: bool) -> Self {
        Self {
            period,
            symmetric,
            ..Self::new(TileKind::Invisibility, cell)
        }
    }

    /// Overrides whether the tile starts active.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

fn default_version() -> u32 {
    LEVEL_FORMAT_VERSION
}

fn default_speed() -> f32 {
    DEFAULT_BLOCK_SPEED
}

fn enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_definition_round_trips_through_bincode() {
        let level = LevelDefinition::new(6, 5, 12)
            .with_name("corridor")
            .with_stars(8, 4)
            .with_wall(CellCoord::new(2, 2))
            .with_block(
                BlockDefinition::new(CellCoord::new(1, 1), CellCoord::new(4, 1))
                    .with_extra_finish(CellCoord::new(4, 3)),
            )
            .with_tile(TileDefinition::teleport(
                CellCoord::new(1, 3),
                CellCoord::new(3, 3),
            ));

        let bytes = bincode::serialize(&level).expect("serialize");
        let restored: LevelDefinition = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, level);
    }

    #[test]
    fn block_builder_defaults_match_editor_defaults() {
        let block = BlockDefinition::new(CellCoord::new(1, 1), CellCoord::new(2, 2));
        assert!(block.collide_with_walls);
        assert!(block.collide_with_blocks);
        assert!(block.controllable);
        assert!(!block.universal);
        assert!((block.speed - DEFAULT_BLOCK_SPEED).abs() < f32::EPSILON);
    }

    #[test]
    fn invisibility_builder_keeps_motion_settings() {
        let tile = TileDefinition::invisibility(CellCoord::new(3, 3), 2, true);
        assert_eq!(tile.kind, TileKind::Invisibility);
        assert_eq!(tile.period, 2);
        assert!(tile.symmetric);
        assert!(tile.active);
        assert_eq!(tile.pair, None);
    }
}
