//! Load-time consistency checks for level definitions.

use std::{collections::BTreeSet, fmt};

use blockslide_core::{CellCoord, LevelDefinition, TileKind, LEVEL_FORMAT_VERSION, MAX_LEVEL_EDGE};
use thiserror::Error;

use crate::grid::is_border;

/// Smallest level edge that leaves room for an interior cell inside the border.
const MIN_EDGE: u32 = 3;

/// Level element referenced by a validation error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subject {
    /// Interior wall at the provided list index.
    Wall(usize),
    /// Start cell of the block at the provided list index.
    BlockStart(usize),
    /// Finish cell belonging to the block at the provided list index.
    BlockFinish(usize),
    /// Tile at the provided list index.
    Tile(usize),
    /// Paired cell of the teleport at the provided list index.
    TeleportPair(usize),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wall(index) => write!(f, "wall #{index}"),
            Self::BlockStart(index) => write!(f, "start of block #{index}"),
            Self::BlockFinish(index) => write!(f, "finish of block #{index}"),
            Self::Tile(index) => write!(f, "tile #{index}"),
            Self::TeleportPair(index) => write!(f, "pair of teleport #{index}"),
        }
    }
}

/// Inconsistencies that prevent a level from being played.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    /// The definition was written for a format this build does not understand.
    #[error("unsupported level format version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version stored in the definition.
        found: u32,
        /// Version understood by this build.
        expected: u32,
    },
    /// The level has no interior cells.
    #[error("level must be at least 3x3, got {width}x{height}")]
    TooSmall {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },
    /// The level exceeds the largest supported board.
    #[error("level must be at most {max}x{max}, got {width}x{height}")]
    TooLarge {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
        /// Largest accepted edge.
        max: u32,
    },
    /// The level declares no blocks.
    #[error("level declares no blocks")]
    NoBlocks,
    /// The level allows no moves.
    #[error("move budget must be at least 1")]
    EmptyMoveBudget,
    /// A referenced cell lies outside the level.
    #[error("{subject} at ({}, {}) lies outside the level", cell.column(), cell.row())]
    OutOfBounds {
        /// Offending element.
        subject: Subject,
        /// Offending cell.
        cell: CellCoord,
    },
    /// A referenced cell lies on the implicit border wall.
    #[error("{subject} at ({}, {}) lies on the border wall", cell.column(), cell.row())]
    OnBorder {
        /// Offending element.
        subject: Subject,
        /// Offending cell.
        cell: CellCoord,
    },
    /// A referenced cell lies on an interior wall.
    #[error("{subject} at ({}, {}) lies on a wall", cell.column(), cell.row())]
    OnWall {
        /// Offending element.
        subject: Subject,
        /// Offending cell.
        cell: CellCoord,
    },
    /// Two blocks start on the same cell.
    #[error("blocks #{first} and #{second} share the start cell ({}, {})", cell.column(), cell.row())]
    SharedStart {
        /// Index of the block declared first.
        first: usize,
        /// Index of the block declared second.
        second: usize,
        /// Shared cell.
        cell: CellCoord,
    },
    /// A teleport was declared without its paired cell.
    #[error("teleport #{tile} has no paired cell")]
    TeleportWithoutPair {
        /// Index of the teleport.
        tile: usize,
    },
    /// A teleport was paired with its own cell.
    #[error("teleport #{tile} is paired with its own cell")]
    TeleportPairedWithItself {
        /// Index of the teleport.
        tile: usize,
    },
    /// A teleport cell is shared with another tile.
    #[error("teleport #{tile} overlaps tile #{other} at ({}, {})", cell.column(), cell.row())]
    OverlappingTeleport {
        /// Index of the teleport.
        tile: usize,
        /// Index of the overlapping tile.
        other: usize,
        /// Shared cell.
        cell: CellCoord,
    },
    /// A block declares a slide speed that is not a positive finite number.
    #[error("block #{block} must have a positive finite speed")]
    InvalidSpeed {
        /// Index of the block.
        block: usize,
    },
    /// A block starts inside a pit.
    #[error("block #{block} starts on pit #{tile}")]
    BlockOnPit {
        /// Index of the block.
        block: usize,
        /// Index of the pit.
        tile: usize,
    },
    /// A pit covers a finish cell, making the finish unreachable.
    #[error("pit #{tile} covers the finish of block #{block}")]
    PitOnFinish {
        /// Index of the pit.
        tile: usize,
        /// Index of the block whose finish is covered.
        block: usize,
    },
    /// An invisibility tile starts underneath a block.
    #[error("invisibility tile #{tile} starts under block #{block}")]
    InvisibilityOnBlock {
        /// Index of the invisibility tile.
        tile: usize,
        /// Index of the block.
        block: usize,
    },
    /// The three-star threshold is looser than the two-star threshold.
    #[error("three-star threshold {three} exceeds two-star threshold {two}")]
    InvertedStarThresholds {
        /// Maximum moves for two stars.
        two: u32,
        /// Maximum moves for three stars.
        three: u32,
    },
    /// Every block already rests on a finish cell before the first move.
    #[error("level is already solved at load")]
    AlreadySolved,
}

/// Checks the definition for every inconsistency that would make play undefined.
pub(crate) fn validate(level: &LevelDefinition) -> Result<(), LevelError> {
    if level.version != LEVEL_FORMAT_VERSION {
        return Err(LevelError::UnsupportedVersion {
            found: level.version,
            expected: LEVEL_FORMAT_VERSION,
        });
    }
    if level.width < MIN_EDGE || level.height < MIN_EDGE {
        return Err(LevelError::TooSmall {
            width: level.width,
            height: level.height,
        });
    }
    if level.width > MAX_LEVEL_EDGE || level.height > MAX_LEVEL_EDGE {
        return Err(LevelError::TooLarge {
            width: level.width,
            height: level.height,
            max: MAX_LEVEL_EDGE,
        });
    }
    if level.blocks.is_empty() {
        return Err(LevelError::NoBlocks);
    }
    if level.moves == 0 {
        return Err(LevelError::EmptyMoveBudget);
    }
    if let Some(stars) = level.stars {
        if stars.three > stars.two {
            return Err(LevelError::InvertedStarThresholds {
                two: stars.two,
                three: stars.three,
            });
        }
    }

    let bounds = Bounds {
        width: level.width,
        height: level.height,
    };
    let walls: BTreeSet<CellCoord> = level.walls.iter().copied().collect();

    for (index, &cell) in level.walls.iter().enumerate() {
        bounds.inside(Subject::Wall(index), cell)?;
    }

    let mut starts = Vec::with_capacity(level.blocks.len());
    for (index, block) in level.blocks.iter().enumerate() {
        bounds.interior(Subject::BlockStart(index), block.start, &walls)?;
        if let Some(first) = starts.iter().position(|cell| *cell == block.start) {
            return Err(LevelError::SharedStart {
                first,
                second: index,
                cell: block.start,
            });
        }
        starts.push(block.start);

        if !(block.speed.is_finite() && block.speed > 0.0) {
            return Err(LevelError::InvalidSpeed { block: index });
        }

        for finish in std::iter::once(block.finish).chain(block.extra_finishes.iter().copied()) {
            bounds.interior(Subject::BlockFinish(index), finish, &walls)?;
        }
    }

    for (index, tile) in level.tiles.iter().enumerate() {
        bounds.interior(Subject::Tile(index), tile.cell, &walls)?;

        match tile.kind {
            TileKind::Teleport => {
                let Some(pair) = tile.pair else {
                    return Err(LevelError::TeleportWithoutPair { tile: index });
                };
                if pair == tile.cell {
                    return Err(LevelError::TeleportPairedWithItself { tile: index });
                }
                bounds.interior(Subject::TeleportPair(index), pair, &walls)?;
                check_teleport_overlap(level, index)?;
            }
            TileKind::Pit => {
                for (block_index, block) in level.blocks.iter().enumerate() {
                    if block.start == tile.cell {
                        return Err(LevelError::BlockOnPit {
                            block: block_index,
                            tile: index,
                        });
                    }
                    let covers_finish = std::iter::once(block.finish)
                        .chain(block.extra_finishes.iter().copied())
                        .any(|cell| cell == tile.cell);
                    if covers_finish {
                        return Err(LevelError::PitOnFinish {
                            tile: index,
                            block: block_index,
                        });
                    }
                }
            }
            TileKind::Invisibility => {
                if let Some(block) = starts.iter().position(|cell| *cell == tile.cell) {
                    return Err(LevelError::InvisibilityOnBlock { tile: index, block });
                }
            }
            TileKind::Stopper | TileKind::Breaker => {}
        }
    }

    Ok(())
}

fn check_teleport_overlap(level: &LevelDefinition, index: usize) -> Result<(), LevelError> {
    let Some(teleport) = level.tiles.get(index) else {
        return Ok(());
    };
    let cells: Vec<CellCoord> = std::iter::once(teleport.cell).chain(teleport.pair).collect();

    for (other, tile) in level.tiles.iter().enumerate() {
        if other == index {
            continue;
        }
        let other_cells = std::iter::once(tile.cell).chain(match tile.kind {
            TileKind::Teleport => tile.pair,
            _ => None,
        });
        for cell in other_cells {
            if cells.contains(&cell) {
                return Err(LevelError::OverlappingTeleport {
                    tile: index,
                    other,
                    cell,
                });
            }
        }
    }
    Ok(())
}

#[derive(Clone, Copy, Debug)]
struct Bounds {
    width: u32,
    height: u32,
}

impl Bounds {
    fn inside(self, subject: Subject, cell: CellCoord) -> Result<(), LevelError> {
        if cell.column() < self.width && cell.row() < self.height {
            Ok(())
        } else {
            Err(LevelError::OutOfBounds { subject, cell })
        }
    }

    fn interior(
        self,
        subject: Subject,
        cell: CellCoord,
        walls: &BTreeSet<CellCoord>,
    ) -> Result<(), LevelError> {
        self.inside(subject, cell)?;
        if is_border(cell, self.width, self.height) {
            return Err(LevelError::OnBorder { subject, cell });
        }
        if walls.contains(&cell) {
            return Err(LevelError::OnWall { subject, cell });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockslide_core::{BlockDefinition, TileDefinition};

    fn base() -> LevelDefinition {
        LevelDefinition::new(5, 5, 10)
            .with_block(BlockDefinition::new(CellCoord::new(1, 1), CellCoord::new(3, 3)))
    }

    #[test]
    fn minimal_level_is_valid() {
        assert_eq!(validate(&base()), Ok(()));
    }

    #[test]
    fn oversized_levels_are_rejected_before_allocation() {
        let level = LevelDefinition::new(u32::MAX, u32::MAX, 5)
            .with_block(BlockDefinition::new(CellCoord::new(1, 1), CellCoord::new(3, 3)));
        assert_eq!(
            validate(&level),
            Err(LevelError::TooLarge {
                width: u32::MAX,
                height: u32::MAX,
                max: MAX_LEVEL_EDGE,
            })
        );

        let widest = LevelDefinition::new(MAX_LEVEL_EDGE, 5, 5)
            .with_block(BlockDefinition::new(CellCoord::new(1, 1), CellCoord::new(3, 3)));
        assert_eq!(validate(&widest), Ok(()));
    }

    #[test]
    fn block_speed_must_be_positive_and_finite() {
        for speed in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let mut level = base();
            level.blocks[0].speed = speed;
            assert_eq!(validate(&level), Err(LevelError::InvalidSpeed { block: 0 }));
        }

        let mut slow = base();
        slow.blocks[0].speed = 1e-40;
        assert_eq!(validate(&slow), Ok(()));
    }

    #[test]
    fn error_messages_name_the_offending_element() {
        let error = LevelError::OnBorder {
            subject: Subject::BlockStart(2),
            cell: CellCoord::new(0, 3),
        };
        assert_eq!(
            error.to_string(),
            "start of block #2 at (0, 3) lies on the border wall"
        );
    }

    #[test]
    fn stacked_non_teleport_tiles_are_allowed() {
        let level = base()
            .with_tile(TileDefinition::new(TileKind::Stopper, CellCoord::new(2, 2)))
            .with_tile(TileDefinition::new(TileKind::Breaker, CellCoord::new(2, 2)));
        assert_eq!(validate(&level), Ok(()));
    }

    #[test]
    fn teleport_pair_overlap_is_detected() {
        let level = base()
            .with_tile(TileDefinition::teleport(
                CellCoord::new(2, 2),
                CellCoord::new(3, 2),
            ))
            .with_tile(TileDefinition::new(TileKind::Stopper, CellCoord::new(3, 2)));
        assert_eq!(
            validate(&level),
            Err(LevelError::OverlappingTeleport {
                tile: 0,
                other: 1,
                cell: CellCoord::new(3, 2),
            })
        );
    }
}
