#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Blockslide adapters.
//!
//! Everything here is derived from session snapshots and never feeds back
//! into the simulation.

use blockslide_core::{BlockId, BlockView, CellCoord, GridView, TileId, TileKind, TileView};
use glam::Vec2;
use std::{error::Error, fmt};

/// Alpha applied to finish markers so blocks drawn above remain readable.
pub const FINISH_MARKER_ALPHA: f32 = 0.5;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with a replaced alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Reports whether the color draws nothing.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.alpha <= 0.0
    }
}

/// Colors used when turning snapshots into a scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    /// Wall color.
    pub wall: Color,
    /// Floor color, also the light square of the chess background.
    pub floor: Color,
    /// Dark square of the chess background.
    pub floor_alternate: Color,
    /// Block colors, cycled by block index.
    pub blocks: Vec<Color>,
    /// Teleport color.
    pub teleport: Color,
    /// Pit color.
    pub pit: Color,
    /// Stopper color.
    pub stopper: Color,
    /// Breaker color.
    pub breaker: Color,
    /// Invisibility tile color while visible.
    pub invisibility: Color,
}

impl Palette {
    /// Color assigned to the provided block.
    #[must_use]
    pub fn block(&self, block: BlockId) -> Color {
        if self.blocks.is_empty() {
            return self.wall;
        }
        let index = usize::try_from(block.get()).unwrap_or(0) % self.blocks.len();
        self.blocks[index]
    }

    /// Color assigned to the provided tile kind.
    #[must_use]
    pub const fn tile(&self, kind: TileKind) -> Color {
        match kind {
            TileKind::Teleport => self.teleport,
            TileKind::Pit => self.pit,
            TileKind::Stopper => self.stopper,
            TileKind::Breaker => self.breaker,
            TileKind::Invisibility => self.invisibility,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            wall: Color::from_rgb_u8(52, 56, 66),
            floor: Color::from_rgb_u8(232, 228, 218),
            floor_alternate: Color::from_rgb_u8(214, 208, 196),
            blocks: vec![
                Color::from_rgb_u8(220, 76, 70),
                Color::from_rgb_u8(64, 132, 214),
                Color::from_rgb_u8(88, 176, 92),
                Color::from_rgb_u8(236, 180, 48),
                Color::from_rgb_u8(156, 92, 196),
            ],
            teleport: Color::from_rgb_u8(60, 196, 204),
            pit: Color::from_rgb_u8(24, 20, 20),
            stopper: Color::from_rgb_u8(150, 110, 70),
            breaker: Color::from_rgb_u8(230, 120, 40),
            invisibility: Color::from_rgb_u8(180, 180, 200),
        }
    }
}

/// Describes the cell board that can be rendered by adapters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardPresentation {
    /// Number of columns contained in the board, border included.
    pub columns: u32,
    /// Number of rows contained in the board, border included.
    pub rows: u32,
    /// Side length of a single cell expressed in world units.
    pub cell_length: f32,
    /// Whether the floor alternates colors like a chess board.
    pub chess_background: bool,
}

impl BoardPresentation {
    /// Creates a new board descriptor.
    ///
    /// Returns an error when `cell_length` is not a positive finite number.
    pub fn new(
        columns: u32,
        rows: u32,
        cell_length: f32,
        chess_background: bool,
    ) -> Result<Self, RenderingError> {
        if !cell_length.is_finite() || cell_length <= 0.0 {
            return Err(RenderingError::InvalidCellLength { cell_length });
        }

        Ok(Self {
            columns,
            rows,
            cell_length,
            chess_background,
        })
    }

    /// Calculates the total width of the board.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Calculates the total height of the board.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }

    /// World-space center of the provided cell. Row zero sits at the bottom.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            (cell.column() as f32 + 0.5) * self.cell_length,
            (cell.row() as f32 + 0.5) * self.cell_length,
        )
    }

    /// Floor color of the provided cell.
    #[must_use]
    pub fn floor_color(&self, cell: CellCoord, palette: &Palette) -> Color {
        if self.chess_background && (cell.column() + cell.row()) % 2 == 1 {
            palette.floor_alternate
        } else {
            palette.floor
        }
    }
}

/// What an adapter should draw in a single cell, from the top layer down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    /// Nothing but the floor.
    Floor,
    /// Wall cell.
    Wall,
    /// Finish marker of the provided block.
    Finish(BlockId),
    /// Visible special tile.
    Tile(TileKind),
    /// Block resting on the cell.
    Block(BlockId),
}

/// Block as presented within the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockPresentation {
    /// Identifier of the block.
    pub id: BlockId,
    /// Cell the block rests on.
    pub cell: CellCoord,
    /// Fill color.
    pub color: Color,
    /// Whether the block is the active selection.
    pub selected: bool,
    /// Whether the block rests on an accepted finish cell.
    pub finished: bool,
    /// Whether the block still accepts moves.
    pub controllable: bool,
    /// Cosmetic slide speed in cells per second.
    pub speed: f32,
}

/// Finish cell marker tinted with its block's color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FinishMarker {
    /// Block the finish cell belongs to.
    pub block: BlockId,
    /// Finish cell.
    pub cell: CellCoord,
    /// Marker color at [`FINISH_MARKER_ALPHA`].
    pub color: Color,
}

/// Active special tile as presented within the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePresentation {
    /// Identifier of the tile.
    pub id: TileId,
    /// Behaviour of the tile.
    pub kind: TileKind,
    /// Primary cell.
    pub cell: CellCoord,
    /// Paired teleport cell.
    pub pair: Option<CellCoord>,
    /// Fill color. Hidden invisibility tiles are fully transparent.
    pub color: Color,
}

/// Scene description combining the board, walls, tiles and blocks.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Board that composes the play area.
    pub board: BoardPresentation,
    /// Wall cells, border included.
    pub walls: Vec<CellCoord>,
    /// Finish markers for every block.
    pub finishes: Vec<FinishMarker>,
    /// Active special tiles.
    pub tiles: Vec<TilePresentation>,
    /// Blocks in identifier order.
    pub blocks: Vec<BlockPresentation>,
}

impl Scene {
    /// Builds a scene from session snapshots.
    #[must_use]
    pub fn from_snapshots(
        board: BoardPresentation,
        grid: GridView<'_>,
        blocks: &BlockView,
        tiles: TileView<'_>,
        selected: Option<BlockId>,
        palette: &Palette,
    ) -> Self {
        let mut walls = Vec::new();
        for row in 0..board.rows {
            for column in 0..board.columns {
                let cell = CellCoord::new(column, row);
                if grid.is_wall(cell) {
                    walls.push(cell);
                }
            }
        }

        let finishes = blocks
            .iter()
            .flat_map(|block| {
                let color = palette.block(block.id).with_alpha(FINISH_MARKER_ALPHA);
                block.finish_cells().map(move |cell| FinishMarker {
                    block: block.id,
                    cell,
                    color,
                })
            })
            .collect();

        let tiles = tiles
            .iter()
            .filter(|tile| tile.active)
            .map(|tile| {
                let base = palette.tile(tile.kind);
                let color = if tile.kind == TileKind::Invisibility && !tile.visible {
                    base.with_alpha(0.0)
                } else {
                    base
                };
                TilePresentation {
                    id: tile.id,
                    kind: tile.kind,
                    cell: tile.cell,
                    pair: tile.pair,
                    color,
                }
            })
            .collect();

        let blocks = blocks
            .iter()
            .map(|block| BlockPresentation {
                id: block.id,
                cell: block.cell,
                color: palette.block(block.id),
                selected: selected == Some(block.id),
                finished: block.finished,
                controllable: block.controllable,
                speed: block.speed,
            })
            .collect();

        Self {
            board,
            walls,
            finishes,
            tiles,
            blocks,
        }
    }

    /// Returns the topmost glyph visible in the provided cell.
    ///
    /// Blocks cover tiles, tiles cover finish markers, and finish markers
    /// cover walls. Transparent tiles are skipped.
    #[must_use]
    pub fn glyph_at(&self, cell: CellCoord) -> Glyph {
        if let Some(block) = self.blocks.iter().find(|block| block.cell == cell) {
            return Glyph::Block(block.id);
        }
        if let Some(tile) = self
            .tiles
            .iter()
            .filter(|tile| !tile.color.is_transparent())
            .filter(|tile| tile.cell == cell || tile.pair == Some(cell))
            .min_by_key(|tile| tile.kind.precedence())
        {
            return Glyph::Tile(tile.kind);
        }
        if let Some(marker) = self.finishes.iter().find(|marker| marker.cell == cell) {
            return Glyph::Finish(marker.block);
        }
        if self.walls.contains(&cell) {
            Glyph::Wall
        } else {
            Glyph::Floor
        }
    }

    /// Glyph rows ordered top to bottom, as text front ends print them.
    #[must_use]
    pub fn glyph_rows(&self) -> Vec<Vec<Glyph>> {
        (0..self.board.rows)
            .rev()
            .map(|row| {
                (0..self.board.columns)
                    .map(|column| self.glyph_at(CellCoord::new(column, row)))
                    .collect()
            })
            .collect()
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cells must have a positive finite side length.
    InvalidCellLength {
        /// Provided length that failed validation.
        cell_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellLength { cell_length } => {
                write!(
                    f,
                    "cell_length must be a positive finite number (received {cell_length})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
