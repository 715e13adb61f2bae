//! Special tile registry and invisibility tile motion.

use blockslide_core::{
    CellCoord, CellState, Direction, Event, GridView, TileDefinition, TileId, TileKind,
    TileSnapshot, TileView,
};

/// Registry that stores every special tile of the level.
#[derive(Clone, Debug)]
pub(crate) struct TileRegistry {
    tiles: Vec<TileSnapshot>,
}

impl TileRegistry {
    /// Builds the registry from load-time definitions, assigning identifiers in order.
    pub(crate) fn from_definitions(definitions: &[TileDefinition]) -> Self {
        let tiles = definitions
            .iter()
            .enumerate()
            .map(|(index, definition)| TileSnapshot {
                id: TileId::new(u32::try_from(index).unwrap_or(u32::MAX)),
                kind: definition.kind,
                cell: definition.cell,
                pair: match definition.kind {
                    TileKind::Teleport => definition.pair,
                    _ => None,
                },
                active: definition.active,
                visible: true,
                symmetric: definition.symmetric,
                period: definition.period,
            })
            .collect();
        Self { tiles }
    }

    /// Returns the highest-precedence active tile covering the cell.
    pub(crate) fn tile_at(&self, cell: CellCoord) -> Option<&TileSnapshot> {
        self.view().active_at(cell)
    }

    /// Captures a read-only view of every tile.
    pub(crate) fn view(&self) -> TileView<'_> {
        TileView::new(&self.tiles)
    }

    /// Every tile in identifier order.
    pub(crate) fn snapshots(&self) -> &[TileSnapshot] {
        &self.tiles
    }

    /// Slides every active invisibility tile one cell and updates visibility.
    ///
    /// Symmetric tiles follow `direction`, the others move against it. A tile
    /// stays put when the destination is outside the level, a wall, a block,
    /// or covered by another active tile. Visibility flips whenever
    /// `applied_moves` is a multiple of the tile's period.
    pub(crate) fn advance_invisibility_tiles(
        &mut self,
        direction: Direction,
        applied_moves: u32,
        grid: GridView<'_>,
        out: &mut Vec<Event>,
    ) {
        for index in 0..self.tiles.len() {
            let tile = self.tiles[index];
            if !tile.active || tile.kind != TileKind::Invisibility {
                continue;
            }

            let heading = if tile.symmetric {
                direction
            } else {
                direction.opposite()
            };

            let destination = tile
                .cell
                .neighbor(heading)
                .filter(|cell| grid.classify(*cell) == CellState::Empty)
                .filter(|cell| !self.covered_by_other(tile.id, *cell));

            if let Some(to) = destination {
                self.tiles[index].cell = to;
                out.push(Event::InvisibilityTileShifted {
                    tile: tile.id,
                    from: tile.cell,
                    to,
                });
            }

            if tile.period > 0 && applied_moves % tile.period == 0 {
                let visible = !tile.visible;
                self.tiles[index].visible = visible;
                out.push(Event::InvisibilityTileToggled {
                    tile: tile.id,
                    visible,
                });
            }
        }
    }

    fn covered_by_other(&self, id: TileId, cell: CellCoord) -> bool {
        self.tiles
            .iter()
            .any(|tile| tile.id != id && tile.active && tile.covers(cell))
    }
}
