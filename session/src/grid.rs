//! Layered occupancy grid owned by the session.

use blockslide_core::{BlockId, CellCoord, GridView};

/// Dense wall and block layers covering the whole level.
///
/// Border cells are always walls. Walls and blocks live in separate layers so
/// a block that passes through walls can rest on one without erasing it.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    columns: u32,
    rows: u32,
    walls: Vec<bool>,
    occupants: Vec<Option<BlockId>>,
}

impl Grid {
    /// Creates a bordered grid with the provided interior walls.
    pub(crate) fn new(columns: u32, rows: u32, interior_walls: &[CellCoord]) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        let mut grid = Self {
            columns,
            rows,
            walls: vec![false; capacity],
            occupants: vec![None; capacity],
        };

        for row in 0..rows {
            for column in 0..columns {
                let cell = CellCoord::new(column, row);
                if is_border(cell, columns, rows) {
                    grid.set_wall(cell);
                }
            }
        }
        for &cell in interior_walls {
            grid.set_wall(cell);
        }

        grid
    }

    /// Writes the block layer of a single cell.
    pub(crate) fn set_occupied(&mut self, cell: CellCoord, occupant: Option<BlockId>) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.occupants.get_mut(index) {
                *slot = occupant;
            }
        }
    }

    /// Moves a block between two cells.
    pub(crate) fn relocate(&mut self, block: BlockId, from: CellCoord, to: CellCoord) {
        if self.view().occupant(from) == Some(block) {
            self.set_occupied(from, None);
        }
        self.set_occupied(to, Some(block));
    }

    /// Captures a read-only view of both layers.
    pub(crate) fn view(&self) -> GridView<'_> {
        GridView::new(&self.walls, &self.occupants, self.columns, self.rows)
    }

    fn set_wall(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.walls.get_mut(index) {
                *slot = true;
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Reports whether the cell lies on the outermost ring of the level.
pub(crate) fn is_border(cell: CellCoord, columns: u32, rows: u32) -> bool {
    cell.column() == 0
        || cell.row() == 0
        || cell.column() + 1 >= columns
        || cell.row() + 1 >= rows
}
