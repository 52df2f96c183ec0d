//! Play-area grid and the player's cell selection
//!
//! The grid spans the full play width in `columns` square cells; rows fill as
//! much of the play height as fits. Cells are addressed `(row, col)` from the
//! top-left corner.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_GRID_CELLS;

/// A grid cell address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

impl Cell {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// Fixed partition of the play area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub columns: u32,
    pub rows: u32,
    pub cell_size: f64,
}

impl Grid {
    /// Rows are clamped so the grid never exceeds `MAX_GRID_CELLS` cells
    pub fn new(play_width: f64, play_height: f64, columns: u32) -> Self {
        let columns = columns.clamp(1, MAX_GRID_CELLS);
        let cell_size = play_width / columns as f64;
        let rows = ((play_height / cell_size).floor() as u32).clamp(1, MAX_GRID_CELLS / columns);
        Self {
            columns,
            rows,
            cell_size,
        }
    }

    /// Total number of cells (`rows * columns`)
    pub fn cell_count(&self) -> u32 {
        self.rows.saturating_mul(self.columns)
    }

    /// Height actually covered by rows
    pub fn height(&self) -> f64 {
        self.rows as f64 * self.cell_size
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.columns
    }

    /// Cell containing the world point, `None` outside the grid
    pub fn locate(&self, x: f64, y: f64) -> Option<Cell> {
        let col = (x / self.cell_size).floor();
        let row = (y / self.cell_size).floor();
        // NaN fails both comparisons and lands here too
        if !(col >= 0.0 && col < self.columns as f64 && row >= 0.0 && row < self.rows as f64) {
            return None;
        }
        Some(Cell::new(row as u32, col as u32))
    }

    /// Fresh empty selection sized to this grid
    pub fn selection(&self) -> Selection {
        Selection::new(self)
    }
}

/// Set of marked cells, dense over the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    columns: u32,
    marked: Vec<bool>,
    count: usize,
}

impl Selection {
    pub fn new(grid: &Grid) -> Self {
        Self {
            columns: grid.columns,
            marked: vec![false; grid.cell_count() as usize],
            count: 0,
        }
    }

    fn slot(&self, cell: Cell) -> Option<usize> {
        if cell.col >= self.columns {
            return None;
        }
        let idx = (cell.row as usize) * (self.columns as usize) + cell.col as usize;
        (idx < self.marked.len()).then_some(idx)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.slot(cell).is_some_and(|i| self.marked[i])
    }

    /// Mark a cell. Returns false if it was already marked or off-grid.
    pub fn insert(&mut self, cell: Cell) -> bool {
        match self.slot(cell) {
            Some(i) if !self.marked[i] => {
                self.marked[i] = true;
                self.count += 1;
                true
            }
            _ => false,
        }
    }

    /// Flip a cell. Returns false only for off-grid cells.
    pub fn toggle(&mut self, cell: Cell) -> bool {
        let Some(i) = self.slot(cell) else {
            return false;
        };
        self.marked[i] = !self.marked[i];
        if self.marked[i] {
            self.count += 1;
        } else {
            self.count -= 1;
        }
        true
    }

    pub fn clear(&mut self) {
        self.marked.fill(false);
        self.count = 0;
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Marked cells in row-major order
    pub fn cells(&self) -> Vec<Cell> {
        let columns = self.columns as usize;
        self.marked
            .iter()
            .enumerate()
            .filter(|(_, m)| **m)
            .map(|(i, _)| Cell::new((i / columns) as u32, (i % columns) as u32))
            .collect()
    }
}
