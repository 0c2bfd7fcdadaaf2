//! Land-use grid: a flat, row-major square of cells.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Side length of the reference grid.
pub const DEFAULT_GRID_SIZE: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Building,
    Tree,
    #[default]
    Empty,
}

impl Cell {
    /// Next kind in the edit cycle Empty -> Building -> Tree -> Empty.
    pub fn cycled(self) -> Self {
        match self {
            Cell::Empty => Cell::Building,
            Cell::Building => Cell::Tree,
            Cell::Tree => Cell::Empty,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Cell::Building => "building",
            Cell::Tree => "tree",
            Cell::Empty => "empty",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("cell index {index} is outside a grid of {len} cells")]
    OutOfBounds { index: usize, len: usize },
    #[error("a {size}x{size} grid cannot hold {len} cells")]
    Shape { size: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

#[derive(Deserialize)]
struct RawGrid {
    size: usize,
    cells: Vec<Cell>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = GridError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        Grid::from_cells(raw.size, raw.cells)
    }
}

impl Grid {
    /// All-empty grid of `size` x `size` cells.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Builds a grid from row-major cells; `cells.len()` must be `size * size`.
    pub fn from_cells(size: usize, cells: Vec<Cell>) -> Result<Self, GridError> {
        if size.checked_mul(size) != Some(cells.len()) {
            return Err(GridError::Shape {
                size,
                len: cells.len(),
            });
        }
        Ok(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.size && y < self.size);
        y * self.size + x
    }

    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.size, index / self.size)
    }

    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn set(&mut self, index: usize, cell: Cell) -> Result<(), GridError> {
        let len = self.cells.len();
        let slot = self
            .cells
            .get_mut(index)
            .ok_or(GridError::OutOfBounds { index, len })?;
        *slot = cell;
        Ok(())
    }

    pub fn set_at(&mut self, x: usize, y: usize, cell: Cell) {
        let i = self.index(x, y);
        self.cells[i] = cell;
    }

    /// Advances one cell through the edit cycle and returns its new kind.
    pub fn cycle(&mut self, index: usize) -> Result<Cell, GridError> {
        let len = self.cells.len();
        let slot = self
            .cells
            .get_mut(index)
            .ok_or(GridError::OutOfBounds { index, len })?;
        *slot = slot.cycled();
        Ok(*slot)
    }

    pub fn count(&self, kind: Cell) -> usize {
        self.cells.iter().filter(|&&cell| cell == kind).count()
    }

    /// In-bounds neighbours within Chebyshev distance `radius` of `index`,
    /// including the cell itself, as `(neighbour_index, dx, dy)`.
    pub fn window(
        &self,
        index: usize,
        radius: u32,
    ) -> impl Iterator<Item = (usize, i64, i64)> + '_ {
        let (x, y) = self.coords(index);
        let r = radius as usize;
        let last = self.size.saturating_sub(1);
        let (x0, x1) = (x.saturating_sub(r), x.saturating_add(r).min(last));
        let (y0, y1) = (y.saturating_sub(r), y.saturating_add(r).min(last));
        let n = self.size;
        (y0..=y1).flat_map(move |ny| {
            (x0..=x1).map(move |nx| {
                (
                    ny * n + nx,
                    nx as i64 - x as i64,
                    ny as i64 - y as i64,
                )
            })
        })
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE)
    }
}
