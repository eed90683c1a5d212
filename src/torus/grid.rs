//! Toroidal cell grid with a one-cell ghost border.
//!
//! Storage is a single row-major buffer of `(rows + 2) * (cols + 2)` cells.
//! Real cells live at `[1, rows] x [1, cols]`; row 0, row `rows + 1`,
//! column 0 and column `cols + 1` mirror the opposite edge once
//! `sync_boundary` has run.

use rand::Rng;

use super::cell::Cell;
use crate::error::{ConfigError, LifeError};
use crate::torus::engine::{MINIMUM_COLUMNS, MINIMUM_ROWS};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocate an all-dead grid with room for the ghost border.
    pub fn new(rows: usize, cols: usize) -> Result<Self, LifeError> {
        Self::allocate(rows, cols, "malloc(grid)")
    }

    /// Like [`Grid::new`], naming `operation` if the allocation fails.
    pub(crate) fn allocate(
        rows: usize,
        cols: usize,
        operation: &'static str,
    ) -> Result<Self, LifeError> {
        let mut violations = Vec::new();
        ConfigError::check(&mut violations, "row", saturating_i64(rows), MINIMUM_ROWS);
        ConfigError::check(&mut violations, "column", saturating_i64(cols), MINIMUM_COLUMNS);
        if !violations.is_empty() {
            return Err(ConfigError { violations }.into());
        }

        let len = rows
            .checked_add(2)
            .zip(cols.checked_add(2))
            .and_then(|(r, c)| r.checked_mul(c))
            .ok_or(LifeError::allocation(operation))?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| LifeError::allocation(operation))?;
        cells.resize(len, Cell::Dead);

        Ok(Self { rows, cols, cells })
    }

    /// Build a grid from `#`/`.` art, one string per real row.
    ///
    /// Any character other than `#` or `O` is dead. Rows shorter than the
    /// widest row are padded with dead cells.
    pub fn from_rows(rows: &[&str]) -> Result<Self, LifeError> {
        let cols = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut grid = Self::new(rows.len(), cols)?;
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                grid.set(r + 1, c + 1, Cell::from(ch == '#' || ch == 'O'));
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Width of one stored row, ghost columns included.
    #[inline]
    pub fn stride(&self) -> usize {
        self.cols + 2
    }

    #[inline(always)]
    fn index(&self, r: usize, c: usize) -> usize {
        assert!(
            r <= self.rows + 1 && c <= self.cols + 1,
            "cell ({r}, {c}) outside grid extent [0, {}] x [0, {}]",
            self.rows + 1,
            self.cols + 1
        );
        r * self.stride() + c
    }

    /// Read any cell, ghost border included. Panics when out of range.
    #[inline]
    pub fn get(&self, r: usize, c: usize) -> Cell {
        self.cells[self.index(r, c)]
    }

    /// Write any cell, ghost border included. Panics when out of range.
    #[inline]
    pub fn set(&mut self, r: usize, c: usize, cell: Cell) {
        let idx = self.index(r, c);
        self.cells[idx] = cell;
    }

    /// One stored row including both ghost columns.
    #[inline]
    pub fn row(&self, r: usize) -> &[Cell] {
        let start = self.index(r, 0);
        &self.cells[start..start + self.stride()]
    }

    pub(crate) fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Assign every real cell alive or dead with equal probability.
    /// Ghost cells are left as they are until the next sync.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for r in 1..=self.rows {
            for c in 1..=self.cols {
                let cell = Cell::from(rng.random_bool(0.5));
                self.set(r, c, cell);
            }
        }
    }

    /// Mark a set of `(row, col)` offsets alive relative to the real cell
    /// `(top, left)`, wrapping around both axes. `top` and `left` are
    /// 1-based like every other real-cell index.
    pub fn place(&mut self, top: usize, left: usize, offsets: &[(usize, usize)]) {
        assert!(
            (1..=self.rows).contains(&top) && (1..=self.cols).contains(&left),
            "anchor ({top}, {left}) outside real cells [1, {}] x [1, {}]",
            self.rows,
            self.cols
        );
        for &(dr, dc) in offsets {
            let r = (top - 1 + dr) % self.rows + 1;
            let c = (left - 1 + dc) % self.cols + 1;
            self.set(r, c, Cell::Alive);
        }
    }

    /// Re-establish the toroidal mirror in the ghost border.
    ///
    /// Ghost rows are written across the full stored width first, then
    /// ghost columns across the full stored height, so the four corners
    /// pick up the diagonally opposite real cell.
    pub fn sync_boundary(&mut self) {
        let stride = self.stride();
        let (rows, cols) = (self.rows, self.cols);

        let bottom_real = rows * stride;
        let bottom_ghost = (rows + 1) * stride;
        self.cells.copy_within(bottom_real..bottom_real + stride, 0);
        self.cells.copy_within(stride..2 * stride, bottom_ghost);

        for row in self.cells.chunks_exact_mut(stride) {
            row[0] = row[cols];
            row[cols + 1] = row[1];
        }
    }

    /// Whether every ghost cell currently mirrors its opposite real cell.
    pub fn is_boundary_synced(&self) -> bool {
        let (rows, cols) = (self.rows, self.cols);
        let rows_ok = (0..=cols + 1).all(|c| {
            self.get(0, c) == self.get(rows, c) && self.get(rows + 1, c) == self.get(1, c)
        });
        let cols_ok = (0..=rows + 1).all(|r| {
            self.get(r, 0) == self.get(r, cols) && self.get(r, cols + 1) == self.get(r, 1)
        });
        rows_ok && cols_ok
    }

    /// Number of live real cells.
    pub fn population(&self) -> u64 {
        (1..=self.rows)
            .map(|r| {
                self.row(r)[1..=self.cols]
                    .iter()
                    .filter(|cell| cell.is_alive())
                    .count() as u64
            })
            .sum()
    }

    /// Live real cells as 1-based `(row, col)` pairs, row-major.
    pub fn live_cells(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for r in 1..=self.rows {
            for c in 1..=self.cols {
                if self.get(r, c).is_alive() {
                    out.push((r, c));
                }
            }
        }
        out
    }
}

fn saturating_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
