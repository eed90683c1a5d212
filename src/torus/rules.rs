//! B3/S23 transition rule and its lookup table.

use super::cell::Cell;

/// Largest possible Moore-neighborhood count.
pub const MAX_NEIGHBORS: u8 = 8;

/// Which clause of the rule decided a cell's next state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Fewer than two live neighbors.
    Underpopulation,
    /// Live cell with two or three live neighbors.
    Survival,
    /// More than three live neighbors.
    Overpopulation,
    /// Dead cell with exactly three live neighbors.
    Birth,
    Unchanged,
}

impl Transition {
    #[inline]
    pub const fn apply(self, current: Cell) -> Cell {
        match self {
            Transition::Underpopulation | Transition::Overpopulation => Cell::Dead,
            Transition::Survival | Transition::Birth => Cell::Alive,
            Transition::Unchanged => current,
        }
    }
}

/// Classify `(current, alive_neighbors)`, checking clauses in order so
/// that birth and survival never both apply.
pub const fn classify(current: Cell, alive_neighbors: u8) -> Transition {
    if alive_neighbors < 2 {
        Transition::Underpopulation
    } else if current.is_alive() && (alive_neighbors == 2 || alive_neighbors == 3) {
        Transition::Survival
    } else if alive_neighbors > 3 {
        Transition::Overpopulation
    } else if !current.is_alive() && alive_neighbors == 3 {
        Transition::Birth
    } else {
        Transition::Unchanged
    }
}

#[inline]
pub const fn next_state(current: Cell, alive_neighbors: u8) -> Cell {
    classify(current, alive_neighbors).apply(current)
}

/// Precomputed next states indexed by `[current][alive_neighbors]`.
pub struct RuleTable {
    table: [[Cell; MAX_NEIGHBORS as usize + 1]; 2],
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleTable {
    pub fn new() -> Self {
        let mut table = [[Cell::Dead; MAX_NEIGHBORS as usize + 1]; 2];
        for (state, row) in [Cell::Dead, Cell::Alive].into_iter().zip(table.iter_mut()) {
            for (count, slot) in row.iter_mut().enumerate() {
                *slot = next_state(state, count as u8);
            }
        }
        Self { table }
    }

    /// Panics if `alive_neighbors` exceeds [`MAX_NEIGHBORS`].
    #[inline(always)]
    pub fn lookup(&self, current: Cell, alive_neighbors: u8) -> Cell {
        self.table[current as usize][alive_neighbors as usize]
    }
}
