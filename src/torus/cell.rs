//! Two-valued cell state.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Dead = 0,
    Alive = 1,
}

impl Cell {
    #[inline]
    pub const fn is_alive(self) -> bool {
        matches!(self, Cell::Alive)
    }

    /// Numeric token used by the digit renderer.
    #[inline]
    pub const fn digit(self) -> u8 {
        self as u8
    }
}

impl From<bool> for Cell {
    #[inline]
    fn from(alive: bool) -> Self {
        if alive { Cell::Alive } else { Cell::Dead }
    }
}

impl From<Cell> for bool {
    #[inline]
    fn from(cell: Cell) -> Self {
        cell.is_alive()
    }
}
