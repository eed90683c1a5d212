//! Fixed-width text snapshots of a generation, ghost border included.
//!
//! Layout for the 2x2 diagonal `#.`/`.#` at step 0:
//!
//! ```text
//! Time Step 0:
//! 1 | 0 1 | 0
//! - - - - - -
//! 0 | 1 0 | 1
//! 1 | 0 1 | 0
//! - - - - - -
//! 0 | 1 0 | 1
//! ```
//!
//! Every token is followed by a single space, trailing one included.

use std::io::{self, Write};

use super::cell::Cell;
use super::grid::Grid;
use crate::error::LifeError;
use crate::torus::engine::Frame;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TokenStyle {
    /// `1` alive, `0` dead.
    #[default]
    Digits,
    /// `#` alive, `.` dead.
    Markers,
}

impl TokenStyle {
    #[inline]
    pub fn token(self, cell: Cell) -> char {
        match (self, cell) {
            (TokenStyle::Digits, Cell::Alive) => '1',
            (TokenStyle::Digits, Cell::Dead) => '0',
            (TokenStyle::Markers, Cell::Alive) => '#',
            (TokenStyle::Markers, Cell::Dead) => '.',
        }
    }
}

fn push_rule(out: &mut String, cols: usize) {
    // Stored width plus the two bar tokens.
    for _ in 0..cols + 4 {
        out.push_str("- ");
    }
    out.push('\n');
}

/// Render `grid` under a `Time Step {step}:` header.
///
/// The grid should be synced first; the ghost border is printed as is.
pub fn render_frame(grid: &Grid, step: u64, style: TokenStyle) -> String {
    let (rows, cols) = (grid.rows(), grid.cols());
    let mut out = String::with_capacity((rows + 4) * (2 * cols + 10) + 16);
    out.push_str(&format!("Time Step {step}:\n"));

    for r in 0..=rows + 1 {
        if r == 1 {
            push_rule(&mut out, cols);
        }

        for (c, &cell) in grid.row(r).iter().enumerate() {
            if c == 1 {
                out.push_str("| ");
            }
            out.push(style.token(cell));
            out.push(' ');
            if c == cols {
                out.push_str("| ");
            }
        }
        out.push('\n');

        if r == rows {
            push_rule(&mut out, cols);
        }
    }
    out
}

/// Writes rendered frames to a sink, flushing after each one.
pub struct Renderer<W: Write> {
    out: W,
    style: TokenStyle,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, style: TokenStyle) -> Self {
        Self { out, style }
    }

    pub fn write_frame(&mut self, frame: Frame<'_>) -> Result<(), LifeError> {
        let text = render_frame(frame.grid, frame.step, self.style);
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl Renderer<io::Stdout> {
    pub fn stdout(style: TokenStyle) -> Self {
        Self::new(io::stdout(), style)
    }
}
