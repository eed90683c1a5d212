//! Toroidal grid engine internals and public API.

mod cell;
mod engine;
mod grid;
mod kernel;
mod render;
mod rules;

pub use cell::Cell;
pub use engine::{
    DEFAULT_COLUMNS, DEFAULT_ROWS, DEFAULT_TIME_STEPS, Dimensions, Frame, MINIMUM_COLUMNS,
    MINIMUM_ROWS, MINIMUM_TIME_STEPS, Phase, RunSummary, TorusLife, TorusLifeConfig,
};
pub use grid::Grid;
pub use kernel::{KernelBackend, advance, count_alive_neighbors};
pub use render::{Renderer, TokenStyle, render_frame};
pub use rules::{MAX_NEIGHBORS, RuleTable, Transition, classify, next_state};
