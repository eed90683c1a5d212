//! Conway's Game of Life (B3/S23) on a toroidal grid with ghost-cell borders.

pub mod error;
pub mod torus;
pub use error::{ConfigError, LifeError, MinimumViolation};
pub use torus::{Grid, KernelBackend, TorusLife, TorusLifeConfig};
