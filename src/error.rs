//! Error types for torus-life.

use std::fmt;
use std::io;

use thiserror::Error;

/// A single configuration value that fell below its minimum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinimumViolation {
    /// Singular name of the parameter ("row", "column", "time step").
    pub name: &'static str,
    pub actual: i64,
    pub minimum: i64,
}

fn pluralize(value: i64) -> &'static str {
    if value != 1 { "s" } else { "" }
}

impl fmt::Display for MinimumViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ERROR: {} {}{}; need at least {} {}{}",
            self.actual,
            self.name,
            pluralize(self.actual),
            self.minimum,
            self.name,
            pluralize(self.minimum),
        )
    }
}

/// Every minimum violated by a configuration, in parameter order.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{}", join_lines(.violations))]
pub struct ConfigError {
    pub violations: Vec<MinimumViolation>,
}

fn join_lines(violations: &[MinimumViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl ConfigError {
    /// Check `actual >= minimum`, recording a violation if it isn't.
    pub(crate) fn check(
        violations: &mut Vec<MinimumViolation>,
        name: &'static str,
        actual: i64,
        minimum: i64,
    ) {
        if actual < minimum {
            violations.push(MinimumViolation {
                name,
                actual,
                minimum,
            });
        }
    }
}

/// Errors surfaced by the engine and renderer.
#[derive(Debug, Error)]
pub enum LifeError {
    /// Rows, columns or steps below their minimum.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// A grid buffer could not be allocated.
    #[error("ERROR in {operation}")]
    Allocation { operation: &'static str },

    /// The worker pool for the parallel kernel could not be started.
    #[error("ERROR in rayon::ThreadPoolBuilder::build: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Writing a rendered frame failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl LifeError {
    pub fn allocation(operation: &'static str) -> Self {
        Self::Allocation { operation }
    }
}
