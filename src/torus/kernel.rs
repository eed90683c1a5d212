//! Generation pass: neighbor counting and next-state evaluation.
//!
//! Reads only from the current (synced) grid and writes only the real
//! cells of the next grid, so rows are independent and the parallel
//! backend can hand disjoint row slices to rayon workers.

use rayon::prelude::*;

use super::cell::Cell;
use super::grid::Grid;
use super::rules::RuleTable;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KernelBackend {
    Scalar,
    Parallel,
}

impl KernelBackend {
    pub fn name(self) -> &'static str {
        match self {
            KernelBackend::Scalar => "scalar",
            KernelBackend::Parallel => "parallel",
        }
    }
}

impl std::str::FromStr for KernelBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scalar" => Ok(KernelBackend::Scalar),
            "parallel" => Ok(KernelBackend::Parallel),
            other => Err(format!(
                "unknown kernel backend: {other} (expected scalar or parallel)"
            )),
        }
    }
}

/// Live cells among the 8 neighbors of `(r, c)`.
///
/// `(r, c)` must be a real cell; at the edges this reads the ghost border,
/// which the caller is expected to have synced.
#[inline]
pub fn count_alive_neighbors(grid: &Grid, r: usize, c: usize) -> u8 {
    let mut alive = 0u8;
    for nr in (r - 1)..=(r + 1) {
        for nc in (c - 1)..=(c + 1) {
            if nr == r && nc == c {
                continue;
            }
            alive += grid.get(nr, nc).is_alive() as u8;
        }
    }
    alive
}

/// Evaluate one stored row `r` of `current` into `out`, which must be the
/// matching stored row of the next buffer. Returns the changed-cell count.
#[inline(always)]
fn advance_row(
    current: &[Cell],
    stride: usize,
    cols: usize,
    r: usize,
    table: &RuleTable,
    out: &mut [Cell],
) -> u64 {
    let above = &current[(r - 1) * stride..r * stride];
    let here = &current[r * stride..(r + 1) * stride];
    let below = &current[(r + 1) * stride..(r + 2) * stride];

    let mut changed = 0u64;
    for c in 1..=cols {
        let alive = above[c - 1].digit()
            + above[c].digit()
            + above[c + 1].digit()
            + here[c - 1].digit()
            + here[c + 1].digit()
            + below[c - 1].digit()
            + below[c].digit()
            + below[c + 1].digit();
        let next = table.lookup(here[c], alive);
        changed += (next != here[c]) as u64;
        out[c] = next;
    }
    changed
}

fn advance_scalar(current: &Grid, next: &mut Grid, table: &RuleTable) -> u64 {
    let (rows, cols, stride) = (current.rows(), current.cols(), current.stride());
    let src = current.cells();
    let dst = &mut next.cells_mut()[stride..(rows + 1) * stride];

    let mut changed = 0;
    for (i, out) in dst.chunks_exact_mut(stride).enumerate() {
        changed += advance_row(src, stride, cols, i + 1, table, out);
    }
    changed
}

fn advance_parallel(current: &Grid, next: &mut Grid, table: &RuleTable) -> u64 {
    let (rows, cols, stride) = (current.rows(), current.cols(), current.stride());
    let src = current.cells();
    let dst = &mut next.cells_mut()[stride..(rows + 1) * stride];

    dst.par_chunks_exact_mut(stride)
        .enumerate()
        .map(|(i, out)| advance_row(src, stride, cols, i + 1, table, out))
        .sum()
}

/// Compute the next generation of every real cell of `current` into
/// `next`. The ghost border of `next` is not written.
///
/// Returns how many real cells changed state.
pub fn advance(
    current: &Grid,
    next: &mut Grid,
    table: &RuleTable,
    backend: KernelBackend,
) -> u64 {
    assert_eq!(
        (current.rows(), current.cols()),
        (next.rows(), next.cols()),
        "current and next buffers differ in size"
    );
    debug_assert!(current.is_boundary_synced(), "advance on an unsynced grid");

    match backend {
        KernelBackend::Scalar => advance_scalar(current, next, table),
        KernelBackend::Parallel => advance_parallel(current, next, table),
    }
}
