use std::collections::HashSet;

use rand::SeedableRng;
use torus_life::LifeError;
use torus_life::torus::{
    Cell, Grid, KernelBackend, Phase, RuleTable, TorusLife, TorusLifeConfig, advance,
    count_alive_neighbors, next_state,
};

fn engine(rows: i64, cols: i64, steps: i64) -> TorusLife {
    TorusLife::with_config(TorusLifeConfig::default().rows(rows).cols(cols).steps(steps))
        .expect("valid config")
}

fn live(engine: &TorusLife) -> HashSet<(usize, usize)> {
    engine.current().live_cells().into_iter().collect()
}

fn cells(list: &[(usize, usize)]) -> HashSet<(usize, usize)> {
    list.iter().copied().collect()
}

#[test]
fn block_is_stable() {
    let mut engine = engine(6, 6, 10);
    engine.current_mut().place(3, 3, &[(0, 0), (0, 1), (1, 0), (1, 1)]);
    let block = cells(&[(3, 3), (3, 4), (4, 3), (4, 4)]);

    for _ in 0..10 {
        assert!(engine.step());
        assert_eq!(live(&engine), block);
    }
}

#[test]
fn block_straddling_the_corner_is_stable() {
    let mut engine = engine(4, 4, 6);
    engine.current_mut().place(4, 4, &[(0, 0), (0, 1), (1, 0), (1, 1)]);
    let block = cells(&[(1, 1), (1, 4), (4, 1), (4, 4)]);
    assert_eq!(live(&engine), block);

    engine.step_n(6);
    assert_eq!(live(&engine), block);
}

#[test]
fn blinker_oscillates() {
    let mut engine = engine(5, 5, 4);
    engine.current_mut().place(3, 2, &[(0, 0), (0, 1), (0, 2)]);
    let horizontal = cells(&[(3, 2), (3, 3), (3, 4)]);
    let vertical = cells(&[(2, 3), (3, 3), (4, 3)]);

    engine.step();
    assert_eq!(live(&engine), vertical);
    engine.step();
    assert_eq!(live(&engine), horizontal);
    engine.step();
    assert_eq!(live(&engine), vertical);
    engine.step();
    assert_eq!(live(&engine), horizontal);
}

#[test]
fn blinker_across_the_seam_oscillates() {
    let mut engine = engine(5, 5, 2);
    // Row 3, columns 4, 5 and 1.
    engine.current_mut().place(3, 4, &[(0, 0), (0, 1), (0, 2)]);

    engine.step();
    assert_eq!(live(&engine), cells(&[(2, 5), (3, 5), (4, 5)]));
    engine.step();
    assert_eq!(live(&engine), cells(&[(3, 4), (3, 5), (3, 1)]));
}

#[test]
fn glider_returns_after_circling_the_torus() {
    let mut engine = engine(8, 8, 32);
    let glider = [(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)];
    engine.current_mut().place(2, 2, &glider);
    let start = live(&engine);

    engine.step_n(4);
    let shifted: HashSet<_> = start.iter().map(|&(r, c)| (r + 1, c + 1)).collect();
    assert_eq!(live(&engine), shifted);

    engine.step_n(28);
    assert_eq!(engine.phase(), Phase::Done);
    assert_eq!(live(&engine), start);
}

#[test]
fn one_step_is_deterministic() {
    let mut grid = Grid::new(11, 7).unwrap();
    let mut rng = rand::rngs::StdRng::seed_from_u64(0xD37E_A515);
    grid.randomize(&mut rng);
    grid.sync_boundary();

    let table = RuleTable::new();
    let mut first = Grid::new(11, 7).unwrap();
    let mut second = Grid::new(11, 7).unwrap();
    advance(&grid, &mut first, &table, KernelBackend::Scalar);
    advance(&grid, &mut second, &table, KernelBackend::Scalar);
    assert_eq!(first.live_cells(), second.live_cells());
}

#[test]
fn next_buffer_contents_never_leak_into_counts() {
    let mut current = Grid::new(9, 9).unwrap();
    let mut rng = rand::rngs::StdRng::seed_from_u64(0xB0FF);
    current.randomize(&mut rng);
    current.sync_boundary();
    let frozen = current.clone();

    // Oracle: every count taken from the frozen snapshot.
    let mut expected = Vec::new();
    for r in 1..=9 {
        for c in 1..=9 {
            let n = count_alive_neighbors(&frozen, r, c);
            if next_state(frozen.get(r, c), n).is_alive() {
                expected.push((r, c));
            }
        }
    }

    let table = RuleTable::new();
    for backend in [KernelBackend::Scalar, KernelBackend::Parallel] {
        let mut next = Grid::new(9, 9).unwrap();
        for r in 0..=10 {
            for c in 0..=10 {
                next.set(r, c, Cell::Alive);
            }
        }
        advance(&current, &mut next, &table, backend);
        assert_eq!(next.live_cells(), expected, "{backend:?}");
        assert_eq!(current, frozen, "{backend:?} mutated the current buffer");
    }
}

#[test]
fn each_frame_is_synced_and_last_generation_is_not_shown() {
    let mut engine = engine(6, 5, 3);
    engine.current_mut().place(3, 2, &[(0, 0), (0, 1), (0, 2)]);
    let initial = engine.current().live_cells();

    let mut frames = Vec::new();
    let summary = engine
        .run_with(|frame| {
            assert!(frame.grid.is_boundary_synced());
            frames.push((frame.step, frame.grid.live_cells()));
            Ok(())
        })
        .unwrap();

    assert_eq!(summary.generations, 3);
    let steps: Vec<u64> = frames.iter().map(|(s, _)| *s).collect();
    assert_eq!(steps, [0, 1, 2]);
    assert_eq!(frames[0].1, initial);
    assert_eq!(frames[2].1, initial);
    // Generation 3 is vertical and was never handed out.
    assert_ne!(engine.current().live_cells(), initial);
    assert!(!engine.step());
}

#[test]
fn observer_error_stops_the_run() {
    let mut engine = engine(3, 3, 5);
    let mut seen = 0;
    let result = engine.run_with(|_| {
        seen += 1;
        if seen == 2 {
            Err(LifeError::Io(std::io::Error::other("sink closed")))
        } else {
            Ok(())
        }
    });
    assert!(matches!(result, Err(LifeError::Io(_))));
    assert_eq!(engine.generation(), 1);
}

#[test]
fn zero_dimensions_are_rejected_before_allocation() {
    for config in [
        TorusLifeConfig::default().rows(0).cols(i64::MAX),
        TorusLifeConfig::default().cols(0).rows(i64::MAX),
        TorusLifeConfig::default().steps(0).rows(i64::MAX).cols(i64::MAX),
    ] {
        match TorusLife::with_config(config) {
            Err(LifeError::Config(err)) => assert_eq!(err.violations.len(), 1),
            Err(other) => panic!("expected config error, got {other}"),
            Ok(_) => panic!("expected config error"),
        }
    }
}

#[test]
fn unallocatable_grid_names_the_current_buffer() {
    let config = TorusLifeConfig::default().rows(i64::MAX).cols(i64::MAX);
    match TorusLife::with_config(config) {
        Err(LifeError::Allocation { operation }) => assert_eq!(operation, "malloc(current_grid)"),
        Err(other) => panic!("expected allocation error, got {other}"),
        Ok(_) => panic!("expected allocation error"),
    }
}

#[test]
fn seeded_initial_state_ignores_ghost_border() {
    let mut engine = TorusLife::with_config(TorusLifeConfig::default().rows(7).cols(7).seed(9))
        .unwrap();
    engine.seed_from_config();
    let grid = engine.current();
    for i in 0..=8 {
        assert_eq!(grid.get(0, i), Cell::Dead);
        assert_eq!(grid.get(i, 0), Cell::Dead);
    }
}
