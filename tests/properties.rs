use proptest::prelude::*;
use torus_life::torus::{Cell, Grid, MAX_NEIGHBORS, Transition, classify, next_state};

fn arbitrary_grid() -> impl Strategy<Value = Grid> {
    (1usize..12, 1usize..12).prop_flat_map(|(rows, cols)| {
        proptest::collection::vec(any::<bool>(), (rows + 2) * (cols + 2)).prop_map(move |bits| {
            let mut grid = Grid::new(rows, cols).unwrap();
            for r in 0..=rows + 1 {
                for c in 0..=cols + 1 {
                    grid.set(r, c, Cell::from(bits[r * (cols + 2) + c]));
                }
            }
            grid
        })
    })
}

fn any_cell() -> impl Strategy<Value = Cell> {
    any::<bool>().prop_map(Cell::from)
}

proptest! {
    #[test]
    fn sync_establishes_toroidal_mirror(mut grid in arbitrary_grid()) {
        grid.sync_boundary();
        let (rows, cols) = (grid.rows(), grid.cols());
        for c in 0..=cols + 1 {
            prop_assert_eq!(grid.get(0, c), grid.get(rows, c));
            prop_assert_eq!(grid.get(rows + 1, c), grid.get(1, c));
        }
        for r in 0..=rows + 1 {
            prop_assert_eq!(grid.get(r, 0), grid.get(r, cols));
            prop_assert_eq!(grid.get(r, cols + 1), grid.get(r, 1));
        }
        prop_assert!(grid.is_boundary_synced());
    }

    #[test]
    fn sync_preserves_real_cells(grid in arbitrary_grid()) {
        let mut synced = grid.clone();
        synced.sync_boundary();
        prop_assert_eq!(synced.live_cells(), grid.live_cells());
    }

    #[test]
    fn sync_is_idempotent(mut grid in arbitrary_grid()) {
        grid.sync_boundary();
        let once = grid.clone();
        grid.sync_boundary();
        prop_assert_eq!(grid, once);
    }

    #[test]
    fn transition_matches_b3_s23(cell in any_cell(), n in 0u8..=MAX_NEIGHBORS) {
        let expected = if cell.is_alive() { n == 2 || n == 3 } else { n == 3 };
        prop_assert_eq!(next_state(cell, n).is_alive(), expected);

        let transition = classify(cell, n);
        match transition {
            Transition::Birth => prop_assert!(!cell.is_alive()),
            Transition::Survival => prop_assert!(cell.is_alive()),
            Transition::Unchanged => prop_assert_eq!((cell, n), (Cell::Dead, 2)),
            Transition::Underpopulation | Transition::Overpopulation => {}
        }
    }
}
