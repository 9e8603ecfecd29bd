use std::collections::{BTreeSet, VecDeque};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use xtmines::xtm_difficulty::Difficulty;
use xtmines::xtm_grid::{Grid, RevealOutcome};

fn true_count(grid: &Grid, x: usize, y: usize) -> u8 {
    let mut n = 0;
    for ny in y.saturating_sub(1)..=(y + 1).min(grid.height() - 1) {
        for nx in x.saturating_sub(1)..=(x + 1).min(grid.width() - 1) {
            if (nx, ny) != (x, y) && grid.cell(nx, ny).is_mine {
                n += 1;
            }
        }
    }
    n
}

fn opened_cells(grid: &Grid) -> BTreeSet<(usize, usize)> {
    let mut set = BTreeSet::new();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if grid.cell(x, y).is_opened {
                set.insert((x, y));
            }
        }
    }
    set
}

/// Connected zero region around (x, y) plus its numbered one-ring
fn expected_cascade(grid: &Grid, x: usize, y: usize) -> BTreeSet<(usize, usize)> {
    let mut seen = BTreeSet::from([(x, y)]);
    let mut queue = VecDeque::from([(x, y)]);
    while let Some((cx, cy)) = queue.pop_front() {
        if true_count(grid, cx, cy) > 0 {
            continue;
        }
        for ny in cy.saturating_sub(1)..=(cy + 1).min(grid.height() - 1) {
            for nx in cx.saturating_sub(1)..=(cx + 1).min(grid.width() - 1) {
                if !grid.cell(nx, ny).is_mine && seen.insert((nx, ny)) {
                    queue.push_back((nx, ny));
                }
            }
        }
    }
    seen
}

#[test]
fn mine_count_matches_clamped_difficulty() {
    let mut rng = StdRng::seed_from_u64(11);
    for (w, h, n) in [(8, 8, 8), (8, 8, 500), (4, 4, 100), (30, 16, 99), (12, 5, 54)] {
        let d = Difficulty::new(w, h, n);
        let mut grid = Grid::new(w, h);
        let exclude = (rng.gen_range(0..w), rng.gen_range(0..h));
        grid.place_mines_with(&mut rng, d.mine_count, Some(exclude))
            .unwrap();
        assert_eq!(grid.mine_count(), n.min(d.possible_max_mines()));
        for (mx, my) in grid.mine_positions() {
            assert!(mx.abs_diff(exclude.0) > 1 || my.abs_diff(exclude.1) > 1);
        }
    }
}

#[test]
fn first_reveal_scenario_on_small_board() {
    for seed in 0..50u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut grid = Grid::new(8, 8);
        grid.place_mines_with(&mut rng, 8, Some((0, 0))).unwrap();
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert!(!grid.cell(x, y).is_mine);
        }

        // the safe zone guarantees (0, 0) has no mine neighbors
        assert_eq!(grid.reveal(0, 0), RevealOutcome::Opened);
        assert_eq!(grid.cell(0, 0).adjacent_mine_count, 0);
        assert_eq!(opened_cells(&grid), expected_cascade(&grid, 0, 0));
    }
}

#[test]
fn cascade_opens_zero_region_and_one_ring_only() {
    for seed in 0..40u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut grid = Grid::new(16, 12);
        grid.place_mines_with(&mut rng, 30, None).unwrap();

        let zero = (0..12)
            .flat_map(|y| (0..16).map(move |x| (x, y)))
            .find(|&(x, y)| !grid.cell(x, y).is_mine && true_count(&grid, x, y) == 0);
        let Some((x, y)) = zero else { continue };

        let expected = expected_cascade(&grid, x, y);
        assert_eq!(grid.reveal(x, y), RevealOutcome::Opened);
        let opened = opened_cells(&grid);
        assert_eq!(opened, expected);
        for &(ox, oy) in &opened {
            let cell = grid.cell(ox, oy);
            assert!(!cell.is_mine);
            assert_eq!(cell.adjacent_mine_count, true_count(&grid, ox, oy));
        }
    }
}

#[test]
fn win_ignores_flags() {
    let mines = [(0, 0), (3, 3)];
    let mut grid = Grid::from_mines(4, 4, &mines);
    assert!(!grid.is_won());
    for y in 0..4 {
        for x in 0..4 {
            if !mines.contains(&(x, y)) {
                grid.reveal(x, y);
            }
        }
    }
    assert!(grid.is_won());
    grid.toggle_flag(0, 0);
    assert!(grid.is_won());

    let mut flagged_only = Grid::from_mines(4, 4, &mines);
    for &(x, y) in &mines {
        flagged_only.toggle_flag(x, y);
    }
    assert!(!flagged_only.is_won());
}

#[test]
fn flag_twice_then_reveal() {
    let mut grid = Grid::from_mines(5, 5, &[(4, 4)]);
    grid.toggle_flag(1, 1);
    grid.toggle_flag(1, 1);
    assert!(!grid.cell(1, 1).has_flag);

    grid.toggle_flag(2, 2);
    assert_eq!(grid.reveal(2, 2), RevealOutcome::HasFlag);
    assert!(!grid.cell(2, 2).is_opened);
    assert_eq!(grid.flag_count(), 1);
}

#[test]
fn reset_discards_state() {
    let mut grid = Grid::from_mines(3, 3, &[(1, 1)]);
    grid.reveal(0, 0);
    grid.reset(5, 4);
    assert_eq!((grid.width(), grid.height()), (5, 4));
    assert_eq!(grid.mine_count(), 0);
    assert!(!grid.mines_placed());
    assert!(opened_cells(&grid).is_empty());
}
