// Minefield storage and the reveal algorithm
// Handles mine placement around a safe zone, flood-fill opening and flags

use rand::prelude::*;
use std::collections::VecDeque;
use std::error::Error;
use std::fmt;

/// Number of cells kept free around the first reveal (the cell and its 8 neighbors)
pub const SAFE_ZONE_CELLS: usize = 9;

/// A single cell on the minesweeper board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    pub is_mine: bool,
    pub is_opened: bool,
    pub has_flag: bool,
    pub adjacent_mine_count: u8, // Only meaningful once opened
}

/// Result of a reveal request. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    HasFlag,  // Target carries a flag, nothing happened
    NoOp,     // Target was already open
    Exploded, // Target is a mine
    Opened,   // Target (and possibly a cascade) got opened
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    TooManyMines { requested: usize, capacity: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::TooManyMines { requested, capacity } => write!(
                f,
                "cannot place {} mines, the board only has room for {}",
                requested, capacity
            ),
        }
    }
}

impl Error for GridError {}

/// Minefield of `width * height` cells stored row by row
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    mines_placed: bool,
}

impl Grid {
    /// Create an empty grid (no mines, everything closed)
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid must have at least one cell");
        Grid {
            width,
            height,
            cells: vec![Cell::default(); width * height],
            mines_placed: false,
        }
    }

    /// Build a grid with mines at fixed positions, for replaying a known layout
    pub fn from_mines(width: usize, height: usize, mines: &[(usize, usize)]) -> Self {
        let mut grid = Grid::new(width, height);
        for &(x, y) in mines {
            let idx = grid.index(x, y);
            grid.cells[idx].is_mine = true;
        }
        grid.mines_placed = true;
        grid
    }

    /// Discard all cell state and change the dimensions
    pub fn reset(&mut self, width: usize, height: usize) {
        *self = Grid::new(width, height);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    /// Borrow the cell at (x, y). Panics when out of bounds.
    pub fn cell(&self, x: usize, y: usize) -> &Cell {
        &self.cells[self.index(x, y)]
    }

    pub fn mine_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_mine).count()
    }

    pub fn flag_count(&self) -> usize {
        self.cells.iter().filter(|c| c.has_flag).count()
    }

    /// Iterate over the coordinates of every mine
    pub fn mine_positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let w = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_mine)
            .map(move |(i, _)| (i % w, i / w))
    }

    /// Randomly place `count` mines using the thread-local generator.
    /// See [`Grid::place_mines_with`].
    pub fn place_mines(
        &mut self,
        count: usize,
        exclude: Option<(usize, usize)>,
    ) -> Result<(), GridError> {
        self.place_mines_with(&mut thread_rng(), count, exclude)
    }

    /// Scatter `count` mines with reject-and-resample: a sampled cell is
    /// drawn again when it already holds a mine or lies within Chebyshev
    /// distance 1 of `exclude`. Existing mines are cleared first.
    pub fn place_mines_with<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        count: usize,
        exclude: Option<(usize, usize)>,
    ) -> Result<(), GridError> {
        let capacity = (self.width * self.height).saturating_sub(SAFE_ZONE_CELLS);
        if count > capacity {
            return Err(GridError::TooManyMines {
                requested: count,
                capacity,
            });
        }

        for c in self.cells.iter_mut() {
            c.is_mine = false;
        }

        let mut placed = 0;
        while placed < count {
            let x = rng.gen_range(0..self.width);
            let y = rng.gen_range(0..self.height);
            if let Some((ex, ey)) = exclude {
                if x.abs_diff(ex) <= 1 && y.abs_diff(ey) <= 1 {
                    continue;
                }
            }
            let idx = self.index(x, y);
            if !self.cells[idx].is_mine {
                self.cells[idx].is_mine = true;
                placed += 1;
            }
        }

        self.mines_placed = true;
        tracing::debug!(count, ?exclude, "mines placed");
        Ok(())
    }

    /// Open the cell at (x, y), cascading breadth-first through cells that
    /// have no neighboring mines. Numbered cells bound the cascade and
    /// flagged cells reached by it stay closed.
    pub fn reveal(&mut self, x: usize, y: usize) -> RevealOutcome {
        let start = self.index(x, y);
        let target = self.cells[start];
        if target.has_flag {
            return RevealOutcome::HasFlag;
        }
        if target.is_opened {
            return RevealOutcome::NoOp;
        }
        if target.is_mine {
            return RevealOutcome::Exploded;
        }

        let mut enqueued = vec![false; self.cells.len()];
        let mut worklist = VecDeque::from([(x, y)]);
        enqueued[start] = true;

        while let Some((cx, cy)) = worklist.pop_front() {
            let idx = self.index(cx, cy);
            if self.cells[idx].has_flag {
                continue;
            }

            let adj = self
                .neighbors(cx, cy)
                .filter(|&(nx, ny)| self.cell(nx, ny).is_mine)
                .count() as u8;
            let cell = &mut self.cells[idx];
            cell.is_opened = true;
            cell.adjacent_mine_count = adj;

            if adj > 0 {
                continue;
            }
            for (nx, ny) in self.neighbors(cx, cy) {
                let nidx = self.index(nx, ny);
                let n = &self.cells[nidx];
                if enqueued[nidx] || n.is_mine || n.is_opened {
                    continue;
                }
                enqueued[nidx] = true;
                worklist.push_back((nx, ny));
            }
        }

        RevealOutcome::Opened
    }

    /// Flip the flag on a closed cell. Returns false when the cell is open.
    pub fn toggle_flag(&mut self, x: usize, y: usize) -> bool {
        let idx = self.index(x, y);
        let cell = &mut self.cells[idx];
        if cell.is_opened {
            return false;
        }
        cell.has_flag = !cell.has_flag;
        true
    }

    /// Every non-mine cell is open. Flags do not matter.
    pub fn is_won(&self) -> bool {
        self.cells.iter().all(|c| c.is_mine || c.is_opened)
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({}, {}) outside {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        y * self.width + x
    }

    /// In-bounds 8-neighborhood of (x, y), excluding the cell itself
    fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> {
        let xs = x.saturating_sub(1)..=(x + 1).min(self.width - 1);
        let ys = y.saturating_sub(1)..=(y + 1).min(self.height - 1);
        ys.flat_map(move |ny| xs.clone().map(move |nx| (nx, ny)))
            .filter(move |&(nx, ny)| !(nx == x && ny == y))
    }
}
