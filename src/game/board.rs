//! The bubble board - cluster detection, floating-bubble pruning, and the
//! row-injection ratchet.
//!
//! The board is a dense `rows × cols` matrix of cells. Emptiness is an
//! explicit variant rather than a sentinel color, so two bubbles that happen
//! to share colors can never be mistaken for empty cells. Every mutation
//! that removes bubbles re-establishes the anchoring invariant: a filled
//! cell must be hex-reachable from row 0 through other filled cells.

use bevy::prelude::*;
use rand::Rng;
use std::collections::{HashSet, VecDeque};

use super::geometry::{GridPos, neighbors_in_bounds};
use super::palette::{ColorPair, LevelPalette};

/// One board cell: empty, or holding a bubble of some color pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(ColorPair),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn color(&self) -> Option<ColorPair> {
        match self {
            Cell::Empty => None,
            Cell::Filled(pair) => Some(*pair),
        }
    }
}

/// What a committed hit did to the board.
#[derive(Debug, Clone, Default)]
pub struct HitReport {
    /// Cells cleared because the landed bubble completed a cluster.
    pub popped: Vec<GridPos>,
    /// The popped cluster's color, if any.
    pub popped_color: Option<ColorPair>,
    /// Cells cleared because they lost their connection to the ceiling.
    pub pruned: Vec<GridPos>,
}

/// The dense bubble matrix for one level.
#[derive(Resource, Debug, Clone)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an all-empty board.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, pos: GridPos) -> usize {
        debug_assert!(pos.row < self.rows && pos.col < self.cols);
        pos.row * self.cols + pos.col
    }

    pub fn get(&self, pos: GridPos) -> Cell {
        self.cells[self.index(pos)]
    }

    /// Write a bubble into a cell (forced placement: shot commit, ratchet).
    pub fn set(&mut self, pos: GridPos, cell: Cell) {
        let idx = self.index(pos);
        self.cells[idx] = cell;
    }

    /// True iff no cell holds a bubble - the level-complete condition.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }

    /// Row-major snapshot of every cell, for rendering and debug overlays.
    pub fn cells(&self) -> impl Iterator<Item = (GridPos, Cell)> + '_ {
        self.cells.iter().enumerate().map(|(i, &cell)| {
            (GridPos::new(i / self.cols, i % self.cols), cell)
        })
    }

    /// Row-major snapshot of the filled cells only.
    pub fn filled(&self) -> impl Iterator<Item = (GridPos, ColorPair)> + '_ {
        self.cells().filter_map(|(pos, cell)| cell.color().map(|c| (pos, c)))
    }

    /// All hex-connected cells holding exactly the start cell's color pair.
    ///
    /// Returns the maximal component containing `start`, or nothing when the
    /// start cell is empty. Flood fill over the parity-dependent adjacency.
    pub fn find_cluster(&self, start: GridPos) -> Vec<GridPos> {
        let Some(color) = self.get(start).color() else {
            return Vec::new();
        };

        let mut cluster = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);

        while let Some(pos) = queue.pop_front() {
            if self.get(pos).color() != Some(color) {
                continue;
            }
            cluster.push(pos);
            for neighbor in neighbors_in_bounds(pos, self.rows, self.cols) {
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        cluster
    }

    /// Clear every cell in the set. No-op on an empty set.
    pub fn remove_cluster(&mut self, cells: &[GridPos]) {
        for &pos in cells {
            self.set(pos, Cell::Empty);
        }
    }

    /// Clear every filled cell that cannot reach row 0 through filled cells.
    ///
    /// Multi-source flood fill from the filled ceiling cells; everything the
    /// fill misses is floating and gets dropped. Idempotent.
    pub fn prune_floating(&mut self) -> Vec<GridPos> {
        let mut anchored = HashSet::new();
        let mut queue = VecDeque::new();

        for col in 0..self.cols {
            let pos = GridPos::new(0, col);
            if !self.get(pos).is_empty() {
                anchored.insert(pos);
                queue.push_back(pos);
            }
        }

        while let Some(pos) = queue.pop_front() {
            for neighbor in neighbors_in_bounds(pos, self.rows, self.cols) {
                if !self.get(neighbor).is_empty() && anchored.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        let floating: Vec<GridPos> = self
            .cells()
            .filter(|(pos, cell)| !cell.is_empty() && !anchored.contains(pos))
            .map(|(pos, _)| pos)
            .collect();

        for &pos in &floating {
            self.set(pos, Cell::Empty);
        }
        floating
    }

    /// Resolve the consequences of a bubble landing at `pos`.
    ///
    /// Pops the surrounding cluster when it reaches `min_cluster`, then
    /// always prunes floating bubbles, whether or not anything popped.
    pub fn commit_hit(&mut self, pos: GridPos, min_cluster: usize) -> HitReport {
        let mut report = HitReport::default();

        let cluster = self.find_cluster(pos);
        if cluster.len() >= min_cluster {
            report.popped_color = self.get(pos).color();
            self.remove_cluster(&cluster);
            report.popped = cluster;
        }

        report.pruned = self.prune_floating();
        report
    }

    /// Push the whole field two rows toward the bottom and refill the top.
    ///
    /// Returns `true` (loss) without mutating anything when the bottom row
    /// is already occupied: the ratchet refuses to shove bubbles off the
    /// board. Shifting by two keeps row parity, so the stagger stays intact.
    pub fn advance_rows(&mut self, palette: &LevelPalette, rng: &mut impl Rng) -> bool {
        let last = self.rows - 1;
        for col in 0..self.cols {
            if !self.get(GridPos::new(last, col)).is_empty() {
                return true;
            }
        }

        for row in (2..self.rows).rev() {
            for col in 0..self.cols {
                let src = GridPos::new(row - 2, col);
                self.set(GridPos::new(row, col), self.get(src));
                self.set(src, Cell::Empty);
            }
        }

        for row in 0..2 {
            for col in 0..self.cols {
                self.set(GridPos::new(row, col), Cell::Filled(palette.random_pair(rng)));
            }
        }
        false
    }

    /// Fill the opening position for a level.
    ///
    /// A level-scaled band of top rows is filled completely, then each row
    /// has a handful of cells cleared back out to roughen the field. The
    /// clear count is clamped so every populated row keeps at least
    /// `max(cols / 3, 1)` bubbles.
    pub fn populate(
        &mut self,
        level: u32,
        fill_row_fraction: f32,
        clear_fraction: f32,
        palette: &LevelPalette,
        rng: &mut impl Rng,
    ) {
        let bonus = if level > 1 { 1 } else { 0 };
        let filled_rows =
            ((self.rows as f32 * fill_row_fraction) as usize + bonus).min(self.rows);
        let min_keep = (self.cols / 3).max(1);

        for row in 0..filled_rows {
            for col in 0..self.cols {
                self.set(GridPos::new(row, col), Cell::Filled(palette.random_pair(rng)));
            }
        }

        for row in 0..filled_rows {
            let scaled = (clear_fraction * (filled_rows as f32 - 2.0 * row as f32)).max(0.0);
            let clears = (self.cols / 2)
                .max(scaled as usize)
                .min(self.cols - min_keep);
            // Sampling with replacement: rows end up unevenly roughened.
            for _ in 0..clears {
                let col = rng.random_range(0..self.cols);
                self.set(GridPos::new(row, col), Cell::Empty);
            }
        }
    }
}
