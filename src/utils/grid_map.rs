//! Occupancy grid for 4-connected pathfinding
//!
//! The grid is the single source of truth for which cells are walkable. It is
//! owned by the caller and passed by reference to every component; the only
//! mutation performed by the planners is wall insertion.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use log::debug;
use nalgebra as na;
use rand::Rng;

use crate::common::{Cell, CellState, PathfindingError, PathfindingResult};

pub const DEFAULT_ROWS: usize = 20;
pub const DEFAULT_COLS: usize = 25;
pub const DEFAULT_WALL_PROBABILITY: f64 = 0.25;

#[derive(Debug, Clone, PartialEq)]
pub struct GridMap {
    cells: na::DMatrix<CellState>,
}

impl GridMap {
    /// Create an all-free grid
    pub fn new(rows: usize, cols: usize) -> PathfindingResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(PathfindingError::InvalidGrid(format!(
                "grid extents must be positive, got {}x{}",
                rows, cols
            )));
        }
        Ok(Self {
            cells: na::DMatrix::from_element(rows, cols, CellState::Free),
        })
    }

    /// Parse a grid drawn with `#` for walls and `.` or space for free cells
    pub fn from_ascii(text: &str) -> PathfindingResult<Self> {
        let lines: Vec<&str> = text
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.is_empty())
            .collect();
        let rows = lines.len();
        let cols = lines.first().map_or(0, |l| l.chars().count());
        let mut grid = Self::new(rows, cols)?;

        for (r, line) in lines.iter().enumerate() {
            if line.chars().count() != cols {
                return Err(PathfindingError::InvalidGrid(format!(
                    "row {} has {} columns, expected {}",
                    r,
                    line.chars().count(),
                    cols
                )));
            }
            for (c, ch) in line.chars().enumerate() {
                let state = match ch {
                    '#' => CellState::Wall,
                    '.' | ' ' => CellState::Free,
                    other => {
                        return Err(PathfindingError::InvalidGrid(format!(
                            "unexpected character '{}' at ({}, {})",
                            other, r, c
                        )))
                    }
                };
                grid.cells[(r, c)] = state;
            }
        }
        Ok(grid)
    }

    /// Default scenario generator: walled border, random interior walls.
    ///
    /// Start and goal are always left free.
    pub fn random_bordered<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        wall_probability: f64,
        start: Cell,
        goal: Cell,
        rng: &mut R,
    ) -> PathfindingResult<Self> {
        if !(0.0..=1.0).contains(&wall_probability) {
            return Err(PathfindingError::InvalidParameter(format!(
                "wall probability must be in [0, 1], got {}",
                wall_probability
            )));
        }
        let mut grid = Self::new(rows, cols)?;
        grid.check_bounds(start)?;
        grid.check_bounds(goal)?;

        for r in 0..rows {
            for c in 0..cols {
                let border = r == 0 || c == 0 || r == rows - 1 || c == cols - 1;
                if border || rng.gen_bool(wall_probability) {
                    grid.cells[(r, c)] = CellState::Wall;
                }
            }
        }
        grid.cells[(start.row, start.col)] = CellState::Free;
        grid.cells[(goal.row, goal.col)] = CellState::Free;

        debug!(
            "generated {}x{} grid with {} walls",
            rows,
            cols,
            grid.wall_count()
        );
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.rows() && cell.col < self.cols()
    }

    /// State of an in-bounds cell; out-of-bounds cells read as walls
    pub fn state(&self, cell: Cell) -> CellState {
        if self.in_bounds(cell) {
            self.cells[(cell.row, cell.col)]
        } else {
            CellState::Wall
        }
    }

    pub fn is_wall(&self, cell: Cell) -> bool {
        self.state(cell) == CellState::Wall
    }

    pub fn is_free(&self, cell: Cell) -> bool {
        self.state(cell) == CellState::Free
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|s| **s == CellState::Wall).count()
    }

    /// Wall cells in row-major order
    pub fn walls(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows())
            .cartesian_product(0..self.cols())
            .map(|(r, c)| Cell::new(r, c))
            .filter(move |cell| self.cells[(cell.row, cell.col)] == CellState::Wall)
    }

    /// Turn a free cell into a wall. Returns false if nothing changed.
    pub fn insert_wall(&mut self, cell: Cell) -> bool {
        if !self.in_bounds(cell) || self.is_wall(cell) {
            return false;
        }
        self.cells[(cell.row, cell.col)] = CellState::Wall;
        true
    }

    pub fn set_state(&mut self, cell: Cell, state: CellState) -> PathfindingResult<()> {
        self.check_bounds(cell)?;
        self.cells[(cell.row, cell.col)] = state;
        Ok(())
    }

    fn check_bounds(&self, cell: Cell) -> PathfindingResult<()> {
        if self.in_bounds(cell) {
            Ok(())
        } else {
            Err(PathfindingError::OutOfBounds {
                cell,
                rows: self.rows(),
                cols: self.cols(),
            })
        }
    }

    /// Boundary check run before handing endpoints to a search
    pub fn validate_endpoints(&self, start: Cell, goal: Cell) -> PathfindingResult<()> {
        for cell in [start, goal] {
            self.check_bounds(cell)?;
            if self.is_wall(cell) {
                return Err(PathfindingError::BlockedEndpoint(cell));
            }
        }
        Ok(())
    }

    /// Check that `path` runs from start to goal through adjacent free cells
    pub fn is_valid_path(&self, path: &[Cell], start: Cell, goal: Cell) -> bool {
        match (path.first(), path.last()) {
            (Some(first), Some(last)) if *first == start && *last == goal => {}
            _ => return false,
        }
        path.iter().all(|c| self.is_free(*c))
            && path.iter().tuple_windows().all(|(a, b)| a.is_adjacent(b))
    }

    /// Cells 4-connected to `origin` through free cells, origin included
    pub fn reachable_from(&self, origin: Cell) -> HashSet<Cell> {
        let mut seen = HashSet::new();
        if !self.is_free(origin) {
            return seen;
        }
        let mut queue = VecDeque::new();
        seen.insert(origin);
        queue.push_back(origin);
        while let Some(cell) = queue.pop_front() {
            for next in cell.neighbors4() {
                if self.is_free(next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }
}

impl FromStr for GridMap {
    type Err = PathfindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_ascii(s)
    }
}

impl fmt::Display for GridMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows() {
            let line: String = (0..self.cols())
                .map(|c| match self.cells[(r, c)] {
                    CellState::Wall => '#',
                    CellState::Free => '.',
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
