//! Common types used throughout dynamic_pathfinder

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::common::error::PathfindingError;

/// Grid cell coordinate
///
/// Ordering is by row, then column. The search frontier relies on this for
/// deterministic tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Orthogonal neighbors in up, down, left, right order.
    ///
    /// Neighbors with a negative coordinate are skipped; the upper bound is
    /// the grid's business.
    pub fn neighbors4(&self) -> impl Iterator<Item = Cell> {
        let (r, c) = (self.row, self.col);
        [
            r.checked_sub(1).map(|r| Cell::new(r, c)),
            Some(Cell::new(r + 1, c)),
            c.checked_sub(1).map(|c| Cell::new(r, c)),
            Some(Cell::new(r, c + 1)),
        ]
        .into_iter()
        .flatten()
    }

    /// True if `other` is exactly one orthogonal step away
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl From<(usize, usize)> for Cell {
    fn from(tuple: (usize, usize)) -> Self {
        Self { row: tuple.0, col: tuple.1 }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Walkability of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    #[default]
    Free,
    Wall,
}

/// Frontier ordering policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchStrategy {
    /// Priority is cost-so-far plus heuristic; optimal with the provided heuristics
    #[default]
    AStar,
    /// Priority is the heuristic alone; fast but not optimal
    GreedyBestFirst,
}

impl SearchStrategy {
    pub const ALL: [SearchStrategy; 2] = [SearchStrategy::AStar, SearchStrategy::GreedyBestFirst];
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStrategy::AStar => write!(f, "A*"),
            SearchStrategy::GreedyBestFirst => write!(f, "GBFS"),
        }
    }
}

impl FromStr for SearchStrategy {
    type Err = PathfindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a*" | "astar" | "a-star" => Ok(SearchStrategy::AStar),
            "gbfs" | "greedy" | "greedy-best-first" => Ok(SearchStrategy::GreedyBestFirst),
            other => Err(PathfindingError::InvalidParameter(format!(
                "unknown search strategy '{}'",
                other
            ))),
        }
    }
}

/// Distance metric used to estimate remaining cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeuristicKind {
    #[default]
    Manhattan,
    Euclidean,
    Chebyshev,
}

impl HeuristicKind {
    pub const ALL: [HeuristicKind; 3] = [
        HeuristicKind::Manhattan,
        HeuristicKind::Euclidean,
        HeuristicKind::Chebyshev,
    ];
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HeuristicKind::Manhattan => "Manhattan",
            HeuristicKind::Euclidean => "Euclidean",
            HeuristicKind::Chebyshev => "Chebyshev",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for HeuristicKind {
    type Err = PathfindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manhattan" => Ok(HeuristicKind::Manhattan),
            "euclidean" => Ok(HeuristicKind::Euclidean),
            "chebyshev" => Ok(HeuristicKind::Chebyshev),
            other => Err(PathfindingError::InvalidParameter(format!(
                "unknown heuristic '{}'",
                other
            ))),
        }
    }
}

/// Outcome of a single search
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchResult {
    /// Cells from start to goal inclusive; empty if the goal is unreachable
    pub path: Vec<Cell>,
    /// Cells in the order they were closed
    pub visited: Vec<Cell>,
    /// Wall-clock duration of the search
    pub elapsed: Duration,
}

impl SearchResult {
    pub fn is_found(&self) -> bool {
        !self.path.is_empty()
    }

    /// Path cost in unit edges, zero when unreachable
    pub fn cost(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
