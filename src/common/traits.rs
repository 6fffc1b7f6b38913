//! Common traits defining interfaces for grid search algorithms

use crate::common::error::PathfindingResult;
use crate::common::types::{Cell, SearchResult};
use crate::utils::GridMap;

/// Trait for grid-based search algorithms
pub trait GridSearch {
    /// Run one complete search from start to goal.
    ///
    /// Start and goal must be inside the grid; this is not checked here.
    /// An unreachable goal yields an empty path.
    fn search(&self, grid: &GridMap, start: Cell, goal: Cell) -> SearchResult;

    /// Validate the endpoints, then search
    fn plan(&self, grid: &GridMap, start: Cell, goal: Cell) -> PathfindingResult<SearchResult> {
        grid.validate_endpoints(start, goal)?;
        Ok(self.search(grid, start, goal))
    }
}
