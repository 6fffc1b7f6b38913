//! Error types for dynamic_pathfinder

use std::fmt;

use crate::common::types::Cell;

/// Main error type for grid pathfinding
///
/// An unreachable goal is not an error: searches report it as an empty path.
#[derive(Debug)]
pub enum PathfindingError {
    /// Cell lies outside the grid extents
    OutOfBounds { cell: Cell, rows: usize, cols: usize },
    /// Start or goal coincides with a wall
    BlockedEndpoint(Cell),
    /// Invalid parameter
    InvalidParameter(String),
    /// Grid could not be built or parsed
    InvalidGrid(String),
    /// Visualization error
    Visualization(String),
}

impl fmt::Display for PathfindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathfindingError::OutOfBounds { cell, rows, cols } => write!(
                f,
                "Out of bounds: {} is outside a {}x{} grid",
                cell, rows, cols
            ),
            PathfindingError::BlockedEndpoint(cell) => {
                write!(f, "Blocked endpoint: {} is a wall", cell)
            }
            PathfindingError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            PathfindingError::InvalidGrid(msg) => write!(f, "Invalid grid: {}", msg),
            PathfindingError::Visualization(msg) => write!(f, "Visualization error: {}", msg),
        }
    }
}

impl std::error::Error for PathfindingError {}

/// Result type alias for pathfinding operations
pub type PathfindingResult<T> = Result<T, PathfindingError>;
