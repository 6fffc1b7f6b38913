//! Dynamic Pathfinder - grid pathfinding with dynamic replanning
//!
//! This crate provides best-first search (A* and greedy best-first) over
//! 4-connected occupancy grids, pluggable distance heuristics, and a
//! tick-driven controller that replans when walls appear on the active path.

// Core modules
pub mod common;
pub mod utils;

// Algorithm modules
pub mod path_planning;

// Re-export common types for convenience
pub use common::{Cell, CellState, HeuristicKind, SearchResult, SearchStrategy};
pub use common::GridSearch;
pub use common::{PathfindingError, PathfindingResult};
pub use utils::GridMap;
pub use path_planning::{BestFirstConfig, BestFirstSearch, ReplanConfig, ReplanState, ReplanningController};
