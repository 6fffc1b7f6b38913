//! Utility modules for dynamic_pathfinder

pub mod grid_map;
pub mod visualization;

pub use grid_map::*;
pub use visualization::{Visualizer, PointStyle, colors};
