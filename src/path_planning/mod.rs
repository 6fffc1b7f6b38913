// Path planning algorithms module

pub mod heuristic;
pub mod best_first;
pub mod replanning;

pub use heuristic::*;
pub use best_first::*;
pub use replanning::*;
