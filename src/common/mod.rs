//! Common types, traits, and error definitions for dynamic_pathfinder
//!
//! This module provides the foundational building blocks shared by the
//! grid map, the search engine and the replanning controller.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
