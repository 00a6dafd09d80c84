//! Lowest-cost path search on fixed-size 2D grids with walls and per-cell
//! traversal costs.

pub mod algorithm;
pub mod common;
pub mod config;
pub mod error;
pub mod map;
pub mod scenario;
pub mod stat;

pub use algorithm::{find_path, Heuristic, HeuristicKind, Manhattan, PathFinder, Zero};
pub use common::{Coord, Frontier, SearchState, Status};
pub use error::PathError;
pub use map::{Grid, Origin};
