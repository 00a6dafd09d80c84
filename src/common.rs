mod frontier;
mod state;

pub use frontier::Frontier;
pub use state::{CellState, SearchState, Status};

/// Grid coordinate in `(x, y)` order.
pub type Coord = (usize, usize);

pub type Path = Vec<Coord>;

/// Manhattan distance between two cells.
pub fn manhattan_distance(a: Coord, b: Coord) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}
