use super::Coord;
use crate::error::{PathError, Result};
use crate::map::Grid;

/// Search status of a cell. Only ever moves forward:
/// `Unvisited -> Frontier -> Settled`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    Unvisited,
    Frontier,
    Settled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellState {
    pub status: Status,
    pub g_cost: usize, // valid once status is not Unvisited
    pub h_cost: usize,
    pub f_cost: usize,
    pub predecessor: Option<Coord>, // None only for the start cell
}

/// Per-search scratch space covering every cell of one grid.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl SearchState {
    pub fn new(grid: &Grid) -> Self {
        let mut state = SearchState::default();
        state.reset_all(grid);
        state
    }

    /// Reset every cell and resize to the grid's dimensions.
    pub fn reset_all(&mut self, grid: &Grid) {
        self.width = grid.width();
        self.height = grid.height();
        self.cells.clear();
        self.cells
            .resize(self.width * self.height, CellState::default());
    }

    pub fn get(&self, position: Coord) -> Result<&CellState> {
        let index = self.index(position)?;
        Ok(&self.cells[index])
    }

    pub fn get_mut(&mut self, position: Coord) -> Result<&mut CellState> {
        let index = self.index(position)?;
        Ok(&mut self.cells[index])
    }

    pub fn status(&self, position: Coord) -> Result<Status> {
        self.get(position).map(|cell| cell.status)
    }

    /// Coordinates currently in `status`, ordered by `y` then `x`.
    pub fn cells_with_status(&self, status: Status) -> Vec<Coord> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.status == status)
            .map(|(index, _)| (index % self.width, index / self.width))
            .collect()
    }

    fn index(&self, (x, y): Coord) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(PathError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y * self.width + x)
    }
}
