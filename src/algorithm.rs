mod astar;

pub use astar::PathFinder;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::common::{manhattan_distance, Coord, Path, SearchState};
use crate::error::Result;
use crate::map::Grid;

/// Estimate of the remaining cost from a cell to the goal.
pub trait Heuristic {
    fn estimate(&self, position: Coord, goal: Coord) -> usize;
}

/// Always zero: the search degenerates to uniform-cost search.
#[derive(Debug, Clone, Copy, Default)]
pub struct Zero;

impl Heuristic for Zero {
    fn estimate(&self, _position: Coord, _goal: Coord) -> usize {
        0
    }
}

/// Manhattan distance. Admissible since every open cell costs at least 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

impl Heuristic for Manhattan {
    fn estimate(&self, position: Coord, goal: Coord) -> usize {
        manhattan_distance(position, goal)
    }
}

impl<F> Heuristic for F
where
    F: Fn(Coord, Coord) -> usize,
{
    fn estimate(&self, position: Coord, goal: Coord) -> usize {
        self(position, goal)
    }
}

/// Heuristic selected at runtime from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum HeuristicKind {
    #[default]
    Zero,
    Manhattan,
}

impl Heuristic for HeuristicKind {
    fn estimate(&self, position: Coord, goal: Coord) -> usize {
        match self {
            HeuristicKind::Zero => Zero.estimate(position, goal),
            HeuristicKind::Manhattan => Manhattan.estimate(position, goal),
        }
    }
}

/// One-shot uniform-cost search with fresh scratch state.
pub fn find_path(grid: &Grid, start: Coord, goal: Coord) -> Result<Path> {
    PathFinder::new().find_path(grid, start, goal)
}

/// Sum of entering costs along `path`. The first cell is free.
pub fn path_cost(grid: &Grid, path: &[Coord]) -> Result<usize> {
    path.iter().skip(1).map(|&position| grid.cost(position)).sum()
}

fn construct_path(state: &SearchState, goal: Coord) -> Result<Path> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(previous) = state.get(current)?.predecessor {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    Ok(path)
}
