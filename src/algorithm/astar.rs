use super::{construct_path, Heuristic, Zero};
use crate::common::{CellState, Coord, Frontier, Path, SearchState, Status};
use crate::error::Result;
use crate::map::Grid;
use crate::stat::Stats;

use std::time::Instant;
use tracing::{debug, instrument, trace};

/// Best-first search over a [`Grid`].
///
/// The finder owns its scratch [`SearchState`] and [`Frontier`], so one
/// instance can serve many searches over any number of grids. Run parallel
/// searches with one finder each; the grid itself is only read.
#[derive(Debug, Default)]
pub struct PathFinder<H = Zero> {
    heuristic: H,
    state: SearchState,
    frontier: Frontier,
    stats: Stats,
}

impl PathFinder<Zero> {
    pub fn new() -> Self {
        Self::with_heuristic(Zero)
    }
}

impl<H: Heuristic> PathFinder<H> {
    pub fn with_heuristic(heuristic: H) -> Self {
        PathFinder {
            heuristic,
            state: SearchState::default(),
            frontier: Frontier::new(),
            stats: Stats::default(),
        }
    }

    pub fn heuristic(&self) -> &H {
        &self.heuristic
    }

    /// Scratch state left behind by the last search.
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Lowest-cost path from `start` to `goal`, both ends included.
    ///
    /// An empty path means no path exists; that is not an error. A walled
    /// start is never expanded and a walled goal is never entered, so both
    /// yield an empty path. Coordinates outside the grid are rejected with
    /// [`PathError::OutOfBounds`](crate::PathError::OutOfBounds).
    #[instrument(skip_all, name = "find_path", fields(start = format!("{start:?}"), goal = format!("{goal:?}")), level = "debug")]
    pub fn find_path(&mut self, grid: &Grid, start: Coord, goal: Coord) -> Result<Path> {
        let search_start_time = Instant::now();
        for position in [start, goal] {
            if !grid.in_bounds(position) {
                return Err(grid.out_of_bounds(position));
            }
        }

        self.state.reset_all(grid);
        self.frontier.clear();
        self.stats = Stats::default();

        if grid.is_wall(start)? {
            debug!("start is a wall");
        } else {
            let h_cost = self.heuristic.estimate(start, goal);
            *self.state.get_mut(start)? = CellState {
                status: Status::Frontier,
                g_cost: 0,
                h_cost,
                f_cost: h_cost,
                predecessor: None,
            };
            self.frontier.push(start, h_cost);
            self.stats.pushed_nodes += 1;
        }

        let path = if self.search(grid, goal)? {
            let path = construct_path(&self.state, goal)?;
            self.stats.cost = self.state.get(goal)?.g_cost;
            path
        } else {
            debug!("cannot find path");
            Vec::new()
        };

        self.stats.path_len = path.len();
        self.stats.time_us = search_start_time.elapsed().as_micros() as usize;
        debug!("path: {path:?}");
        Ok(path)
    }

    /// Expand the frontier until `goal` is settled. Returns whether it was.
    fn search(&mut self, grid: &Grid, goal: Coord) -> Result<bool> {
        while let Some(current) = self.frontier.pop_min() {
            trace!("expand node: {current:?}");
            self.stats.expanded_nodes += 1;

            let current_cell = self.state.get_mut(current)?;
            current_cell.status = Status::Settled;
            let current_g_cost = current_cell.g_cost;

            if current == goal {
                return Ok(true);
            }

            for neighbor in grid.neighbors(current) {
                let tile = grid.tile(neighbor)?;
                if tile.is_wall() {
                    continue;
                }

                let tentative_g_cost = current_g_cost + tile.cost();
                let neighbor_cell = self.state.get_mut(neighbor)?;
                match neighbor_cell.status {
                    Status::Settled => continue,
                    Status::Unvisited => {
                        let h_cost = self.heuristic.estimate(neighbor, goal);
                        *neighbor_cell = CellState {
                            status: Status::Frontier,
                            g_cost: tentative_g_cost,
                            h_cost,
                            f_cost: tentative_g_cost + h_cost,
                            predecessor: Some(current),
                        };
                        self.frontier.push(neighbor, neighbor_cell.f_cost);
                        self.stats.pushed_nodes += 1;
                    }
                    Status::Frontier if tentative_g_cost < neighbor_cell.g_cost => {
                        trace!(
                            "find a smaller g cost {tentative_g_cost:?} for node {neighbor:?}"
                        );
                        neighbor_cell.g_cost = tentative_g_cost;
                        neighbor_cell.f_cost = tentative_g_cost + neighbor_cell.h_cost;
                        neighbor_cell.predecessor = Some(current);
                        self.frontier.decrease_key(neighbor, neighbor_cell.f_cost);
                        self.stats.decreased_keys += 1;
                    }
                    Status::Frontier => {}
                }
            }
            trace!("frontier size {:?}", self.frontier.len());
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{path_cost, HeuristicKind, Manhattan};
    use crate::common::manhattan_distance;
    use crate::error::PathError;
    use crate::map::Origin;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use tracing_subscriber;

    // Helper function to setup tracing
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("trace")
            .try_init();
    }

    fn open_grid(width: usize, height: usize) -> Grid {
        let rows = vec![".".repeat(width); height];
        Grid::load(&rows, '*').unwrap()
    }

    // Consecutive cells are cardinal neighbors and no cell is a wall.
    fn assert_valid_path(grid: &Grid, path: &[Coord]) {
        for position in path {
            assert!(!grid.is_wall(*position).unwrap(), "{position:?} is a wall");
        }
        for step in path.windows(2) {
            assert_eq!(manhattan_distance(step[0], step[1]), 1, "{step:?}");
        }
    }

    fn random_grid(rng: &mut StdRng, width: usize, height: usize) -> Grid {
        let rows: Vec<String> = (0..height)
            .map(|_| {
                (0..width)
                    .map(|_| {
                        if rng.gen_bool(0.2) {
                            '*'
                        } else {
                            char::from_digit(rng.gen_range(1..=9), 10).unwrap()
                        }
                    })
                    .collect()
            })
            .collect();
        Grid::load(&rows, '*').unwrap()
    }

    #[test]
    fn test_open_grid_exact_path() {
        init_tracing();
        let grid = open_grid(4, 4);
        let mut finder = PathFinder::new();
        let path = finder.find_path(&grid, (0, 0), (3, 3)).unwrap();

        // Right is tried before up at every tie.
        assert_eq!(
            path,
            vec![(0, 0), (1, 0), (2, 0), (3, 0), (3, 1), (3, 2), (3, 3)]
        );
        assert_eq!(finder.stats().cost, 6);
        assert_eq!(finder.stats().path_len, 7);
    }

    #[test]
    fn test_route_around_center_wall() {
        init_tracing();
        let grid = Grid::load(&["...", ".*.", "..."], '*').unwrap();
        let path = PathFinder::new().find_path(&grid, (0, 0), (2, 2)).unwrap();

        assert!(!path.contains(&(1, 1)));
        assert_eq!(path, vec![(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)]);
        assert_valid_path(&grid, &path);
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = open_grid(3, 3);
        let mut finder = PathFinder::new();
        let path = finder.find_path(&grid, (1, 1), (1, 1)).unwrap();

        assert_eq!(path, vec![(1, 1)]);
        assert_eq!(finder.stats().cost, 0);
        assert_eq!(finder.stats().expanded_nodes, 1);
        assert_eq!(finder.state().status((1, 1)).unwrap(), Status::Settled);
    }

    #[test]
    fn test_walled_start_yields_empty_path() {
        let grid = Grid::load(&["*..", "...", "..."], '*').unwrap();
        let mut finder = PathFinder::new();

        assert!(finder.find_path(&grid, (0, 0), (2, 2)).unwrap().is_empty());
        assert_eq!(finder.stats().expanded_nodes, 0);
        assert!(finder.state().cells_with_status(Status::Settled).is_empty());

        // Same when start and goal coincide on a wall.
        assert!(finder.find_path(&grid, (0, 0), (0, 0)).unwrap().is_empty());
    }

    #[test]
    fn test_walled_goal_yields_empty_path() {
        let grid = Grid::load(&["...", "...", "..*"], '*').unwrap();
        let mut finder = PathFinder::new();

        assert!(finder.find_path(&grid, (0, 0), (2, 2)).unwrap().is_empty());
        assert_eq!(finder.state().cells_with_status(Status::Settled).len(), 8);
    }

    #[test]
    fn test_unreachable_goal_settles_reachable_cells() {
        init_tracing();
        let grid = Grid::from_file("map_file/test/enclosed.map", '*', Origin::TopLeft).unwrap();
        let mut finder = PathFinder::new();
        let path = finder.find_path(&grid, (0, 0), (2, 2)).unwrap();

        assert!(path.is_empty());
        assert_eq!(finder.stats().cost, 0);

        // 30 cells, 10 walls, 2 enclosed.
        let settled = finder.state().cells_with_status(Status::Settled);
        assert_eq!(settled.len(), 18);
        assert!(!settled.contains(&(2, 2)));
        assert!(!settled.contains(&(3, 2)));
        assert!(finder.state().cells_with_status(Status::Frontier).is_empty());
    }

    #[test]
    fn test_out_of_bounds_endpoints() {
        let grid = open_grid(3, 2);
        let mut finder = PathFinder::new();

        assert!(matches!(
            finder.find_path(&grid, (3, 0), (0, 0)),
            Err(PathError::OutOfBounds { x: 3, y: 0, .. })
        ));
        assert!(matches!(
            finder.find_path(&grid, (0, 0), (0, 2)),
            Err(PathError::OutOfBounds { x: 0, y: 2, .. })
        ));
    }

    #[test]
    fn test_open_grid_path_length_is_manhattan() {
        let grid = open_grid(5, 4);
        let mut finder = PathFinder::new();
        let cells = grid.passable_cells();

        for &start in &cells {
            for &goal in &cells {
                let path = finder.find_path(&grid, start, goal).unwrap();
                assert_eq!(path.len() - 1, manhattan_distance(start, goal));
                assert_eq!(path.first(), Some(&start));
                assert_eq!(path.last(), Some(&goal));
                assert_valid_path(&grid, &path);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let grid = Grid::demo(Origin::BottomLeft).unwrap();
        let mut finder = PathFinder::new();

        let first = finder.find_path(&grid, (1, 1), (14, 14)).unwrap();
        let second = finder.find_path(&grid, (1, 1), (14, 14)).unwrap();
        let fresh = PathFinder::new().find_path(&grid, (1, 1), (14, 14)).unwrap();

        assert!(!first.is_empty());
        assert_eq!(first, second);
        assert_eq!(first, fresh);
        assert_eq!(first, crate::algorithm::find_path(&grid, (1, 1), (14, 14)).unwrap());
    }

    #[test]
    fn test_accumulated_cost_along_path() {
        let grid = Grid::from_file("map_file/test/weighted.map", '#', Origin::TopLeft).unwrap();
        let mut finder = PathFinder::new();
        let path = finder.find_path(&grid, (0, 0), (4, 2)).unwrap();
        assert_valid_path(&grid, &path);

        let mut accumulated = 0;
        for (index, &position) in path.iter().enumerate() {
            if index > 0 {
                accumulated += grid.cost(position).unwrap();
            }
            let cell = finder.state().get(position).unwrap();
            assert_eq!(cell.status, Status::Settled);
            assert_eq!(cell.g_cost, accumulated);
        }
        assert_eq!(finder.stats().cost, accumulated);
        assert_eq!(path_cost(&grid, &path).unwrap(), accumulated);
    }

    #[test]
    fn test_detour_around_expensive_cell() {
        let grid = Grid::load(&["...", ".9.", "..."], '*').unwrap();
        let mut finder = PathFinder::new();
        let path = finder.find_path(&grid, (1, 0), (1, 2)).unwrap();

        assert!(!path.contains(&(1, 1)));
        assert_eq!(path, vec![(1, 0), (0, 0), (0, 1), (0, 2), (1, 2)]);
        assert_eq!(finder.stats().cost, 4);
    }

    #[test]
    fn test_decrease_key_on_cheaper_route() {
        init_tracing();
        // A costs 5 but looks free, so it is expanded before B and reaches C
        // first; B then finds the cheaper way into C.
        let grid = Grid::load(&[".5.", "..."], '*').unwrap();
        let heuristic = |position: Coord, _goal: Coord| -> usize {
            match position {
                (0, 1) => 5,
                (1, 1) => 1,
                (2, 0) => 10,
                _ => 0,
            }
        };
        let mut finder = PathFinder::with_heuristic(heuristic);
        let path = finder.find_path(&grid, (0, 0), (2, 1)).unwrap();

        assert_eq!(path, vec![(0, 0), (0, 1), (1, 1), (2, 1)]);
        assert_eq!(finder.stats().decreased_keys, 1);
        assert_eq!(finder.stats().cost, 3);
        assert_eq!(finder.state().get((1, 1)).unwrap().predecessor, Some((0, 1)));
    }

    #[test]
    fn test_manhattan_matches_zero_cost() {
        let grid = Grid::demo(Origin::BottomLeft).unwrap();
        let mut zero = PathFinder::new();
        let mut manhattan = PathFinder::with_heuristic(Manhattan);

        for (start, goal) in [((1, 1), (14, 14)), ((3, 2), (12, 9)), ((14, 1), (1, 13))] {
            let zero_path = zero.find_path(&grid, start, goal).unwrap();
            let manhattan_path = manhattan.find_path(&grid, start, goal).unwrap();

            assert_eq!(zero.stats().cost, manhattan.stats().cost);
            assert_eq!(zero_path.len(), manhattan_path.len());
            assert!(manhattan.stats().expanded_nodes <= zero.stats().expanded_nodes);
        }
    }

    #[test]
    fn test_random_grids_heuristics_agree() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut zero = PathFinder::new();
        let mut manhattan = PathFinder::with_heuristic(HeuristicKind::Manhattan);

        for _ in 0..20 {
            let grid = random_grid(&mut rng, 8, 8);
            let cells = grid.passable_cells();
            if cells.is_empty() {
                continue;
            }
            let start = cells[rng.gen_range(0..cells.len())];
            let goal = cells[rng.gen_range(0..cells.len())];

            let zero_path = zero.find_path(&grid, start, goal).unwrap();
            let manhattan_path = manhattan.find_path(&grid, start, goal).unwrap();

            assert_eq!(zero_path.is_empty(), manhattan_path.is_empty());
            assert_valid_path(&grid, &zero_path);
            assert_valid_path(&grid, &manhattan_path);
            assert_eq!(
                path_cost(&grid, &zero_path).unwrap(),
                path_cost(&grid, &manhattan_path).unwrap()
            );
        }
    }

    #[test]
    fn test_reuse_across_grids() {
        let mut finder = PathFinder::new();
        let large = open_grid(6, 6);
        let small = Grid::load(&["..", ".."], '*').unwrap();

        assert_eq!(finder.find_path(&large, (0, 0), (5, 5)).unwrap().len(), 11);
        assert_eq!(finder.find_path(&small, (0, 0), (1, 1)).unwrap().len(), 3);
        assert!(finder.state().get((5, 5)).is_err());
    }
}
