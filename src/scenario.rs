use anyhow::Context;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, Write};
use tracing::{debug, info};

use crate::algorithm::{Heuristic, PathFinder};
use crate::common::{Coord, Path};
use crate::error::{PathError, Result};
use crate::map::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Query {
    pub start: Coord,
    pub goal: Coord,
}

impl Query {
    pub fn verify(&self, grid: &Grid) -> bool {
        grid.in_bounds(self.start) && grid.in_bounds(self.goal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub start: Coord,
    pub goal: Coord,
    pub path: Path,
    pub cost: usize,
    pub expanded_nodes: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scenario {
    pub queries: Vec<Query>,
}

impl Scenario {
    pub fn new(queries: Vec<Query>) -> Self {
        Scenario { queries }
    }

    /// Load a YAML sequence of `{ start: [x, y], goal: [x, y] }`.
    pub fn load_from_yaml(path: &str) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let queries: Vec<Query> = serde_yaml::from_reader(reader)?;
        Ok(Scenario { queries })
    }

    /// Draw `num_queries` start/goal pairs uniformly from the open cells.
    pub fn generate_random<R: Rng + ?Sized>(
        grid: &Grid,
        num_queries: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let cells = grid.passable_cells();
        if cells.is_empty() {
            return Err(PathError::Config(
                "grid has no open cells to place queries on".to_string(),
            ));
        }

        let mut queries = Vec::with_capacity(num_queries);
        for _ in 0..num_queries {
            let start = cells[rng.gen_range(0..cells.len())];
            let goal = cells[rng.gen_range(0..cells.len())];
            queries.push(Query { start, goal });
        }

        info!("Generate queries: {queries:?}");
        Ok(Scenario { queries })
    }

    /// Run every query with `finder`, in order.
    pub fn solve<H: Heuristic>(
        &self,
        grid: &Grid,
        finder: &mut PathFinder<H>,
    ) -> Result<Vec<QueryResult>> {
        let mut results = Vec::with_capacity(self.queries.len());
        for query in &self.queries {
            let path = finder.find_path(grid, query.start, query.goal)?;
            let stats = finder.stats();
            debug!("query {query:?}: {stats:?}");
            stats.print();
            results.push(QueryResult {
                start: query.start,
                goal: query.goal,
                path,
                cost: stats.cost,
                expanded_nodes: stats.expanded_nodes,
            });
        }
        Ok(results)
    }

    /// Write results as JSON when `path` ends in `.json`, otherwise YAML.
    pub fn write_results(path: &str, results: &[QueryResult]) -> anyhow::Result<()> {
        let file = File::create(path).with_context(|| format!("cannot create {path}"))?;
        let mut writer = io::BufWriter::new(file);
        let data = if path.ends_with(".json") {
            serde_json::to_string_pretty(results)?
        } else {
            serde_yaml::to_string(results)?
        };
        writer.write_all(data.as_bytes())?;

        Ok(())
    }
}
