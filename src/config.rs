use anyhow::{anyhow, bail};
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::algorithm::HeuristicKind;
use crate::common::Coord;
use crate::map::Origin;

#[derive(Parser, Debug)]
#[command(
    name = "grid_pathfind",
    about = "Lowest-cost path search on 2D grids with walls and traversal costs.",
    version = "0.1"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Path to the map file, the demo map is used if omitted")]
    pub map_path: Option<String>,

    #[arg(long, help = "Character marking a wall in the map")]
    pub wall_char: Option<char>,

    #[arg(long, value_enum, help = "Which map row is y = 0")]
    pub origin: Option<Origin>,

    #[arg(long, value_enum, help = "Heuristic used by the search")]
    pub heuristic: Option<HeuristicKind>,

    #[arg(long, help = "Start cell as x,y", value_delimiter = ',')]
    pub start: Option<Vec<usize>>,

    #[arg(long, help = "Goal cell as x,y", value_delimiter = ',')]
    pub goal: Option<Vec<usize>>,

    #[arg(long, help = "Path to a YAML file of start/goal queries")]
    pub scen_path: Option<String>,

    #[arg(long, help = "Number of random queries when no start/goal or scenario is given")]
    pub num_queries: Option<usize>,

    #[arg(long, help = "Seed for the random number generator")]
    pub seed: Option<u64>,

    #[arg(long, help = "Path to the results file (.json for JSON, YAML otherwise)")]
    pub output_path: Option<String>,

    #[arg(long, help = "Log level used when RUST_LOG is not set")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub map_path: Option<String>,
    pub wall_char: char,
    pub origin: Origin,
    pub heuristic: HeuristicKind,
    pub start: Option<Coord>,
    pub goal: Option<Coord>,
    pub scen_path: Option<String>,
    pub num_queries: usize,
    pub seed: u64,
    pub output_path: Option<String>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            map_path: None,
            wall_char: '*',
            origin: Origin::TopLeft,
            heuristic: HeuristicKind::Zero,
            start: None,
            goal: None,
            scen_path: None,
            num_queries: 10,
            seed: 0,
            output_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(map_path) = &cli.map_path {
            self.map_path = Some(map_path.clone());
        }
        if let Some(wall_char) = cli.wall_char {
            self.wall_char = wall_char;
        }
        if let Some(origin) = cli.origin {
            self.origin = origin;
        }
        if let Some(heuristic) = cli.heuristic {
            self.heuristic = heuristic;
        }
        if let Some(start) = &cli.start {
            self.start = Some(parse_coord(start, "start")?);
        }
        if let Some(goal) = &cli.goal {
            self.goal = Some(parse_coord(goal, "goal")?);
        }
        if let Some(scen_path) = &cli.scen_path {
            self.scen_path = Some(scen_path.clone());
        }
        if let Some(num_queries) = cli.num_queries {
            self.num_queries = num_queries;
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if let Some(output_path) = &cli.output_path {
            self.output_path = Some(output_path.clone());
        }
        if let Some(log_level) = &cli.log_level {
            self.log_level = log_level.clone();
        }
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.start.is_some() != self.goal.is_some() {
            bail!("start and goal must be given together");
        }

        if self.start.is_none() && self.scen_path.is_none() && self.num_queries == 0 {
            bail!("no queries: give start and goal, a scenario file, or num_queries > 0");
        }

        if self.wall_char.is_whitespace() {
            bail!("wall character must be visible, got {:?}", self.wall_char);
        }

        self.log_level
            .parse::<tracing::Level>()
            .map_err(|_| anyhow!("invalid log level `{}`", self.log_level))?;

        Ok(())
    }
}

fn parse_coord(values: &[usize], name: &str) -> anyhow::Result<Coord> {
    match values {
        [x, y] => Ok((*x, *y)),
        _ => Err(anyhow!(
            "{name} must be two comma-separated numbers x,y, got {values:?}"
        )),
    }
}
