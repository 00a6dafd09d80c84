use grid_pathfind::config::{Cli, Config};
use grid_pathfind::map::Grid;
use grid_pathfind::scenario::{Query, Scenario};
use grid_pathfind::PathFinder;

use anyhow::{bail, Context};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)
            .with_context(|| format!("cannot read config file: {config_file}"))?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        Config::default()
    }
    .override_from_command_line(&cli)?;
    config.validate()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    if cli.config.is_none() {
        info!("No config file specified, using default config");
    }

    let grid = match config.map_path.as_deref() {
        Some(map_path) => Grid::from_file(map_path, config.wall_char, config.origin)
            .with_context(|| format!("error loading map: {map_path}"))?,
        None => {
            info!("No map file specified, using demo map");
            Grid::demo(config.origin)?
        }
    };
    info!("Grid {}x{}", grid.width(), grid.height());

    let scenario = match (config.start, config.goal, config.scen_path.as_deref()) {
        (Some(start), Some(goal), _) => Scenario::new(vec![Query { start, goal }]),
        (_, _, Some(scen_path)) => Scenario::load_from_yaml(scen_path)
            .with_context(|| format!("error loading scenario: {scen_path}"))?,
        _ => {
            let mut rng = StdRng::seed_from_u64(config.seed);
            Scenario::generate_random(&grid, config.num_queries, &mut rng)?
        }
    };
    for query in &scenario.queries {
        if !query.verify(&grid) {
            bail!(
                "query {query:?} lies outside the {}x{} grid",
                grid.width(),
                grid.height()
            );
        }
    }

    let mut finder = PathFinder::with_heuristic(config.heuristic);
    let results = scenario.solve(&grid, &mut finder)?;
    for result in &results {
        if result.path.is_empty() {
            warn!("no path from {:?} to {:?}", result.start, result.goal);
        } else {
            info!(
                "path from {:?} to {:?}, cost {}: {:?}",
                result.start, result.goal, result.cost, result.path
            );
        }
    }

    if let Some(output_path) = config.output_path.as_deref() {
        Scenario::write_results(output_path, &results)?;
        info!("Results written to {output_path}");
    }

    Ok(())
}
