use std::fs;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::Coord;
use crate::error::{PathError, Result};

// Left, right, up, down. Up is `y + 1`.
const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, 1), (0, -1)];

const DEMO_MAP: [&str; 16] = [
    "****************",
    "*.......*.*....*",
    "*..........*...*",
    "*..............*",
    "*.....****.....*",
    "*.....****.....*",
    "*.....****.....*",
    "*.....****.....*",
    "*.....****.....*",
    "*.....****.....*",
    "*..............*",
    "*.....*****....*",
    "*.....*****....*",
    "*..............*",
    "*..............*",
    "****************",
];

/// Which map row becomes `y = 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    /// First row is `y = 0`.
    #[default]
    TopLeft,
    /// Last row is `y = 0`, so `y` grows towards the top of the text.
    BottomLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    wall: bool,
    cost: usize, // cost of entering this tile, never read for walls
}

impl Tile {
    pub fn is_wall(&self) -> bool {
        self.wall
    }

    pub fn cost(&self) -> usize {
        self.cost
    }
}

/// Immutable wall/cost grid. Tiles are stored row-major by `y`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Load a grid whose first row is `y = 0`.
    ///
    /// `wall_char` marks a wall, a digit `1`-`9` marks an open tile with that
    /// entering cost, and any other character is an open tile of cost 1.
    pub fn load<S: AsRef<str>>(rows: &[S], wall_char: char) -> Result<Self> {
        Self::load_with_origin(rows, wall_char, Origin::TopLeft)
    }

    pub fn load_with_origin<S: AsRef<str>>(
        rows: &[S],
        wall_char: char,
        origin: Origin,
    ) -> Result<Self> {
        let height = rows.len();
        if height == 0 {
            return Err(PathError::Config("grid has no rows".to_string()));
        }
        let width = rows[0].as_ref().chars().count();
        if width == 0 {
            return Err(PathError::Config("grid has zero width".to_string()));
        }

        let mut tiles = vec![Tile { wall: false, cost: 1 }; width * height];
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let row_width = row.chars().count();
            if row_width != width {
                return Err(PathError::Config(format!(
                    "row {row_index} has {row_width} cells, expected {width}"
                )));
            }

            let y = match origin {
                Origin::TopLeft => row_index,
                Origin::BottomLeft => height - row_index - 1,
            };
            for (x, ch) in row.chars().enumerate() {
                tiles[y * width + x] = parse_tile(ch, wall_char).map_err(|err| {
                    PathError::Config(format!("row {row_index}, column {x}: {err}"))
                })?;
            }
        }

        debug!("loaded {width}x{height} grid");
        Ok(Grid {
            width,
            height,
            tiles,
        })
    }

    /// Read a text map from disk. An optional header of the form
    /// `type <t>` / `height <n>` / `width <n>` / `map` may precede the rows.
    pub fn from_file(path: &str, wall_char: char, origin: Origin) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut lines = content.lines().map(|line| line.trim_end_matches('\r')).peekable();

        let declared = if lines.peek().is_some_and(|line| line.starts_with("type")) {
            let _type = lines.next();
            let height = parse_header_value(lines.next(), "height")?;
            let width = parse_header_value(lines.next(), "width")?;
            match lines.next() {
                Some("map") => {}
                other => {
                    return Err(PathError::Config(format!(
                        "expected `map` header line, got {other:?}"
                    )))
                }
            }
            Some((width, height))
        } else {
            None
        };

        let mut rows: Vec<&str> = lines.collect();
        while rows.last().is_some_and(|row| row.trim().is_empty()) {
            rows.pop();
        }

        let grid = Self::load_with_origin(&rows, wall_char, origin)?;
        if let Some((width, height)) = declared {
            if (width, height) != (grid.width, grid.height) {
                return Err(PathError::Config(format!(
                    "header declares {width}x{height} but map rows are {}x{}",
                    grid.width, grid.height
                )));
            }
        }
        Ok(grid)
    }

    /// The 16x16 demo map, walls drawn with `*`.
    pub fn demo(origin: Origin) -> Result<Self> {
        Self::load_with_origin(&DEMO_MAP, '*', origin)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, (x, y): Coord) -> bool {
        x < self.width && y < self.height
    }

    pub fn tile(&self, position: Coord) -> Result<&Tile> {
        if !self.in_bounds(position) {
            return Err(self.out_of_bounds(position));
        }
        Ok(&self.tiles[position.1 * self.width + position.0])
    }

    pub fn is_wall(&self, position: Coord) -> Result<bool> {
        self.tile(position).map(Tile::is_wall)
    }

    pub fn cost(&self, position: Coord) -> Result<usize> {
        self.tile(position).map(Tile::cost)
    }

    /// In-bounds cardinal neighbors in left, right, up, down order. Walls are
    /// not filtered.
    pub fn neighbors(&self, (x, y): Coord) -> Vec<Coord> {
        let mut neighbors = Vec::with_capacity(DIRECTIONS.len());
        for &(dx, dy) in &DIRECTIONS {
            let (Some(new_x), Some(new_y)) = (x.checked_add_signed(dx), y.checked_add_signed(dy))
            else {
                continue;
            };
            if self.in_bounds((new_x, new_y)) {
                neighbors.push((new_x, new_y));
            }
        }
        neighbors
    }

    /// Every open tile, ordered by `y` then `x`.
    pub fn passable_cells(&self) -> Vec<Coord> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| !self.tiles[y * self.width + x].wall)
            .collect()
    }

    pub(crate) fn out_of_bounds(&self, (x, y): Coord) -> PathError {
        PathError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }
}

fn parse_tile(ch: char, wall_char: char) -> std::result::Result<Tile, String> {
    if ch == wall_char {
        return Ok(Tile { wall: true, cost: 1 });
    }
    match ch.to_digit(10) {
        Some(0) => Err("traversal cost must be at least 1".to_string()),
        Some(cost) => Ok(Tile {
            wall: false,
            cost: cost as usize,
        }),
        None => Ok(Tile { wall: false, cost: 1 }),
    }
}

fn parse_header_value(line: Option<&str>, key: &str) -> Result<usize> {
    let line = line.ok_or_else(|| PathError::Config(format!("missing `{key}` header line")))?;
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(name), Some(value)) if name == key => value
            .parse::<usize>()
            .map_err(|_| PathError::Config(format!("invalid {key} value `{value}`"))),
        _ => Err(PathError::Config(format!(
            "expected `{key} <n>` header line, got `{line}`"
        ))),
    }
}
