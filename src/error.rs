//! Error types for grid loading and search

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    /// Malformed grid input, raised at load time.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Coordinate ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, PathError>;
