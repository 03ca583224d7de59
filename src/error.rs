//! Configuration errors
//!
//! Gameplay never fails: a blocked move is a `Lost` outcome, not an error.
//! Only malformed configuration is rejected.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid grid dimensions {width}x{height} (both must be at least 1)")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("cell ({x}, {y}) lies outside the grid")]
    OutOfBounds { x: i32, y: i32 },
    #[error("{count} obstacles do not fit in a grid of {cells} cells")]
    TooManyObstacles { count: usize, cells: usize },
    #[error("tick delays must be non-zero")]
    InvalidDelay,
    #[error("row level {level} out of range (tree has {levels} levels)")]
    InvalidRowLevel { level: usize, levels: usize },
    #[error("settings json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
