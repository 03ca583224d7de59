//! Grid primitives and level generation
//!
//! Coordinates are integer cells with `y` growing downward, so `Up` is `-y`.
//! A level is a bounded rectangle with a start cell, an end cell and a list of
//! obstacle cells, placed by bounded rejection sampling.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Draws per placement before a colliding cell is accepted as-is
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;

/// A grid cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step in `direction` (may be out of bounds)
    #[inline]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// One of the four arrow directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit cell delta `(dx, dy)`
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Arrow glyph for instruction lists
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Left => "←",
            Direction::Right => "→",
        }
    }
}

/// Check dimensions and obstacle count before building a level
pub fn validate_level(width: i32, height: i32, obstacle_count: usize) -> Result<()> {
    if width < 1 || height < 1 {
        return Err(ConfigError::InvalidDimensions { width, height });
    }
    let cells = (width as usize)
        .checked_mul(height as usize)
        .ok_or(ConfigError::InvalidDimensions { width, height })?;
    if obstacle_count > cells {
        return Err(ConfigError::TooManyObstacles {
            count: obstacle_count,
            cells,
        });
    }
    Ok(())
}

/// A bounded level: start, goal and blocked cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridWorld {
    pub width: i32,
    pub height: i32,
    pub start: Position,
    pub end: Position,
    /// Obstacles in placement order. Duplicates are possible on dense grids.
    pub obstacles: Vec<Position>,
}

impl GridWorld {
    /// Build a fixed level (hand-authored or replayed)
    pub fn new(
        width: i32,
        height: i32,
        start: Position,
        end: Position,
        obstacles: Vec<Position>,
    ) -> Result<Self> {
        validate_level(width, height, obstacles.len())?;
        let world = Self {
            width,
            height,
            start,
            end,
            obstacles,
        };
        let cells = [world.start, world.end];
        if let Some(bad) = cells
            .iter()
            .chain(&world.obstacles)
            .find(|pos| !world.in_bounds(**pos))
        {
            return Err(ConfigError::OutOfBounds { x: bad.x, y: bad.y });
        }
        Ok(world)
    }

    /// Generate a random level
    ///
    /// Start is drawn freely. End rejects the start cell and each obstacle
    /// rejects every previously placed cell, each for at most
    /// [`MAX_PLACEMENT_ATTEMPTS`] draws; after that the colliding draw is kept.
    pub fn generate<R: Rng + ?Sized>(
        width: i32,
        height: i32,
        obstacle_count: usize,
        rng: &mut R,
    ) -> Result<Self> {
        validate_level(width, height, obstacle_count)?;

        let start = draw_position(rng, width, height, &[]);
        let end = draw_position(rng, width, height, &[start]);

        let mut placed = Vec::with_capacity(obstacle_count + 2);
        placed.push(start);
        placed.push(end);
        for _ in 0..obstacle_count {
            let obstacle = draw_position(rng, width, height, &placed);
            placed.push(obstacle);
        }
        let obstacles = placed.split_off(2);

        log::info!(
            "Generated {}x{} level: start=({}, {}) end=({}, {}) obstacles={}",
            width,
            height,
            start.x,
            start.y,
            end.x,
            end.y,
            obstacles.len()
        );

        Ok(Self {
            width,
            height,
            start,
            end,
            obstacles,
        })
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    #[inline]
    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos)
    }

    /// True if the agent may stand on `pos`
    pub fn is_open(&self, pos: Position) -> bool {
        self.in_bounds(pos) && !self.is_obstacle(pos)
    }
}

/// Uniform cell draw, retried while it lands on `exclude`
fn draw_position<R: Rng + ?Sized>(
    rng: &mut R,
    width: i32,
    height: i32,
    exclude: &[Position],
) -> Position {
    let mut attempts = 0;
    loop {
        let pos = Position::new(rng.random_range(0..width), rng.random_range(0..height));
        attempts += 1;
        if !exclude.contains(&pos) {
            return pos;
        }
        if attempts >= MAX_PLACEMENT_ATTEMPTS {
            log::warn!(
                "No free cell after {} draws, accepting collision at ({}, {})",
                attempts,
                pos.x,
                pos.y
            );
            return pos;
        }
    }
}
