//! Session settings
//!
//! Level size and tick timing for the grid game. Hosts can hand these over as
//! JSON; anything malformed is rejected before a level is built.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::sim::grid::validate_level;

/// Smallest grid side offered by the level editor
pub const MIN_GRID_SIDE: i32 = 4;
/// Largest grid side offered by the level editor
pub const MAX_GRID_SIDE: i32 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Level ===
    pub grid_width: i32,
    pub grid_height: i32,
    pub obstacle_count: usize,

    // === Timing ===
    /// Delay after a one-cell move before the next tick
    pub movement_delay_ms: u64,
    /// Delay after finishing an instruction before the next one starts
    pub instruction_delay_ms: u64,

    /// Level seed; `None` derives one from the clock
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_width: 8,
            grid_height: 8,
            obstacle_count: 8,

            movement_delay_ms: 400,
            instruction_delay_ms: 300,

            seed: None,
        }
    }
}

impl Settings {
    /// Settings for a given grid, default timing
    pub fn with_grid(width: i32, height: i32, obstacle_count: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            obstacle_count,
            ..Self::default()
        }
    }

    /// Obstacle cap the level editor offers for a grid (a third of the cells)
    pub fn max_obstacles_for(width: i32, height: i32) -> usize {
        (width.max(0) as usize).saturating_mul(height.max(0) as usize) / 3
    }

    /// True if the grid fits the level editor's ranges
    pub fn within_editor_limits(&self) -> bool {
        let sides = MIN_GRID_SIDE..=MAX_GRID_SIDE;
        sides.contains(&self.grid_width)
            && sides.contains(&self.grid_height)
            && self.obstacle_count <= Self::max_obstacles_for(self.grid_width, self.grid_height)
    }

    pub fn validate(&self) -> Result<()> {
        validate_level(self.grid_width, self.grid_height, self.obstacle_count)?;
        if self.movement_delay_ms == 0 || self.instruction_delay_ms == 0 {
            return Err(ConfigError::InvalidDelay);
        }
        Ok(())
    }

    /// Parse and validate settings; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!(
            "Loaded settings: {}x{} grid, {} obstacles",
            settings.grid_width,
            settings.grid_height,
            settings.obstacle_count
        );
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
