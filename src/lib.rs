//! Puzzle Sim - deterministic cores for two browser puzzle games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid executor, tick scheduler, marble routing)
//! - `pathfinding`: Grid game session (level, instruction queue, timed run)
//! - `marble`: Marble routing session (row switches, fall path, preview)
//! - `settings`: Level size and tick timing
//! - `platform`: Browser/native platform abstraction

pub mod error;
pub mod marble;
pub mod pathfinding;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, Result};
pub use marble::{MarbleRunSession, MarbleSnapshot};
pub use pathfinding::{PathfindingSession, PathfindingSnapshot};
pub use settings::Settings;
