//! Deterministic simulation module
//!
//! All puzzle logic lives here. This module must be pure and deterministic:
//! - Injected, seedable RNG only
//! - Time is a virtual millisecond clock advanced by the caller
//! - No rendering or platform dependencies

pub mod executor;
pub mod grid;
pub mod instructions;
pub mod routing;
pub mod schedule;

pub use executor::{Executor, ExecutorStatus, LossReason, TickOutcome};
pub use grid::{Direction, GridWorld, MAX_PLACEMENT_ATTEMPTS, Position, validate_level};
pub use instructions::{Instruction, InstructionQueue};
pub use routing::{
    BIN_COUNT, LEVELS, NODE_COUNT, Route, RowState, TreeWalk, bin_position, node_level,
    node_position, preview, route, walk,
};
pub use schedule::{PendingTick, TickScheduler};
