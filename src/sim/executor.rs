//! Step executor state machine
//!
//! Walks the agent one cell per tick along the queued instructions. Each call
//! to [`Executor::tick`] fully applies one transition and reports what the
//! driver should do next; the executor itself never sleeps or schedules.

use serde::{Deserialize, Serialize};

use super::grid::{GridWorld, Position};
use super::instructions::InstructionQueue;

/// Lifecycle of one execution run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutorStatus {
    /// Level loaded, waiting for start
    #[default]
    Idle,
    /// Instructions are being executed
    Playing,
    /// Instructions ran out exactly on the end cell
    Won,
    /// Blocked move or instructions ran out elsewhere
    Lost,
}

impl ExecutorStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutorStatus::Won | ExecutorStatus::Lost)
    }
}

/// Why a run ended in [`ExecutorStatus::Lost`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    /// The next move would leave the grid
    OutOfBounds { at: Position },
    /// The next move would enter an obstacle
    Obstacle { at: Position },
    /// All instructions consumed away from the end cell
    ShortOfGoal,
}

/// Result of one tick, used by the driver to pick the next delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; stale or late tick
    Ignored,
    /// Agent moved to a new cell (schedule after the movement delay)
    Moved(Position),
    /// Current instruction exhausted, cursor advanced (inter-instruction delay)
    Advanced,
    /// Run ended; schedule nothing
    Finished(ExecutorStatus),
}

impl TickOutcome {
    /// True if the driver should schedule another tick
    pub fn continues(&self) -> bool {
        matches!(self, TickOutcome::Moved(_) | TickOutcome::Advanced)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Executor {
    status: ExecutorStatus,
    position: Position,
    /// Visited cells, first entry is always the start cell
    path_history: Vec<Position>,
    /// Index into the instruction queue
    cursor: usize,
    loss_reason: Option<LossReason>,
    show_result: bool,
}

impl Executor {
    pub fn new(start: Position) -> Self {
        Self {
            status: ExecutorStatus::Idle,
            position: start,
            path_history: vec![start],
            cursor: 0,
            loss_reason: None,
            show_result: false,
        }
    }

    /// Begin a run from the world's start cell
    ///
    /// Returns false (and changes nothing) when the queue is empty.
    pub fn start(&mut self, world: &GridWorld, queue: &InstructionQueue) -> bool {
        if queue.is_empty() {
            return false;
        }
        self.rewind(world.start);
        self.status = ExecutorStatus::Playing;
        log::info!(
            "Executing {} instructions ({} steps) from ({}, {})",
            queue.len(),
            queue.total_steps(),
            world.start.x,
            world.start.y
        );
        true
    }

    /// Advance the simulation by one tick
    pub fn tick(&mut self, world: &GridWorld, queue: &InstructionQueue) -> TickOutcome {
        if self.status != ExecutorStatus::Playing {
            return TickOutcome::Ignored;
        }

        let Some(instruction) = queue.get(self.cursor) else {
            return if self.position == world.end {
                self.finish(ExecutorStatus::Won, None)
            } else {
                self.finish(ExecutorStatus::Lost, Some(LossReason::ShortOfGoal))
            };
        };

        let steps_completed = (self.path_history.len() - 1) as u32;
        let step_in_instruction = steps_completed.saturating_sub(queue.steps_before(self.cursor));

        if step_in_instruction >= instruction.steps {
            self.cursor += 1;
            return TickOutcome::Advanced;
        }

        let next = self.position.step(instruction.direction);
        if !world.in_bounds(next) {
            return self.finish(ExecutorStatus::Lost, Some(LossReason::OutOfBounds { at: next }));
        }
        if world.is_obstacle(next) {
            return self.finish(ExecutorStatus::Lost, Some(LossReason::Obstacle { at: next }));
        }

        self.position = next;
        self.path_history.push(next);
        TickOutcome::Moved(next)
    }

    /// Return to `Idle` at `start` from any state
    pub fn reset(&mut self, start: Position) {
        self.rewind(start);
        self.status = ExecutorStatus::Idle;
    }

    /// Point the cursor back at the first instruction
    pub fn clear_cursor(&mut self) {
        self.cursor = 0;
    }

    pub fn close_result(&mut self) {
        self.show_result = false;
    }

    pub fn status(&self) -> ExecutorStatus {
        self.status
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn path_history(&self) -> &[Position] {
        &self.path_history
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn loss_reason(&self) -> Option<LossReason> {
        self.loss_reason
    }

    pub fn show_result(&self) -> bool {
        self.show_result
    }

    fn rewind(&mut self, start: Position) {
        self.position = start;
        self.path_history.clear();
        self.path_history.push(start);
        self.cursor = 0;
        self.loss_reason = None;
        self.show_result = false;
    }

    fn finish(&mut self, status: ExecutorStatus, reason: Option<LossReason>) -> TickOutcome {
        self.status = status;
        self.loss_reason = reason;
        self.show_result = true;
        match reason {
            None => log::info!(
                "Run won at ({}, {}) after {} steps",
                self.position.x,
                self.position.y,
                self.path_history.len() - 1
            ),
            Some(reason) => log::info!(
                "Run lost at ({}, {}): {:?}",
                self.position.x,
                self.position.y,
                reason
            ),
        }
        TickOutcome::Finished(status)
    }
}
