//! Grid game session
//!
//! Owns the level, the instruction queue, the executor and its tick scheduler.
//! The rendering layer only calls the action methods and reads snapshots.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::settings::Settings;
use crate::sim::{
    Direction, Executor, ExecutorStatus, GridWorld, Instruction, InstructionQueue, LossReason,
    Position, TickOutcome, TickScheduler,
};

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathfindingSnapshot {
    pub world: GridWorld,
    pub status: ExecutorStatus,
    pub is_playing: bool,
    pub position: Position,
    pub path_history: Vec<Position>,
    pub instructions: Vec<Instruction>,
    pub instruction_cursor: usize,
    pub loss_reason: Option<LossReason>,
    pub show_result: bool,
}

pub struct PathfindingSession {
    settings: Settings,
    rng: Pcg32,
    world: GridWorld,
    queue: InstructionQueue,
    executor: Executor,
    scheduler: TickScheduler,
}

impl PathfindingSession {
    /// Validate settings and generate the first level
    ///
    /// `seed` is used when the settings carry none.
    pub fn new(settings: Settings, seed: u64) -> Result<Self> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or(seed);
        log::info!("Pathfinding session seed: {}", seed);
        let mut rng = Pcg32::seed_from_u64(seed);
        let world = GridWorld::generate(
            settings.grid_width,
            settings.grid_height,
            settings.obstacle_count,
            &mut rng,
        )?;
        Ok(Self::assemble(settings, rng, world))
    }

    /// Session over a fixed level
    pub fn with_world(world: GridWorld, settings: Settings) -> Result<Self> {
        settings.validate()?;
        let rng = Pcg32::seed_from_u64(settings.seed.unwrap_or_default());
        let settings = Settings {
            grid_width: world.width,
            grid_height: world.height,
            obstacle_count: world.obstacles.len(),
            ..settings
        };
        Ok(Self::assemble(settings, rng, world))
    }

    fn assemble(settings: Settings, rng: Pcg32, world: GridWorld) -> Self {
        Self {
            settings,
            rng,
            executor: Executor::new(world.start),
            world,
            queue: InstructionQueue::new(),
            scheduler: TickScheduler::new(),
        }
    }

    // === Level actions ===

    /// Change the grid configuration and build a fresh level for it
    pub fn generate_world(&mut self, width: i32, height: i32, obstacle_count: usize) -> Result<()> {
        let settings = Settings {
            grid_width: width,
            grid_height: height,
            obstacle_count,
            ..self.settings.clone()
        };
        settings.validate()?;
        self.settings = settings;
        self.new_level()
    }

    /// Fresh level with the current configuration; clears the queue
    pub fn new_level(&mut self) -> Result<()> {
        let world = GridWorld::generate(
            self.settings.grid_width,
            self.settings.grid_height,
            self.settings.obstacle_count,
            &mut self.rng,
        )?;
        self.scheduler.cancel_all();
        self.executor = Executor::new(world.start);
        self.world = world;
        self.queue.clear();
        Ok(())
    }

    // === Instruction actions ===

    /// Queue one step. Ignored while a run is in progress.
    pub fn append_instruction(&mut self, direction: Direction) -> bool {
        if self.is_playing() {
            log::debug!("Ignoring {} while playing", direction.as_str());
            return false;
        }
        self.queue.append(direction);
        true
    }

    pub fn remove_last_instruction(&mut self) -> Option<Instruction> {
        if self.is_playing() {
            return None;
        }
        self.queue.remove_last()
    }

    pub fn clear_instructions(&mut self) {
        if self.is_playing() {
            return;
        }
        self.queue.clear();
        self.executor.clear_cursor();
    }

    // === Run actions ===

    /// Start executing the queue from the start cell
    ///
    /// Supersedes any ticks left over from an earlier run. Returns false when
    /// the queue is empty.
    pub fn start_execution(&mut self) -> bool {
        if !self.executor.start(&self.world, &self.queue) {
            return false;
        }
        self.scheduler.cancel_all();
        self.scheduler.schedule(0);
        true
    }

    /// Back to `Idle` at the start cell; the queue is kept
    pub fn reset_session(&mut self) {
        self.scheduler.cancel_all();
        self.executor.reset(self.world.start);
    }

    pub fn close_result(&mut self) {
        self.executor.close_result();
    }

    /// Advance the virtual clock by `dt_ms`, running every tick that comes due
    pub fn update(&mut self, dt_ms: u64) {
        let deadline = self.scheduler.now_ms().saturating_add(dt_ms);
        while self.scheduler.pop_due(deadline).is_some() {
            self.run_tick();
        }
        self.scheduler.settle(deadline);
    }

    /// Run pending ticks until the run ends; returns the final status
    pub fn run_to_completion(&mut self) -> ExecutorStatus {
        while self.scheduler.pop_next().is_some() {
            self.run_tick();
        }
        self.executor.status()
    }

    fn run_tick(&mut self) {
        match self.executor.tick(&self.world, &self.queue) {
            TickOutcome::Moved(_) => {
                self.scheduler.schedule(self.settings.movement_delay_ms);
            }
            TickOutcome::Advanced => {
                self.scheduler.schedule(self.settings.instruction_delay_ms);
            }
            TickOutcome::Finished(_) | TickOutcome::Ignored => {}
        }
    }

    // === Observations ===

    pub fn status(&self) -> ExecutorStatus {
        self.executor.status()
    }

    pub fn is_playing(&self) -> bool {
        self.executor.status() == ExecutorStatus::Playing
    }

    pub fn position(&self) -> Position {
        self.executor.position()
    }

    pub fn path_history(&self) -> &[Position] {
        self.executor.path_history()
    }

    pub fn instructions(&self) -> &InstructionQueue {
        &self.queue
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn show_result(&self) -> bool {
        self.executor.show_result()
    }

    /// Virtual time elapsed, in milliseconds
    pub fn clock_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn snapshot(&self) -> PathfindingSnapshot {
        PathfindingSnapshot {
            world: self.world.clone(),
            status: self.executor.status(),
            is_playing: self.is_playing(),
            position: self.executor.position(),
            path_history: self.executor.path_history().to_vec(),
            instructions: self.queue.as_slice().to_vec(),
            instruction_cursor: self.executor.cursor(),
            loss_reason: self.executor.loss_reason(),
            show_result: self.executor.show_result(),
        }
    }
}
