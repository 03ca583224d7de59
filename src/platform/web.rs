//! wasm-bindgen handles for the browser front end
//!
//! The page owns one handle per game, forwards button presses as actions,
//! calls `update` from its animation frame, and reads state back as JSON.

use wasm_bindgen::prelude::*;

use crate::error::ConfigError;
use crate::marble::MarbleRunSession;
use crate::pathfinding::PathfindingSession;
use crate::settings::Settings;
use crate::sim::Direction;

fn to_js(err: ConfigError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    super::init_logging();
    log::info!("Puzzle sim loaded");
}

#[wasm_bindgen]
pub struct PathfindingGame {
    session: PathfindingSession,
}

#[wasm_bindgen]
impl PathfindingGame {
    /// New game from a JSON settings blob (empty string = defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str) -> Result<PathfindingGame, JsValue> {
        let settings = if settings_json.trim().is_empty() {
            Settings::default()
        } else {
            Settings::from_json(settings_json).map_err(to_js)?
        };
        let session = PathfindingSession::new(settings, super::time_seed()).map_err(to_js)?;
        Ok(Self { session })
    }

    pub fn generate_world(
        &mut self,
        width: i32,
        height: i32,
        obstacle_count: usize,
    ) -> Result<(), JsValue> {
        self.session
            .generate_world(width, height, obstacle_count)
            .map_err(to_js)
    }

    pub fn new_level(&mut self) -> Result<(), JsValue> {
        self.session.new_level().map_err(to_js)
    }

    /// `direction` is one of "up", "down", "left", "right"
    pub fn append_instruction(&mut self, direction: &str) -> bool {
        match Direction::from_str(direction) {
            Some(dir) => self.session.append_instruction(dir),
            None => {
                log::warn!("Unknown direction {:?}", direction);
                false
            }
        }
    }

    pub fn remove_last_instruction(&mut self) {
        self.session.remove_last_instruction();
    }

    pub fn clear_instructions(&mut self) {
        self.session.clear_instructions();
    }

    pub fn start_execution(&mut self) -> bool {
        self.session.start_execution()
    }

    pub fn reset_session(&mut self) {
        self.session.reset_session();
    }

    pub fn close_result(&mut self) {
        self.session.close_result();
    }

    /// Advance by the frame delta (milliseconds)
    pub fn update(&mut self, dt_ms: f64) {
        self.session.update(dt_ms.max(0.0) as u64);
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.snapshot())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

#[wasm_bindgen]
pub struct MarbleGame {
    session: MarbleRunSession,
}

#[wasm_bindgen]
impl MarbleGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> MarbleGame {
        Self {
            session: MarbleRunSession::new(),
        }
    }

    pub fn set_row_state(&mut self, level: usize, on: bool) -> Result<(), JsValue> {
        self.session.set_row_state(level, on).map_err(to_js)
    }

    pub fn toggle_row(&mut self, level: usize) -> Result<(), JsValue> {
        self.session.toggle_row(level).map_err(to_js)
    }

    pub fn reset_rows(&mut self) {
        self.session.reset_rows();
    }

    /// Commit the route; false if a marble is already falling
    pub fn start_routing(&mut self) -> bool {
        self.session.start_routing().is_some()
    }

    pub fn finish_routing(&mut self) {
        self.session.finish_routing();
    }

    pub fn close_result(&mut self) {
        self.session.close_result();
    }

    pub fn toggle_help(&mut self) {
        self.session.toggle_help();
    }

    pub fn toggle_path_preview(&mut self) {
        self.session.toggle_path_preview();
    }

    pub fn bin_index(&self) -> u8 {
        self.session.bin_index()
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.snapshot())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for MarbleGame {
    fn default() -> Self {
        Self::new()
    }
}
