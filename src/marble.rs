//! Marble routing session
//!
//! Holds the four row switches and the committed fall path. Rows are frozen
//! while the marble is in flight; the animation layer calls
//! [`MarbleRunSession::finish_routing`] once it lands.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sim::routing::{self, LEVELS, NODE_COUNT, Route, RowState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarbleSnapshot {
    pub rows: [bool; LEVELS],
    pub node_states: Vec<bool>,
    pub bin_index: u8,
    pub is_playing: bool,
    /// Bin of the committed run, if one was started
    pub target_bin: Option<u8>,
    pub fall_path: Option<Vec<[f32; 3]>>,
    /// Present only while the preview overlay is enabled
    pub preview_path: Option<Vec<[f32; 3]>>,
    pub show_result: bool,
    pub show_help: bool,
    pub show_preview: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MarbleRunSession {
    rows: RowState,
    committed: Option<Route>,
    is_playing: bool,
    show_result: bool,
    show_help: bool,
    show_preview: bool,
}

impl MarbleRunSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one row switch. Ignored while the marble is falling.
    pub fn set_row_state(&mut self, level: usize, on: bool) -> Result<()> {
        if self.is_playing {
            return Ok(());
        }
        self.rows.set(level, on)
    }

    pub fn toggle_row(&mut self, level: usize) -> Result<()> {
        if self.is_playing {
            return Ok(());
        }
        self.rows.toggle(level)
    }

    /// All rows off
    pub fn reset_rows(&mut self) {
        if self.is_playing {
            return;
        }
        self.rows = RowState::default();
    }

    /// Compute and commit the fall path for the current rows
    ///
    /// Returns `None` if a marble is already falling.
    pub fn start_routing(&mut self) -> Option<&Route> {
        if self.is_playing {
            return None;
        }
        let route = routing::route(&self.rows);
        log::info!(
            "Marble dropped: rows {:?} -> bin {}",
            self.rows.rows(),
            route.bin_index
        );
        self.is_playing = true;
        self.show_result = false;
        self.committed = Some(route);
        self.committed.as_ref()
    }

    /// Marble has landed
    pub fn finish_routing(&mut self) {
        if !self.is_playing {
            return;
        }
        self.is_playing = false;
        self.show_result = true;
    }

    pub fn close_result(&mut self) {
        self.show_result = false;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn toggle_path_preview(&mut self) {
        self.show_preview = !self.show_preview;
    }

    pub fn rows(&self) -> RowState {
        self.rows
    }

    /// Bin the current rows lead to (always recomputed)
    pub fn bin_index(&self) -> u8 {
        routing::walk(&self.rows).bin
    }

    /// Live centreline for the current rows; never touches session state
    pub fn preview(&self) -> Route {
        routing::preview(&self.rows)
    }

    pub fn committed_route(&self) -> Option<&Route> {
        self.committed.as_ref()
    }

    pub fn node_states(&self) -> [bool; NODE_COUNT] {
        self.rows.node_states()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn show_result(&self) -> bool {
        self.show_result
    }

    pub fn snapshot(&self) -> MarbleSnapshot {
        let points = |route: &Route| -> Vec<[f32; 3]> {
            route.waypoints.iter().map(|p| p.to_array()).collect()
        };
        MarbleSnapshot {
            rows: self.rows.rows(),
            node_states: self.node_states().to_vec(),
            bin_index: self.bin_index(),
            is_playing: self.is_playing,
            target_bin: self.committed.as_ref().map(|r| r.bin_index),
            fall_path: self.committed.as_ref().map(points),
            preview_path: self.show_preview.then(|| points(&self.preview())),
            show_result: self.show_result,
            show_help: self.show_help,
            show_preview: self.show_preview,
        }
    }
}
