//! Display view model.
//!
//! The engine pushes a [`DisplayState`] to a [`DisplaySink`] after every
//! state change; sinks only render, they never feed back into the engine.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::timer::Phase;

/// Everything a widget needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayState {
    /// Remaining time as `MM:SS`.
    pub time_text: String,
    pub phase: Phase,
    pub phase_label: String,
    pub running: bool,
    /// Duration and goal controls accept edits.
    pub controls_enabled: bool,
    pub low_time: bool,
    pub toggle_label: String,
    /// 0.0 .. 1.0 elapsed fraction of the active phase.
    pub phase_progress: f64,
    /// 0.0 .. 100.0 progress towards the session goal.
    pub goal_progress_pct: f64,
    pub goal_complete: bool,
    pub completed: u64,
    pub goal: u32,
    pub session_minutes: u32,
    pub break_minutes: u32,
    pub remaining_secs: u64,
    pub restart_pending: bool,
}

/// Push-only rendering target.
pub trait DisplaySink {
    fn render(&mut self, state: &DisplayState) -> Result<()>;
}

/// Format seconds as zero-padded `MM:SS`. Minutes are not wrapped into hours.
pub fn format_time(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
