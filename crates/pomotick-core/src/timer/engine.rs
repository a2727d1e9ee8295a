//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It does not use
//! internal threads or timers - it only records which task the host should
//! schedule next ([`TimerEngine::pending`]) and the host calls
//! [`TimerEngine::fire`] when that task elapses.
//!
//! ## State Transitions
//!
//! ```text
//! IdleSession <-> RunningSession --(0s)--> IdleBreak --(1s)--> RunningBreak
//!      ^                                                           |
//!      +------------------(1s)---------- IdleSession <---(0s)------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TimerSettings::default(), Box::new(store));
//! engine.start();
//! // Whenever engine.pending() elapses:
//! let events = engine.fire(task.id());
//! ```

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::goal::{clamp_u32, GoalTracker};
use super::phase::{Phase, TimerState};
use crate::display::{format_time, DisplayState};
use crate::events::Event;
use crate::storage::{load_count, save_count, KvStore};

/// Logical tick length. Not corrected against the wall clock.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Remaining seconds at or below which a running timer is "low on time".
pub const LOW_TIME_SECS: u64 = 10;

/// Identity of one scheduled task. A new id is minted every time a task is
/// armed, so a handle that has been cancelled or superseded never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(u64);

/// The single task the engine wants the host to schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledTask {
    /// Recurring one-second tick while a phase is running.
    Tick { id: TaskId },
    /// One-shot restart after a phase completed.
    AutoRestart { id: TaskId, delay: Duration },
}

impl ScheduledTask {
    pub fn id(&self) -> TaskId {
        match self {
            ScheduledTask::Tick { id } | ScheduledTask::AutoRestart { id, .. } => *id,
        }
    }

    /// Delay until the task first fires. Tick tasks repeat with this period.
    pub fn delay(&self) -> Duration {
        match self {
            ScheduledTask::Tick { .. } => TICK_PERIOD,
            ScheduledTask::AutoRestart { delay, .. } => *delay,
        }
    }

    pub fn is_repeating(&self) -> bool {
        matches!(self, ScheduledTask::Tick { .. })
    }
}

/// Construction-time settings for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSettings {
    pub session_minutes: u32,
    pub break_minutes: u32,
    pub goal: u32,
    /// Amount [`TimerEngine::raise_goal`] adds.
    pub goal_step: u32,
    pub auto_restart_delay: Duration,
}

impl TimerSettings {
    /// Clamp durations and goal step to at least one.
    pub fn normalized(mut self) -> Self {
        self.session_minutes = self.session_minutes.max(1);
        self.break_minutes = self.break_minutes.max(1);
        self.goal_step = self.goal_step.max(1);
        self
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            session_minutes: 25,
            break_minutes: 5,
            goal: 4,
            goal_step: 4,
            auto_restart_delay: Duration::from_secs(1),
        }
    }
}

/// Core timer engine.
///
/// Owns the session counter's persistence handle; every operation is
/// synchronous and returns the events it emitted, in order.
pub struct TimerEngine {
    session_minutes: u32,
    break_minutes: u32,
    remaining_secs: u64,
    running: bool,
    phase: Phase,
    goals: GoalTracker,
    goal_step: u32,
    auto_restart_delay: Duration,
    pending: Option<ScheduledTask>,
    next_task_id: u64,
    store: Box<dyn KvStore>,
}

impl fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerEngine")
            .field("state", &self.state())
            .field("remaining_secs", &self.remaining_secs)
            .field("session_minutes", &self.session_minutes)
            .field("break_minutes", &self.break_minutes)
            .field("goals", &self.goals)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl TimerEngine {
    /// Create a new engine in `IdleSession` with a full session loaded.
    ///
    /// The completed session count is hydrated from `store`; an unreadable
    /// store starts the count at zero.
    pub fn new(settings: TimerSettings, store: Box<dyn KvStore>) -> Self {
        let settings = settings.normalized();
        let completed = load_count(store.as_ref());
        info!(
            session_minutes = settings.session_minutes,
            break_minutes = settings.break_minutes,
            goal = settings.goal,
            completed,
            "timer engine ready"
        );
        Self {
            session_minutes: settings.session_minutes,
            break_minutes: settings.break_minutes,
            remaining_secs: minutes_to_secs(settings.session_minutes),
            running: false,
            phase: Phase::Session,
            goals: GoalTracker::new(settings.goal, completed),
            goal_step: settings.goal_step,
            auto_restart_delay: settings.auto_restart_delay,
            pending: None,
            next_task_id: 0,
            store,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        TimerState::from_parts(self.phase, self.running)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn session_minutes(&self) -> u32 {
        self.session_minutes
    }

    pub fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    pub fn goal(&self) -> u32 {
        self.goals.goal()
    }

    pub fn completed(&self) -> u64 {
        self.goals.completed()
    }

    pub fn goal_progress_pct(&self) -> f64 {
        self.goals.progress_pct()
    }

    /// The task the host should currently have scheduled, if any.
    pub fn pending(&self) -> Option<ScheduledTask> {
        self.pending
    }

    /// True during the gap between a phase completing and its auto-restart.
    pub fn restart_pending(&self) -> bool {
        matches!(self.pending, Some(ScheduledTask::AutoRestart { .. }))
    }

    /// Full length of the active phase in seconds.
    pub fn phase_total_secs(&self) -> u64 {
        match self.phase {
            Phase::Session => minutes_to_secs(self.session_minutes),
            Phase::Break => minutes_to_secs(self.break_minutes),
        }
    }

    /// 0.0 .. 1.0 elapsed fraction of the active phase.
    pub fn phase_progress(&self) -> f64 {
        let total = self.phase_total_secs();
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.remaining_secs);
        elapsed as f64 / total as f64
    }

    /// Build the view model a display renders.
    pub fn snapshot(&self) -> DisplayState {
        DisplayState {
            time_text: format_time(self.remaining_secs),
            phase: self.phase,
            phase_label: self.phase.label().to_string(),
            running: self.running,
            controls_enabled: !self.running,
            low_time: self.running && self.remaining_secs <= LOW_TIME_SECS,
            toggle_label: if self.running { "Pause" } else { "Start" }.to_string(),
            phase_progress: self.phase_progress(),
            goal_progress_pct: self.goals.progress_pct(),
            goal_complete: self.goals.is_complete(),
            completed: self.goals.completed(),
            goal: self.goals.goal(),
            session_minutes: self.session_minutes,
            break_minutes: self.break_minutes,
            remaining_secs: self.remaining_secs,
            restart_pending: self.restart_pending(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Vec<Event> {
        if self.running {
            return Vec::new();
        }
        if self.restart_pending() {
            debug!("manual start supersedes pending auto-restart");
        }
        self.running = true;
        let id = self.mint_task_id();
        self.pending = Some(ScheduledTask::Tick { id });
        info!(phase = self.phase.name(), remaining_secs = self.remaining_secs, "phase started");
        vec![Event::PhaseStarted {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }]
    }

    pub fn pause(&mut self) -> Vec<Event> {
        if !self.running && !self.restart_pending() {
            return Vec::new();
        }
        self.running = false;
        self.pending = None;
        info!(phase = self.phase.name(), remaining_secs = self.remaining_secs, "timer paused");
        vec![Event::Paused {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }]
    }

    /// Pause when running or about to auto-restart, start otherwise.
    pub fn toggle(&mut self) -> Vec<Event> {
        if self.running || self.restart_pending() {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Consume one second. Runs phase completion when the countdown hits zero.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.running {
            return Vec::new();
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return self.complete_phase();
        }
        Vec::new()
    }

    /// Host callback for an elapsed task. Stale ids are ignored.
    pub fn fire(&mut self, id: TaskId) -> Vec<Event> {
        let pending = self.pending;
        match pending {
            Some(ScheduledTask::Tick { id: current }) if current == id => self.tick(),
            Some(ScheduledTask::AutoRestart { id: current, .. }) if current == id => {
                self.pending = None;
                self.start()
            }
            _ => {
                debug!(?id, "ignoring stale scheduled task");
                Vec::new()
            }
        }
    }

    /// Shift the session or break length by `delta` minutes, flooring at one.
    /// Ignored while running.
    pub fn adjust_duration(&mut self, kind: Phase, delta: i32) -> Vec<Event> {
        if self.running {
            debug!(kind = kind.name(), delta, "ignoring duration edit while running");
            return Vec::new();
        }
        let slot = match kind {
            Phase::Session => &mut self.session_minutes,
            Phase::Break => &mut self.break_minutes,
        };
        *slot = clamp_u32(i64::from(*slot) + i64::from(delta), 1);
        let minutes = *slot;
        if kind == self.phase {
            self.remaining_secs = minutes_to_secs(minutes);
        }
        vec![Event::DurationAdjusted {
            kind,
            minutes,
            at: Utc::now(),
        }]
    }

    /// Shift the goal by `delta`, flooring at zero. Ignored while running.
    pub fn adjust_goal(&mut self, delta: i32) -> Vec<Event> {
        self.shift_goal(i64::from(delta))
    }

    /// Accept a new goal after the current one was reached.
    pub fn raise_goal(&mut self) -> Vec<Event> {
        self.shift_goal(i64::from(self.goal_step))
    }

    /// Back to a full, idle session. The completed count is left alone.
    pub fn reset(&mut self) -> Vec<Event> {
        self.pending = None;
        self.running = false;
        self.phase = Phase::Session;
        self.remaining_secs = minutes_to_secs(self.session_minutes);
        info!("timer reset to session mode");
        let at = Utc::now();
        vec![
            Event::Reset { at },
            Event::CounterRefreshed {
                completed: self.goals.completed(),
                at,
            },
        ]
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn shift_goal(&mut self, delta: i64) -> Vec<Event> {
        if self.running {
            debug!(delta, "ignoring goal edit while running");
            return Vec::new();
        }
        let reached = self.goals.adjust(delta);
        let at = Utc::now();
        let mut events = vec![Event::GoalAdjusted {
            goal: self.goals.goal(),
            progress_pct: self.goals.progress_pct(),
            at,
        }];
        if let Some(goal) = reached {
            info!(goal, "session goal reached");
            events.push(Event::GoalReached { goal, at });
        }
        events
    }

    fn complete_phase(&mut self) -> Vec<Event> {
        self.pending = None;
        self.running = false;
        let at = Utc::now();
        let mut events = Vec::new();

        match self.phase {
            Phase::Session => {
                let reached = self.goals.record_completion();
                let completed = self.goals.completed();
                if let Err(e) = save_count(self.store.as_ref(), completed) {
                    warn!(error = %e, completed, "failed to persist session count");
                }
                info!(completed, "session complete");
                events.push(Event::SessionComplete { completed, at });
                if let Some(goal) = reached {
                    info!(goal, "session goal reached");
                    events.push(Event::GoalReached { goal, at });
                }
            }
            Phase::Break => {
                info!("break over");
                events.push(Event::BreakOver { at });
            }
        }
        self.phase = self.phase.other();
        self.remaining_secs = self.phase_total_secs();

        let id = self.mint_task_id();
        self.pending = Some(ScheduledTask::AutoRestart {
            id,
            delay: self.auto_restart_delay,
        });
        events
    }

    fn mint_task_id(&mut self) -> TaskId {
        self.next_task_id += 1;
        TaskId(self.next_task_id)
    }
}

fn minutes_to_secs(minutes: u32) -> u64 {
    u64::from(minutes) * 60
}
