mod engine;
mod goal;
mod phase;

pub use engine::{ScheduledTask, TaskId, TimerEngine, TimerSettings, LOW_TIME_SECS, TICK_PERIOD};
pub use goal::GoalTracker;
pub use phase::{Phase, TimerState};
