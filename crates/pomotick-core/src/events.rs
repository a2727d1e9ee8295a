use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every state change of the engine produces an Event.
/// Notifiers consume them; the widget logs them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    PhaseStarted {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Paused {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionComplete {
        completed: u64,
        at: DateTime<Utc>,
    },
    BreakOver {
        at: DateTime<Utc>,
    },
    GoalReached {
        goal: u32,
        at: DateTime<Utc>,
    },
    Reset {
        at: DateTime<Utc>,
    },
    /// Counter display should be redrawn; the count itself is unchanged.
    CounterRefreshed {
        completed: u64,
        at: DateTime<Utc>,
    },
    DurationAdjusted {
        kind: Phase,
        minutes: u32,
        at: DateTime<Utc>,
    },
    GoalAdjusted {
        goal: u32,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Human-readable message for the events a notifier pulses on.
    pub fn message(&self) -> Option<String> {
        match self {
            Event::PhaseStarted { phase, .. } => Some(format!("{} started!", phase.name())),
            Event::Paused { .. } => Some("Timer paused".into()),
            Event::SessionComplete { .. } => Some("Session complete! Break time!".into()),
            Event::BreakOver { .. } => Some("Break over! Ready for next session?".into()),
            Event::GoalReached { goal, .. } => {
                Some(format!("Goal achieved! Completed {goal} sessions!"))
            }
            Event::Reset { .. } => Some("Timer reset to session mode".into()),
            Event::CounterRefreshed { .. }
            | Event::DurationAdjusted { .. }
            | Event::GoalAdjusted { .. } => None,
        }
    }

    /// Whether this event marks the end of a phase and deserves a tone.
    pub fn is_chime(&self) -> bool {
        matches!(self, Event::SessionComplete { .. } | Event::BreakOver { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_feedback_texts() {
        let at = Utc::now();
        let started = Event::PhaseStarted {
            phase: Phase::Break,
            remaining_secs: 300,
            at,
        };
        assert_eq!(started.message().as_deref(), Some("Break started!"));
        let goal = Event::GoalReached { goal: 4, at };
        assert_eq!(
            goal.message().as_deref(),
            Some("Goal achieved! Completed 4 sessions!")
        );
        assert!(Event::CounterRefreshed { completed: 1, at }.message().is_none());
    }

    #[test]
    fn only_phase_ends_chime() {
        let at = Utc::now();
        assert!(Event::SessionComplete { completed: 1, at }.is_chime());
        assert!(Event::BreakOver { at }.is_chime());
        assert!(!Event::Reset { at }.is_chime());
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(Event::BreakOver { at: Utc::now() }).unwrap();
        assert_eq!(json["type"], "break_over");
    }
}
