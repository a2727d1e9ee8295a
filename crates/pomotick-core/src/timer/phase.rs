use serde::{Deserialize, Serialize};

/// Which interval the timer is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Session,
    Break,
}

impl Phase {
    /// Short name used in notifications ("Session started!").
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Session => "Session",
            Phase::Break => "Break",
        }
    }

    /// Label shown above the countdown.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Session => "Session Time",
            Phase::Break => "Break Time",
        }
    }

    /// The phase that follows this one.
    pub fn other(&self) -> Phase {
        match self {
            Phase::Session => Phase::Break,
            Phase::Break => Phase::Session,
        }
    }
}

/// The four observable states of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    IdleSession,
    RunningSession,
    IdleBreak,
    RunningBreak,
}

impl TimerState {
    pub fn from_parts(phase: Phase, running: bool) -> Self {
        match (phase, running) {
            (Phase::Session, false) => TimerState::IdleSession,
            (Phase::Session, true) => TimerState::RunningSession,
            (Phase::Break, false) => TimerState::IdleBreak,
            (Phase::Break, true) => TimerState::RunningBreak,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_from_parts() {
        assert_eq!(TimerState::from_parts(Phase::Session, false), TimerState::IdleSession);
        assert_eq!(TimerState::from_parts(Phase::Session, true), TimerState::RunningSession);
        assert_eq!(TimerState::from_parts(Phase::Break, false), TimerState::IdleBreak);
        assert_eq!(TimerState::from_parts(Phase::Break, true), TimerState::RunningBreak);
    }

    #[test]
    fn labels() {
        assert_eq!(Phase::Session.label(), "Session Time");
        assert_eq!(Phase::Break.label(), "Break Time");
        assert_eq!(Phase::Break.other(), Phase::Session);
    }
}
