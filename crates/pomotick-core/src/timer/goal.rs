//! Session goal tracking.
//!
//! Tracks completed sessions against a target and decides when the
//! "goal reached" celebration fires. The celebration is edge-triggered:
//! it fires when the count lands exactly on the goal and is remembered per
//! goal value, so later completions or re-setting the same goal do not
//! repeat it.

#[derive(Debug, Clone)]
pub struct GoalTracker {
    goal: u32,
    completed: u64,
    /// Last goal value that has already been celebrated.
    celebrated: Option<u32>,
}

impl GoalTracker {
    /// Create a tracker with a hydrated completion count.
    ///
    /// Hydration is not a mutation, so no celebration is evaluated here.
    pub fn new(goal: u32, completed: u64) -> Self {
        Self {
            goal,
            completed,
            celebrated: None,
        }
    }

    pub fn goal(&self) -> u32 {
        self.goal
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// 0.0 .. 100.0 progress towards the goal. Zero when the goal is zero.
    pub fn progress_pct(&self) -> f64 {
        if self.goal == 0 {
            return 0.0;
        }
        (self.completed as f64 / self.goal as f64).min(1.0) * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.goal > 0 && self.completed >= u64::from(self.goal)
    }

    /// Count one more completed session. Returns `Some(goal)` when this
    /// completion reached the goal.
    pub fn record_completion(&mut self) -> Option<u32> {
        self.completed = self.completed.saturating_add(1);
        self.evaluate()
    }

    /// Shift the goal by `delta`, flooring at zero. Returns `Some(goal)` when
    /// the new goal equals the completed count and has not been celebrated.
    pub fn adjust(&mut self, delta: i64) -> Option<u32> {
        self.goal = clamp_u32(i64::from(self.goal) + delta, 0);
        self.evaluate()
    }

    fn evaluate(&mut self) -> Option<u32> {
        if self.goal == 0 || self.completed != u64::from(self.goal) {
            return None;
        }
        if self.celebrated == Some(self.goal) {
            return None;
        }
        self.celebrated = Some(self.goal);
        Some(self.goal)
    }
}

/// Clamp a signed value into `floor..=u32::MAX`.
pub(crate) fn clamp_u32(value: i64, floor: u32) -> u32 {
    value.clamp(i64::from(floor), i64::from(u32::MAX)) as u32
}
