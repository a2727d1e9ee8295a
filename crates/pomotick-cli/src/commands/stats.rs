use pomotick_core::{Config, Database, TimerEngine};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct GoalStats {
    completed: u64,
    goal: u32,
    goal_progress_pct: f64,
    goal_complete: bool,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let engine = TimerEngine::new(config.settings(), Box::new(db));
    let state = engine.snapshot();

    let stats = GoalStats {
        completed: state.completed,
        goal: state.goal,
        goal_progress_pct: state.goal_progress_pct,
        goal_complete: state.goal_complete,
    };
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
