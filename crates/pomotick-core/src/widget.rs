//! Widget shell.
//!
//! Binds one [`TimerEngine`] to its collaborators: intents go in, events fan
//! out to every notifier, and the display is redrawn after each step.
//! Collaborator failures are logged here and never reach the engine.

use tracing::{debug, info, warn};

use crate::display::{DisplaySink, DisplayState};
use crate::events::Event;
use crate::intent::Intent;
use crate::notify::Notifier;
use crate::timer::{Phase, ScheduledTask, TaskId, TimerEngine};

pub struct Widget {
    engine: TimerEngine,
    display: Box<dyn DisplaySink>,
    notifiers: Vec<Box<dyn Notifier>>,
}

impl Widget {
    pub fn new(engine: TimerEngine, display: Box<dyn DisplaySink>) -> Self {
        Self {
            engine,
            display,
            notifiers: Vec::new(),
        }
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn pending(&self) -> Option<ScheduledTask> {
        self.engine.pending()
    }

    pub fn snapshot(&self) -> DisplayState {
        self.engine.snapshot()
    }

    /// Draw the current state once, e.g. right after construction.
    pub fn render(&mut self) {
        let state = self.engine.snapshot();
        if let Err(e) = self.display.render(&state) {
            warn!(error = %e, "display render failed");
        }
    }

    /// Apply one user intent and publish the result.
    pub fn apply(&mut self, intent: Intent) -> Vec<Event> {
        debug!(?intent, "intent");
        let events = match intent {
            Intent::Toggle => self.engine.toggle(),
            Intent::Start => self.engine.start(),
            Intent::Pause => self.engine.pause(),
            Intent::Reset => self.engine.reset(),
            Intent::AdjustSession(delta) => self.engine.adjust_duration(Phase::Session, delta),
            Intent::AdjustBreak(delta) => self.engine.adjust_duration(Phase::Break, delta),
            Intent::AdjustGoal(delta) => self.engine.adjust_goal(delta),
            Intent::RaiseGoal => self.engine.raise_goal(),
        };
        self.publish(&events);
        events
    }

    /// A scheduled task elapsed.
    pub fn fire(&mut self, id: TaskId) -> Vec<Event> {
        let events = self.engine.fire(id);
        self.publish(&events);
        events
    }

    /// Host visibility changed (window hidden, terminal backgrounded).
    pub fn visibility_changed(&self, hidden: bool) {
        if hidden {
            info!("pomodoro timer running in background");
        } else {
            info!("pomodoro timer back in focus");
        }
    }

    fn publish(&mut self, events: &[Event]) {
        for event in events {
            for notifier in &mut self.notifiers {
                if let Err(e) = notifier.notify(event) {
                    warn!(error = %e, "notifier failed");
                }
            }
        }
        self.render();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NotifyError, Result};
    use crate::notify::RecordingNotifier;
    use crate::storage::MemoryStore;
    use crate::timer::{TimerSettings, TimerState};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Frames(Arc<Mutex<Vec<DisplayState>>>);

    impl DisplaySink for Frames {
        fn render(&mut self, state: &DisplayState) -> Result<()> {
            self.0.lock().unwrap().push(state.clone());
            Ok(())
        }
    }

    struct Mute;

    impl Notifier for Mute {
        fn notify(&mut self, _event: &Event) -> std::result::Result<(), NotifyError> {
            Err(NotifyError::AudioUnavailable("no device".into()))
        }
    }

    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<RecordingNotifier>>);

    impl Notifier for Shared {
        fn notify(&mut self, event: &Event) -> std::result::Result<(), NotifyError> {
            self.0.lock().unwrap().notify(event)
        }
    }

    fn widget(frames: &Frames) -> Widget {
        let engine = TimerEngine::new(TimerSettings::default(), Box::new(MemoryStore::new()));
        Widget::new(engine, Box::new(frames.clone()))
    }

    #[test]
    fn every_intent_renders_a_frame() {
        let frames = Frames::default();
        let mut w = widget(&frames);
        w.apply(Intent::AdjustSession(1));
        w.apply(Intent::Toggle);
        let rendered = frames.0.lock().unwrap();
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].time_text, "26:00");
        assert!(rendered[1].running);
    }

    #[test]
    fn ignored_edit_still_renders() {
        let frames = Frames::default();
        let mut w = widget(&frames);
        w.apply(Intent::Start);
        assert!(w.apply(Intent::AdjustGoal(1)).is_empty());
        assert_eq!(frames.0.lock().unwrap().len(), 2);
    }

    #[test]
    fn failing_notifier_does_not_affect_engine() {
        let frames = Frames::default();
        let recorder = Shared::default();
        let mut w = widget(&frames)
            .with_notifier(Box::new(Mute))
            .with_notifier(Box::new(recorder.clone()));
        w.apply(Intent::Toggle);
        assert_eq!(w.engine().state(), TimerState::RunningSession);
        assert_eq!(recorder.0.lock().unwrap().messages, vec!["Session started!"]);
    }

    #[test]
    fn ticks_render_through_fire() {
        let frames = Frames::default();
        let mut w = widget(&frames);
        w.apply(Intent::Start);
        let id = w.pending().unwrap().id();
        w.fire(id);
        assert_eq!(frames.0.lock().unwrap().last().unwrap().time_text, "24:59");
    }
}
