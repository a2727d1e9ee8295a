//! Feedback collaborators.
//!
//! A [`Notifier`] turns engine events into user-facing feedback: a short
//! visual pulse, and for phase ends an audible chime. Errors are reported to
//! the caller, which logs and drops them.

use crate::error::NotifyError;
use crate::events::Event;

pub trait Notifier {
    fn notify(&mut self, event: &Event) -> Result<(), NotifyError>;
}

/// Notifier that remembers every message it would have shown.
///
/// Used by headless hosts and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    pub messages: Vec<String>,
    pub chimes: usize,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, event: &Event) -> Result<(), NotifyError> {
        if let Some(message) = event.message() {
            self.messages.push(message);
        }
        if event.is_chime() {
            self.chimes += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn recording_notifier_collects_messages_and_chimes() {
        let mut n = RecordingNotifier::default();
        let at = Utc::now();
        n.notify(&Event::SessionComplete { completed: 1, at }).unwrap();
        n.notify(&Event::CounterRefreshed { completed: 1, at }).unwrap();
        n.notify(&Event::Reset { at }).unwrap();
        assert_eq!(
            n.messages,
            vec!["Session complete! Break time!", "Timer reset to session mode"]
        );
        assert_eq!(n.chimes, 1);
    }
}
