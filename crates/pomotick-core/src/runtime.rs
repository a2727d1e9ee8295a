//! Async driver for a [`Widget`].
//!
//! Turns the engine's single pending [`ScheduledTask`] into a tokio timer and
//! interleaves it with incoming intents. Everything runs on the calling task,
//! so an intent and a tick are never processed at the same time.

use std::future;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::intent::Intent;
use crate::timer::{ScheduledTask, TaskId};
use crate::widget::Widget;

/// Messages a host feeds into the running widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Intent(Intent),
    Visibility { hidden: bool },
}

impl From<Intent> for Input {
    fn from(intent: Intent) -> Self {
        Input::Intent(intent)
    }
}

/// A task armed on the tokio clock.
#[derive(Debug, Clone, Copy)]
struct Armed {
    task: ScheduledTask,
    deadline: Instant,
}

impl Armed {
    fn id(&self) -> TaskId {
        self.task.id()
    }
}

/// Drive `widget` until the input channel closes, then hand it back.
pub async fn run(mut widget: Widget, mut inputs: mpsc::Receiver<Input>) -> Widget {
    info!("widget runtime started");
    widget.render();

    let mut armed: Option<Armed> = None;
    loop {
        armed = match (widget.pending(), armed) {
            (Some(task), Some(current)) if current.id() == task.id() => Some(current),
            (Some(task), _) => Some(Armed {
                task,
                deadline: Instant::now() + task.delay(),
            }),
            (None, _) => None,
        };

        let wait = async move {
            match armed {
                Some(a) => sleep_until(a.deadline).await,
                None => future::pending::<()>().await,
            }
        };

        tokio::select! {
            input = inputs.recv() => match input {
                Some(Input::Intent(intent)) => {
                    widget.apply(intent);
                }
                Some(Input::Visibility { hidden }) => widget.visibility_changed(hidden),
                None => break,
            },
            () = wait => {
                if let Some(a) = armed {
                    widget.fire(a.id());
                    // Logical ticks: the next one is due one period after the
                    // previous deadline, not after the moment it was handled.
                    armed = a.task.is_repeating().then(|| Armed {
                        deadline: a.deadline + a.task.delay(),
                        ..a
                    });
                }
            }
        }
    }

    debug!(pending = ?widget.pending(), "input closed, dropping scheduled task");
    info!("widget runtime stopped");
    widget
}
