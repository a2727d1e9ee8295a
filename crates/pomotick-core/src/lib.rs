//! # Pomotick Core Library
//!
//! This library provides the core logic for the Pomotick Pomodoro widget:
//! alternating session and break countdowns with a persisted count of
//! completed sessions and a session goal. Hosts (the CLI, tests) plug in a
//! display, notifiers and a key-value store; the core stays I/O free apart
//! from those seams.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A tick-driven state machine that owns exactly one
//!   scheduled task at a time and tells the host when it is due
//! - **Widget**: Maps user intents onto the engine and fans events out to
//!   the display and notifiers
//! - **Runtime**: tokio loop that turns scheduled tasks into timers
//! - **Storage**: SQLite key-value store and TOML configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`Widget`]: Engine plus collaborators
//! - [`Database`]: Session counter persistence
//! - [`Config`]: Application configuration management

pub mod display;
pub mod error;
pub mod events;
pub mod intent;
pub mod notify;
pub mod runtime;
pub mod storage;
pub mod timer;
pub mod widget;

pub use display::{format_time, DisplaySink, DisplayState};
pub use error::{ConfigError, CoreError, NotifyError, ParseIntentError, StorageError};
pub use events::Event;
pub use intent::Intent;
pub use notify::{Notifier, RecordingNotifier};
pub use storage::{Config, Database, KvStore, MemoryStore};
pub use timer::{Phase, ScheduledTask, TaskId, TimerEngine, TimerSettings, TimerState};
pub use widget::Widget;
