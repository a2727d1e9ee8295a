//! Terminal adapters for the widget's display and notifier seams, plus the
//! raw-mode key reader that feeds it intents.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::MoveToColumn;
use crossterm::event::{
    self, DisableFocusChange, EnableFocusChange, Event as TermEvent, KeyCode, KeyEvent,
    KeyEventKind, KeyModifiers,
};
use crossterm::style::{Print, Stylize};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};
use crossterm::{execute, queue};
use pomotick_core::runtime::Input;
use pomotick_core::storage::NotificationsConfig;
use pomotick_core::{DisplaySink, DisplayState, Event, Intent, Notifier, NotifyError};
use tokio::sync::mpsc;

use crate::chime::Tone;

const BAR_WIDTH: usize = 20;
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Single-key bindings used while the terminal is in raw mode.
pub const KEY_HELP: &str = "\
space/t  start or pause
r        reset to session mode
s / S    session length +/- 1 min
b / B    break length +/- 1 min
+ / -    session goal +/- 1
G        raise goal after reaching it
h / ?    this help
q / esc  quit";

/// Redraws a single status line in place.
pub struct TerminalDisplay<W: Write> {
    out: W,
}

impl TerminalDisplay<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalDisplay<W> {
    #[cfg(test)]
    fn new(out: W) -> Self {
        Self { out }
    }
}

fn bar(fraction: f64) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// One status line for `state`, without cursor control.
pub fn status_line(state: &DisplayState) -> String {
    let time = state.time_text.as_str().bold();
    let time = if state.low_time { time.red() } else { time };
    let controls = if state.controls_enabled {
        format!("session {}m  break {}m", state.session_minutes, state.break_minutes)
    } else {
        "edits locked".to_string()
    };
    format!(
        "[{}] {} [{}] {} | {} | goal {}/{} ({:.0}%){}",
        state.phase_label,
        time,
        bar(state.phase_progress),
        state.toggle_label,
        controls,
        state.completed,
        state.goal,
        state.goal_progress_pct,
        if state.goal_complete { " done" } else { "" },
    )
}

impl<W: Write> DisplaySink for TerminalDisplay<W> {
    fn render(&mut self, state: &DisplayState) -> pomotick_core::error::Result<()> {
        queue!(
            self.out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(status_line(state))
        )?;
        self.out.flush()?;
        Ok(())
    }
}

/// Write `text` line by line with explicit carriage returns, so it lays out
/// the same with or without raw mode.
pub fn print_block(out: &mut impl Write, text: &str) -> io::Result<()> {
    queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    for line in text.lines() {
        queue!(out, Print(line), Print("\r\n"))?;
    }
    out.flush()
}

/// Prints a highlighted line per notification and plays the chime when a
/// phase ends.
pub struct TerminalNotifier {
    enabled: bool,
    sound: bool,
}

impl TerminalNotifier {
    pub fn new(config: &NotificationsConfig) -> Self {
        Self {
            enabled: config.enabled,
            sound: config.sound,
        }
    }

    fn pulse(&self, out: &mut impl Write, event: &Event) -> io::Result<()> {
        if let Some(message) = event.message() {
            queue!(
                out,
                MoveToColumn(0),
                Clear(ClearType::CurrentLine),
                Print(format!("Pomodoro: {message}").bold()),
                Print("\r\n")
            )?;
        }
        if let Event::GoalReached { goal, .. } = event {
            queue!(
                out,
                Print(format!(
                    "Congratulations! You've completed {goal} sessions. Pause and press 'G' to set a new goal."
                )),
                Print("\r\n")
            )?;
        }
        out.flush()
    }

    /// Play the tone, ringing the terminal bell when no audio output is
    /// available.
    fn chime(&self, out: &mut impl Write) -> Result<(), NotifyError> {
        let played = play_tone(Tone::NOTIFICATION);
        if played.is_err() {
            out.write_all(b"\x07")?;
            out.flush()?;
        }
        played
    }
}

#[cfg(feature = "audio")]
fn play_tone(tone: Tone) -> Result<(), NotifyError> {
    crate::chime::play(tone)
}

#[cfg(not(feature = "audio"))]
fn play_tone(_tone: Tone) -> Result<(), NotifyError> {
    Err(NotifyError::AudioUnavailable(
        "built without the audio feature".into(),
    ))
}

impl Notifier for TerminalNotifier {
    fn notify(&mut self, event: &Event) -> Result<(), NotifyError> {
        if !self.enabled {
            return Ok(());
        }
        let mut out = io::stdout().lock();
        self.pulse(&mut out, event)?;
        if self.sound && event.is_chime() {
            self.chime(&mut out)?;
        }
        Ok(())
    }
}

/// What a terminal event asks the key reader to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Send(Input),
    Help,
    Quit,
}

/// Map one terminal event to an action. Unbound keys map to `None`.
pub fn key_action(event: &TermEvent) -> Option<KeyAction> {
    let key = match event {
        TermEvent::Key(key) => key,
        TermEvent::FocusLost => return Some(KeyAction::Send(Input::Visibility { hidden: true })),
        TermEvent::FocusGained => {
            return Some(KeyAction::Send(Input::Visibility { hidden: false }))
        }
        _ => return None,
    };
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(KeyAction::Quit);
    }
    key_intent(key)
        .map(|intent| KeyAction::Send(intent.into()))
        .or(match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(KeyAction::Quit),
            KeyCode::Char('h') | KeyCode::Char('?') => Some(KeyAction::Help),
            _ => None,
        })
}

fn key_intent(key: &KeyEvent) -> Option<Intent> {
    let intent = match key.code {
        KeyCode::Char(' ') | KeyCode::Char('t') | KeyCode::Enter => Intent::Toggle,
        KeyCode::Char('r') | KeyCode::Char('R') => Intent::Reset,
        KeyCode::Char('s') => Intent::AdjustSession(1),
        KeyCode::Char('S') => Intent::AdjustSession(-1),
        KeyCode::Char('b') => Intent::AdjustBreak(1),
        KeyCode::Char('B') => Intent::AdjustBreak(-1),
        KeyCode::Char('+') => Intent::AdjustGoal(1),
        KeyCode::Char('-') => Intent::AdjustGoal(-1),
        KeyCode::Char('G') => Intent::RaiseGoal,
        _ => return None,
    };
    Some(intent)
}

/// Raw mode with focus reporting, restored on drop.
pub struct RawTerminal(());

impl RawTerminal {
    pub fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnableFocusChange) {
            disable_raw_mode().ok();
            return Err(e);
        }
        Ok(Self(()))
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        execute!(io::stdout(), DisableFocusChange).ok();
        disable_raw_mode().ok();
    }
}

/// Read key presses until quit or until the runtime stops listening.
///
/// Blocking; run it on a blocking thread. Returning drops `tx`, which stops
/// the widget runtime.
pub fn read_keys(tx: mpsc::Sender<Input>) -> io::Result<()> {
    loop {
        if tx.is_closed() {
            return Ok(());
        }
        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        match key_action(&event::read()?) {
            Some(KeyAction::Send(input)) => {
                if tx.blocking_send(input).is_err() {
                    return Ok(());
                }
            }
            Some(KeyAction::Help) => print_block(&mut io::stdout(), KEY_HELP)?,
            Some(KeyAction::Quit) => return Ok(()),
            None => {}
        }
    }
}
