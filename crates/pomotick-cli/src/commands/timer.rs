use std::io::IsTerminal;

use clap::Args;
use pomotick_core::runtime::{self, Input};
use pomotick_core::{Config, Database, Intent, TimerEngine, TimerSettings, Widget};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::terminal::{self, RawTerminal, TerminalDisplay, TerminalNotifier};

#[derive(Args)]
pub struct RunArgs {
    /// Session length in minutes (overrides config)
    #[arg(long)]
    session: Option<u32>,
    /// Break length in minutes (overrides config)
    #[arg(long = "break")]
    break_minutes: Option<u32>,
    /// Session goal (overrides config)
    #[arg(long)]
    goal: Option<u32>,
}

impl RunArgs {
    fn apply(&self, mut settings: TimerSettings) -> TimerSettings {
        if let Some(session) = self.session {
            settings.session_minutes = session;
        }
        if let Some(break_minutes) = self.break_minutes {
            settings.break_minutes = break_minutes;
        }
        if let Some(goal) = self.goal {
            settings.goal = goal;
        }
        settings.normalized()
    }
}

fn build_engine(settings: TimerSettings) -> Result<TimerEngine, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    Ok(TimerEngine::new(settings, Box::new(db)))
}

/// Read line commands from piped stdin until `q` or EOF. Dropping the sender
/// stops the widget runtime.
async fn read_commands(tx: mpsc::Sender<Input>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "stdin closed");
                break;
            }
        };
        match line.trim() {
            "q" | "quit" => break,
            "h" | "?" | "help" => println!("\n{}", Intent::HELP),
            raw => match raw.parse::<Intent>() {
                Ok(intent) => {
                    if tx.send(intent.into()).await.is_err() {
                        break;
                    }
                }
                Err(e) => eprintln!("\n{e} (type 'h' for help)"),
            },
        }
    }
}

/// Run the widget. A terminal on stdin gets single-key controls in raw mode;
/// piped stdin is read as one command per line.
pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let engine = build_engine(args.apply(config.settings()))?;
    let widget = Widget::new(engine, Box::new(TerminalDisplay::stdout()))
        .with_notifier(Box::new(TerminalNotifier::new(&config.notifications)));

    let interactive = std::io::stdin().is_terminal();
    if interactive {
        terminal::print_block(&mut std::io::stdout(), terminal::KEY_HELP)?;
    } else {
        println!("{}\n", Intent::HELP);
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let widget = {
        let _raw = interactive.then(RawTerminal::enable).transpose()?;
        rt.block_on(async {
            let (tx, rx) = mpsc::channel(16);
            if interactive {
                tokio::task::spawn_blocking(move || {
                    if let Err(e) = terminal::read_keys(tx) {
                        tracing::warn!(error = %e, "terminal input failed");
                    }
                });
            } else {
                tokio::spawn(read_commands(tx));
            }
            runtime::run(widget, rx).await
        })
    };

    let state = widget.snapshot();
    println!(
        "\nCompleted sessions: {} (goal {}, {:.0}%)",
        state.completed, state.goal, state.goal_progress_pct
    );
    Ok(())
}

pub fn status() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let engine = build_engine(config.settings())?;
    println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
    Ok(())
}
