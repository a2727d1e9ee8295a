//! User intents.
//!
//! Every control on the widget maps to exactly one [`Intent`]. Hosts parse
//! their own input (keys, buttons, lines) into intents; the core never
//! registers listeners itself.

use std::str::FromStr;

use crate::error::ParseIntentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Start when idle, pause when running.
    Toggle,
    Start,
    Pause,
    Reset,
    AdjustSession(i32),
    AdjustBreak(i32),
    AdjustGoal(i32),
    /// Accept a bigger goal after the current one was reached.
    RaiseGoal,
}

impl Intent {
    /// Terminal command vocabulary, for help output.
    pub const HELP: &'static str = "\
<enter>/t  start or pause
r          reset to session mode
s+ / s-    session length +/- 1 min
b+ / b-    break length +/- 1 min
g+ / g-    session goal +/- 1
G          raise goal after reaching it
q          quit";
}

impl FromStr for Intent {
    type Err = ParseIntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let intent = match s.trim() {
            "" | "t" | "space" => Intent::Toggle,
            "start" => Intent::Start,
            "pause" => Intent::Pause,
            "r" | "reset" => Intent::Reset,
            "s+" => Intent::AdjustSession(1),
            "s-" => Intent::AdjustSession(-1),
            "b+" => Intent::AdjustBreak(1),
            "b-" => Intent::AdjustBreak(-1),
            "g+" => Intent::AdjustGoal(1),
            "g-" => Intent::AdjustGoal(-1),
            "G" => Intent::RaiseGoal,
            other => return Err(ParseIntentError(other.to_string())),
        };
        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_toggle_aliases() {
        for raw in ["", " ", "t", "space", "\n"] {
            assert_eq!(raw.parse::<Intent>().unwrap(), Intent::Toggle, "{raw:?}");
        }
    }

    #[test]
    fn parses_adjustments() {
        assert_eq!("s+".parse::<Intent>().unwrap(), Intent::AdjustSession(1));
        assert_eq!("b-".parse::<Intent>().unwrap(), Intent::AdjustBreak(-1));
        assert_eq!("g-".parse::<Intent>().unwrap(), Intent::AdjustGoal(-1));
        assert_eq!("G".parse::<Intent>().unwrap(), Intent::RaiseGoal);
        assert_eq!("r".parse::<Intent>().unwrap(), Intent::Reset);
    }

    #[test]
    fn rejects_unknown_commands() {
        assert_eq!(
            "x".parse::<Intent>(),
            Err(ParseIntentError("x".to_string()))
        );
    }
}
