use std::str::FromStr;

/// A line of input from the control surface
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play,
    Pause,
    Toggle,
    Restart,
    Speed(u32),
    Status,
    Bounds,
    Save,
    Help,
    Quit,
}

pub const HELP: &str = "commands: play | pause | toggle (space) | restart | speed <1|2|4> | status | bounds | save | help | quit";

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // A bare space is the play/pause key
        if s == " " {
            return Ok(Command::Toggle);
        }

        let mut parts = s.split_whitespace();
        let Some(word) = parts.next() else {
            return Err("empty command".to_string());
        };

        let command = match word.to_lowercase().as_str() {
            "play" | "p" => Command::Play,
            "pause" => Command::Pause,
            "toggle" | "t" => Command::Toggle,
            "restart" | "r" => Command::Restart,
            "speed" | "s" => {
                let value = parts.next().ok_or("speed needs a value")?;
                let value = value.trim_end_matches(['x', 'X']);
                Command::Speed(value.parse().map_err(|_| format!("invalid speed: {}", value))?)
            }
            "status" => Command::Status,
            "bounds" | "fit" => Command::Bounds,
            "save" => Command::Save,
            "help" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(format!("unknown command: {}", other)),
        };

        Ok(command)
    }
}
