//! Protocol command parser.
//!
//! Turns incoming text lines into structured `Command` values for the
//! main loop to dispatch on.

use log::warn;

/// A parsed controller-to-engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the handshake; the engine answers with its id and options.
    Hello,

    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Set an engine option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Forget the current position.
    NewGame,

    /// Install the position for the coming turn.
    Position { notation: String },

    /// Choose a move for the team to move.
    Go,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (&head, _) = tokens.split_first()?;

    match head {
        "hello" => Some(Command::Hello),
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "newgame" => Some(Command::NewGame),
        "go" => {
            if tokens.len() > 1 {
                warn!("ignoring go arguments: {}", tokens[1..].join(" "));
            }
            Some(Command::Go)
        }

        "setoption" => parse_setoption(&tokens),
        "position" => parse_position(&tokens),

        other => {
            warn!("unknown command: {}", other);
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let value_idx = tokens.iter().position(|&t| t == "value");

    let (name, value) = match value_idx {
        Some(vi) => {
            let name_parts = &tokens[2..vi];
            let value_parts = &tokens[vi + 1..];
            if name_parts.is_empty() {
                warn!("malformed setoption: empty name");
                return None;
            }
            let value = if value_parts.is_empty() {
                None
            } else {
                Some(value_parts.join(" "))
            };
            (name_parts.join(" "), value)
        }
        None => (tokens[2..].join(" "), None),
    };

    Some(Command::SetOption { name, value })
}

/// Parses `position <notation>`.
fn parse_position(tokens: &[&str]) -> Option<Command> {
    match tokens {
        [_, notation] => Some(Command::Position {
            notation: notation.to_string(),
        }),
        _ => {
            warn!("malformed position: expected 'position <notation>'");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_commands() {
        assert_eq!(parse_command("hello"), Some(Command::Hello));
        assert_eq!(parse_command("isready"), Some(Command::IsReady));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
        assert_eq!(parse_command("newgame"), Some(Command::NewGame));
        assert_eq!(parse_command("go"), Some(Command::Go));
    }

    #[test]
    fn parse_go_ignores_arguments() {
        assert_eq!(parse_command("go movetime 500"), Some(Command::Go));
    }

    #[test]
    fn parse_empty_line_returns_none() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
        assert_eq!(parse_command("\t"), None);
    }

    #[test]
    fn parse_unknown_command_returns_none() {
        assert_eq!(parse_command("foobar"), None);
        assert_eq!(parse_command("uci"), None);
    }

    #[test]
    fn parse_setoption_with_value() {
        let cmd = parse_command("setoption name Variety value 0.5").unwrap();
        assert_eq!(
            cmd,
            Command::SetOption {
                name: "Variety".to_string(),
                value: Some("0.5".to_string()),
            }
        );
    }

    #[test]
    fn parse_setoption_no_value() {
        let cmd = parse_command("setoption name InterceptBreakthroughs").unwrap();
        assert_eq!(
            cmd,
            Command::SetOption {
                name: "InterceptBreakthroughs".to_string(),
                value: None,
            }
        );
    }

    #[test]
    fn parse_setoption_malformed_returns_none() {
        assert_eq!(parse_command("setoption"), None);
        assert_eq!(parse_command("setoption foo"), None);
        assert_eq!(parse_command("setoption name value 3"), None);
    }

    #[test]
    fn parse_position_notation() {
        let notation = "12/1:0/0G33,1L54*2";
        let cmd = parse_command(&format!("position {}", notation)).unwrap();
        assert_eq!(
            cmd,
            Command::Position {
                notation: notation.to_string(),
            }
        );
    }

    #[test]
    fn parse_position_malformed_returns_none() {
        assert_eq!(parse_command("position"), None);
        assert_eq!(parse_command("position 0/0:0/- extra"), None);
    }

    #[test]
    fn parse_with_leading_trailing_whitespace() {
        assert_eq!(parse_command("  hello  "), Some(Command::Hello));
        assert_eq!(parse_command("  isready  "), Some(Command::IsReady));
    }
}
