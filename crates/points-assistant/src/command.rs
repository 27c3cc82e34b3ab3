//! Assistant command parsing.

use chess_core::{Color, Move, MoveParseError, Piece, Square};
use std::time::Duration;
use thiserror::Error;

/// Errors from parsing a command line.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),

    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("'{0}' is not a square")]
    InvalidSquare(String),

    #[error("'{0}' is not a piece letter (use PNBRQK for White, pnbrqk for Black)")]
    InvalidPiece(String),

    #[error("'{0}' is not a side (use white or black)")]
    InvalidSide(String),

    #[error("'{0}' is not a time in milliseconds")]
    InvalidTime(String),

    #[error(transparent)]
    InvalidMove(#[from] MoveParseError),
}

/// Commands accepted by the assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start editing from a FEN record.
    Setup(String),
    /// Place a piece during setup.
    Put {
        piece: Piece,
        color: Color,
        square: Square,
    },
    /// Empty a square during setup.
    Remove(Square),
    /// Start editing from an empty board.
    Clear,
    /// Choose the side that moves first.
    Side(Color),
    /// Validate the setup and begin playing.
    Start,
    /// Begin a game from the standard position.
    New,
    Move(Move),
    /// Ask for a suggestion without playing it.
    Hint(Option<Duration>),
    /// Let the engine play its suggestion.
    Go(Option<Duration>),
    Skip,
    Board,
    Status,
    Fen,
    History,
    Help,
    Quit,
}

impl Command {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(input: &str) -> Result<Option<Self>, CommandError> {
        let input = input.trim();
        let mut parts = input.split_whitespace();

        let Some(cmd) = parts.next() else {
            return Ok(None);
        };

        let command = match cmd.to_ascii_lowercase().as_str() {
            "setup" => Self::parse_setup(parts)?,
            "put" => Self::parse_put(parts)?,
            "remove" => Command::Remove(parse_square(parts.next(), "remove")?),
            "clear" => Command::Clear,
            "side" => Self::parse_side(parts.next())?,
            "start" => Command::Start,
            "new" => Command::New,
            "move" => match parts.next() {
                Some(uci) => Command::Move(Move::from_uci(uci)?),
                None => {
                    return Err(CommandError::MissingArgument {
                        command: "move",
                        expected: "a move like e2e4",
                    })
                }
            },
            "hint" => Command::Hint(parse_time(parts.next())?),
            "go" => Command::Go(parse_time(parts.next())?),
            "skip" => Command::Skip,
            "board" | "d" => Command::Board,
            "status" => Command::Status,
            "fen" => Command::Fen,
            "history" => Command::History,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            // A bare coordinate move such as "e2e4".
            _ => match Move::from_uci(cmd) {
                Ok(m) => Command::Move(m),
                Err(_) => return Err(CommandError::Unknown(input.to_string())),
            },
        };
        Ok(Some(command))
    }

    fn parse_setup<'a>(parts: impl Iterator<Item = &'a str>) -> Result<Self, CommandError> {
        let fen = parts.collect::<Vec<_>>().join(" ");
        if fen.is_empty() {
            return Err(CommandError::MissingArgument {
                command: "setup",
                expected: "a FEN record",
            });
        }
        Ok(Command::Setup(fen))
    }

    fn parse_put<'a>(mut parts: impl Iterator<Item = &'a str>) -> Result<Self, CommandError> {
        let letter = parts.next().ok_or(CommandError::MissingArgument {
            command: "put",
            expected: "a piece letter and a square, like 'put Q d1'",
        })?;
        let mut chars = letter.chars();
        let (piece, color) = match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Piece::from_fen_char(c).ok_or_else(|| CommandError::InvalidPiece(letter.into()))?
            }
            _ => return Err(CommandError::InvalidPiece(letter.into())),
        };
        let square = parse_square(parts.next(), "put")?;
        Ok(Command::Put {
            piece,
            color,
            square,
        })
    }

    fn parse_side(arg: Option<&str>) -> Result<Self, CommandError> {
        let arg = arg.ok_or(CommandError::MissingArgument {
            command: "side",
            expected: "white or black",
        })?;
        match arg.to_ascii_lowercase().as_str() {
            "white" | "w" => Ok(Command::Side(Color::White)),
            "black" | "b" => Ok(Command::Side(Color::Black)),
            _ => Err(CommandError::InvalidSide(arg.to_string())),
        }
    }
}

fn parse_square(arg: Option<&str>, command: &'static str) -> Result<Square, CommandError> {
    let arg = arg.ok_or(CommandError::MissingArgument {
        command,
        expected: "a square like e4",
    })?;
    Square::from_algebraic(&arg.to_ascii_lowercase())
        .ok_or_else(|| CommandError::InvalidSquare(arg.to_string()))
}

fn parse_time(arg: Option<&str>) -> Result<Option<Duration>, CommandError> {
    match arg {
        None => Ok(None),
        Some(ms) => ms
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|_| CommandError::InvalidTime(ms.to_string())),
    }
}

/// Text printed by `help`.
pub const HELP: &str = "\
setup commands:
  setup <fen>          edit a position given as FEN
  put <piece> <square> place a piece (PNBRQK white, pnbrqk black)
  remove <square>      empty a square
  clear                start from an empty board
  side <white|black>   choose who moves first
  start                validate the position and start playing
game commands:
  new                  play from the standard position
  move <uci>           play a move, e.g. 'move e2e4' or just 'e2e4'
  skip                 pass the turn (not allowed in check)
  hint [ms]            suggest a move
  go [ms]              let the engine play its suggestion
  board | status | fen | history
  help | quit";

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Command {
        Command::parse(input).unwrap().unwrap()
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse("start"), Command::Start);
        assert_eq!(parse("  new  "), Command::New);
        assert_eq!(parse("SKIP"), Command::Skip);
        assert_eq!(parse("quit"), Command::Quit);
        assert_eq!(parse("d"), Command::Board);
    }

    #[test]
    fn test_blank_line_is_none() {
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_setup_joins_fen() {
        let fen = "4k3/8/8/8/8/8/8/4K3 w - - 0 1";
        assert_eq!(parse(&format!("setup {fen}")), Command::Setup(fen.to_string()));
        assert!(matches!(
            Command::parse("setup"),
            Err(CommandError::MissingArgument { command: "setup", .. })
        ));
    }

    #[test]
    fn test_parse_put() {
        assert_eq!(
            parse("put Q d1"),
            Command::Put {
                piece: Piece::Queen,
                color: Color::White,
                square: Square::D1,
            }
        );
        assert_eq!(
            parse("put n G8"),
            Command::Put {
                piece: Piece::Knight,
                color: Color::Black,
                square: Square::G8,
            }
        );
        assert_eq!(
            Command::parse("put x d1"),
            Err(CommandError::InvalidPiece("x".into()))
        );
        assert_eq!(
            Command::parse("put Q z9"),
            Err(CommandError::InvalidSquare("z9".into()))
        );
    }

    #[test]
    fn test_parse_side() {
        assert_eq!(parse("side black"), Command::Side(Color::Black));
        assert_eq!(parse("side W"), Command::Side(Color::White));
        assert_eq!(
            Command::parse("side red"),
            Err(CommandError::InvalidSide("red".into()))
        );
    }

    #[test]
    fn test_parse_moves() {
        let e2e4 = Move::new(
            Square::from_algebraic("e2").unwrap(),
            Square::from_algebraic("e4").unwrap(),
        );
        assert_eq!(parse("move e2e4"), Command::Move(e2e4));
        assert_eq!(parse("e2e4"), Command::Move(e2e4));
        assert!(matches!(
            Command::parse("move e2e9"),
            Err(CommandError::InvalidMove(MoveParseError::Square(_)))
        ));
    }

    #[test]
    fn test_parse_time_arguments() {
        assert_eq!(parse("hint"), Command::Hint(None));
        assert_eq!(parse("go 250"), Command::Go(Some(Duration::from_millis(250))));
        assert_eq!(
            Command::parse("hint soon"),
            Err(CommandError::InvalidTime("soon".into()))
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            Command::parse("castle now"),
            Err(CommandError::Unknown("castle now".into()))
        );
    }
}
