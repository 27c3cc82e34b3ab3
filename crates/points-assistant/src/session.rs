//! The assistant's read-eval-print loop.

use crate::board;
use crate::command::{Command, CommandError, HELP};
use chess_core::Color;
use points_engine::{
    EngineConfig, Game, GameError, Score, SearchEngine, SearchResult, Setup, Turn, MATE, SCALE,
};
use std::io::{self, BufRead, Write};
use std::time::Duration;
use thiserror::Error;

/// Errors reported back to the user. Only [`SessionError::Io`] ends the loop.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error("no game in progress, use 'start' or 'new'")]
    NoGame,

    #[error("not editing a position, use 'setup', 'clear' or 'put'")]
    NotInSetup,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// What the board is being used for.
#[derive(Debug)]
enum Phase {
    Setup(Setup),
    Playing(Game),
}

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One interactive session writing its replies to `out`.
pub struct Session<W: Write> {
    config: EngineConfig,
    engine: SearchEngine,
    phase: Phase,
    out: W,
}

impl<W: Write> Session<W> {
    /// Starts with a standard game.
    pub fn new(config: EngineConfig, out: W) -> Self {
        Session {
            engine: SearchEngine::new(&config),
            phase: Phase::Playing(Game::new(&config)),
            config,
            out,
        }
    }

    /// Starts with a game from `fen`.
    pub fn from_fen(config: EngineConfig, fen: &str, out: W) -> Result<Self, GameError> {
        let game = Game::from_fen(fen, &config)?;
        Ok(Session {
            engine: SearchEngine::new(&config),
            phase: Phase::Playing(game),
            config,
            out,
        })
    }

    pub fn game(&self) -> Option<&Game> {
        match &self.phase {
            Phase::Playing(game) => Some(game),
            Phase::Setup(_) => None,
        }
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    /// Reads commands until `quit` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        writeln!(self.out, "Points Chess assistant. Type 'help' for commands.")?;
        self.print_board()?;
        for line in input.lines() {
            let line = line?;
            match self.execute(&line) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(SessionError::Io(e)) => return Err(e),
                Err(e) => {
                    tracing::debug!(input = %line.trim(), error = %e, "command rejected");
                    writeln!(self.out, "error: {e}")?;
                }
            }
            self.out.flush()?;
        }
        Ok(())
    }

    /// Parses and runs a single line.
    pub fn execute(&mut self, line: &str) -> Result<Flow, SessionError> {
        match Command::parse(line)? {
            Some(command) => self.handle(command),
            None => Ok(Flow::Continue),
        }
    }

    pub fn handle(&mut self, command: Command) -> Result<Flow, SessionError> {
        match command {
            Command::Setup(fen) => {
                self.phase = Phase::Setup(Setup::from_fen(&fen)?);
                self.print_board()?;
            }
            Command::Put {
                piece,
                color,
                square,
            } => {
                self.setup_mut()?.put(square, piece, color);
                self.print_board()?;
            }
            Command::Remove(square) => {
                self.setup_mut()?.remove(square);
                self.print_board()?;
            }
            Command::Clear => {
                self.setup_mut()?.clear();
                writeln!(self.out, "board cleared")?;
            }
            Command::Side(color) => {
                self.setup_mut()?.side_to_move(color);
                writeln!(self.out, "{color} moves first")?;
            }
            Command::Start => {
                let Phase::Setup(setup) = &self.phase else {
                    return Err(SessionError::NotInSetup);
                };
                let game = Game::from_setup(setup, &self.config)?;
                tracing::info!(fen = %game.position().to_fen(), "game started from setup");
                self.phase = Phase::Playing(game);
                self.print_status()?;
            }
            Command::New => {
                self.phase = Phase::Playing(Game::new(&self.config));
                self.print_board()?;
            }
            Command::Move(m) => {
                let turn = *self.game_mut()?.make_move(m)?;
                self.report_turn(&turn)?;
            }
            Command::Skip => {
                let turn = *self.game_mut()?.skip_turn()?;
                self.report_turn(&turn)?;
            }
            Command::Hint(time) => {
                match self.search(time)? {
                    Some(result) => writeln!(self.out, "hint: {}", describe(&result))?,
                    None => writeln!(self.out, "no legal move, skip the turn")?,
                }
            }
            Command::Go(time) => match self.search(time)? {
                Some(result) => {
                    writeln!(self.out, "engine plays {}", describe(&result))?;
                    let turn = *self.game_mut()?.make_move(result.best_move)?;
                    self.report_turn(&turn)?;
                }
                None => {
                    writeln!(self.out, "no legal move, skipping")?;
                    let turn = *self.game_mut()?.skip_turn()?;
                    self.report_turn(&turn)?;
                }
            },
            Command::Board => self.print_board()?,
            Command::Status => self.print_status()?,
            Command::Fen => {
                let fen = match &self.phase {
                    Phase::Setup(setup) => setup.to_fen(),
                    Phase::Playing(game) => game.position().to_fen(),
                };
                writeln!(self.out, "{fen}")?;
            }
            Command::History => {
                let Phase::Playing(game) = &self.phase else {
                    return Err(SessionError::NoGame);
                };
                if game.history().is_empty() {
                    writeln!(self.out, "no turns played yet")?;
                }
                for (i, turn) in game.history().iter().enumerate() {
                    writeln!(self.out, "{:>3}. {turn}", i + 1)?;
                }
            }
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn search(&mut self, time: Option<Duration>) -> Result<Option<SearchResult>, SessionError> {
        let Phase::Playing(game) = &self.phase else {
            return Err(SessionError::NoGame);
        };
        if game.is_over() {
            return Err(GameError::GameOver.into());
        }
        let time = time.unwrap_or_else(|| self.config.time_limit());
        Ok(self.engine.find_best_move(game, time))
    }

    /// Editing while a game is running starts a setup from its position.
    fn setup_mut(&mut self) -> Result<&mut Setup, SessionError> {
        if let Phase::Playing(game) = &self.phase {
            self.phase = Phase::Setup(Setup::from_fen(&game.position().to_fen())?);
        }
        match &mut self.phase {
            Phase::Setup(setup) => Ok(setup),
            Phase::Playing(_) => Err(SessionError::NotInSetup),
        }
    }

    fn game_mut(&mut self) -> Result<&mut Game, SessionError> {
        match &mut self.phase {
            Phase::Playing(game) => Ok(game),
            Phase::Setup(_) => Err(SessionError::NoGame),
        }
    }

    fn report_turn(&mut self, turn: &Turn) -> io::Result<()> {
        writeln!(self.out, "{turn}")?;
        if let Phase::Playing(game) = &self.phase {
            if let Some(winner) = game.winner() {
                let white = game.state().points_captured(Color::White);
                let black = game.state().points_captured(Color::Black);
                writeln!(self.out, "game over: {winner} (points {white}-{black})")?;
            } else if game.state().extra_move_granted() {
                writeln!(self.out, "{} moves again", game.side_to_move())?;
            }
        }
        Ok(())
    }

    fn print_board(&mut self) -> io::Result<()> {
        let diagram = match &self.phase {
            Phase::Setup(setup) => board::render(|sq| setup.piece_at(sq)),
            Phase::Playing(game) => board::render(|sq| game.position().piece_at(sq)),
        };
        writeln!(self.out, "{diagram}")
    }

    fn print_status(&mut self) -> io::Result<()> {
        self.print_board()?;
        let Phase::Playing(game) = &self.phase else {
            return writeln!(self.out, "editing a position");
        };
        let state = game.state();
        for color in Color::ALL {
            writeln!(
                self.out,
                "{color}: {} points, {} of {} moves left",
                state.points_captured(color),
                state.moves_remaining(color),
                state.max_moves()
            )?;
        }
        match game.winner() {
            Some(winner) => writeln!(self.out, "game over: {winner}"),
            None => {
                let mut line = format!("{} to move", game.side_to_move());
                if state.extra_move_granted() {
                    line.push_str(" (extra move)");
                }
                if game.is_check() {
                    line.push_str(", in check");
                }
                writeln!(self.out, "{line}")
            }
        }
    }
}

/// One-line summary of a search.
fn describe(result: &SearchResult) -> String {
    let score = match result.score {
        Some(score) => format_score(score),
        None => "unscored".to_string(),
    };
    format!(
        "{} (depth {}, {}, {} nodes, {} ms)",
        result.best_move,
        result.depth,
        score,
        result.nodes,
        result.elapsed.as_millis()
    )
}

/// Formats a White-relative score in points, e.g. `+1.5` or `mate for Black`.
fn format_score(score: Score) -> String {
    if score >= MATE {
        return "mate for White".to_string();
    }
    if score <= -MATE {
        return "mate for Black".to_string();
    }
    let sign = if score < 0 { "-" } else { "+" };
    let abs = score.abs();
    format!("{sign}{}.{}", abs / SCALE, abs % SCALE)
}
