//! A Points Chess game: board plus variant counters, with history.

use crate::config::EngineConfig;
use crate::setup::Setup;
use crate::variant::{captured_piece, piece_value, splitmix64, VariantState, Winner};
use chess_core::{Color, Move, MoveParseError};
use chess_rules::{MoveList, Position, PositionError, RuleSet, StandardChess};
use std::fmt;
use thiserror::Error;

/// Errors returned by game operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid move: {0}")]
    InvalidMove(String),

    #[error("invalid position: {0}")]
    InvalidPosition(#[from] PositionError),

    #[error("the game is over")]
    GameOver,

    #[error("cannot skip a turn while in check")]
    CannotSkipInCheck,
}

impl From<MoveParseError> for GameError {
    fn from(e: MoveParseError) -> Self {
        GameError::InvalidMove(e.to_string())
    }
}

/// What a side did with its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAction {
    Move(Move),
    Skip,
}

/// One entry of the game record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    pub side: Color,
    pub action: TurnAction,
    /// Points gained by the capture, zero otherwise.
    pub points: u32,
    /// The turn earned an extra move.
    pub extra_move_granted: bool,
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            TurnAction::Move(m) => write!(f, "{}: {}", self.side, m)?,
            TurnAction::Skip => write!(f, "{}: skip", self.side)?,
        }
        if self.points > 0 {
            write!(f, " (+{})", self.points)?;
        }
        if self.extra_move_granted {
            f.write_str(" extra move")?;
        }
        Ok(())
    }
}

/// Everything [`Game::unmake`] needs to restore the previous state.
#[derive(Debug, Clone, Copy)]
pub struct Undo {
    position: Position,
    state: VariantState,
}

/// Board, counters and record of a single game.
///
/// The board's side to move always matches [`VariantState::current_side`]: an
/// extra move is realised as a pass by the opponent.
#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    state: VariantState,
    history: Vec<Turn>,
}

impl Game {
    /// Standard starting position.
    pub fn new(config: &EngineConfig) -> Self {
        Self::from_position(StandardChess.initial_position(), config)
    }

    /// Starts from a validated custom setup.
    pub fn from_setup(setup: &Setup, config: &EngineConfig) -> Result<Self, GameError> {
        Ok(Self::from_position(setup.validate()?, config))
    }

    pub fn from_fen(fen: &str, config: &EngineConfig) -> Result<Self, GameError> {
        Ok(Self::from_position(Position::from_fen(fen)?, config))
    }

    /// Starts from a position that already passed validation.
    pub fn from_position(position: Position, config: &EngineConfig) -> Self {
        Game {
            state: VariantState::new(config.max_moves, position.side_to_move),
            position,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> &VariantState {
        &self.state
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn side_to_move(&self) -> Color {
        self.state.current_side()
    }

    pub fn moves_remaining(&self, color: Color) -> u32 {
        self.state.moves_remaining(color)
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn winner(&self) -> Option<Winner> {
        self.state.winner()
    }

    pub fn last_move_was_capture(&self) -> bool {
        self.state.last_move_was_capture()
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn is_check(&self) -> bool {
        StandardChess.is_check(&self.position)
    }

    /// Legal moves for the side to move; none once the game is over.
    pub fn legal_moves(&self) -> MoveList {
        if self.is_over() {
            MoveList::new()
        } else {
            StandardChess.legal_moves(&self.position)
        }
    }

    /// Hash over the board and every variant counter.
    pub fn signature(&self) -> u64 {
        splitmix64(self.position.zobrist_hash() ^ self.state.fingerprint())
    }

    pub fn plies_remaining_upper_bound(&self) -> u32 {
        self.state.plies_remaining_upper_bound()
    }

    /// Plays a legal move for the side to move.
    pub fn make_move(&mut self, m: Move) -> Result<&Turn, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if !StandardChess.is_legal(&self.position, m) {
            return Err(GameError::InvalidMove(m.to_uci()));
        }
        let turn = self.advance(m);
        self.history.push(turn);
        tracing::debug!(%turn, "move played");
        Ok(&self.history[self.history.len() - 1])
    }

    /// Parses coordinate notation such as `e2e4` or `e7e8q` and plays it.
    pub fn make_move_uci(&mut self, uci: &str) -> Result<&Turn, GameError> {
        let m = Move::from_uci(uci)?;
        self.make_move(m)
    }

    /// Passes the turn without moving. A pending extra move is forfeited.
    pub fn skip_turn(&mut self) -> Result<&Turn, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if self.is_check() {
            return Err(GameError::CannotSkipInCheck);
        }
        let side = self.side_to_move();
        self.position = StandardChess.make_null_move(&self.position);
        self.state.record_turn(side, 0, false);
        self.state.set_last_move_was_capture(false);
        if StandardChess.is_checkmate(&self.position) {
            self.state.declare_winner(Winner::side(side));
        }
        self.state.settle_budget();

        let turn = Turn {
            side,
            action: TurnAction::Skip,
            points: 0,
            extra_move_granted: false,
        };
        self.history.push(turn);
        tracing::debug!(%turn, "turn skipped");
        Ok(&self.history[self.history.len() - 1])
    }

    /// Applies `m` without a legality check or history entry, for search.
    pub fn play(&mut self, m: Move) -> Undo {
        let undo = Undo {
            position: self.position,
            state: self.state,
        };
        self.advance(m);
        undo
    }

    /// Restores the state saved by [`Game::play`].
    pub fn unmake(&mut self, undo: Undo) {
        self.position = undo.position;
        self.state = undo.state;
    }

    fn advance(&mut self, m: Move) -> Turn {
        let side = self.side_to_move();
        let captured = captured_piece(&self.position, m);
        let points = captured.map_or(0, piece_value);
        let on_final_move = self.state.on_final_move(side);

        let after = StandardChess.make_move(&self.position, m);
        // Supported: an enemy piece still attacks the square the capturer
        // now stands on.
        let supported = captured.is_some()
            && on_final_move
            && StandardChess.is_attacked_by(&after, side.opposite(), m.to());

        let extra = self.state.record_turn(side, points, supported);
        self.state.set_last_move_was_capture(captured.is_some());
        self.position = if extra {
            StandardChess.make_null_move(&after)
        } else {
            after
        };

        if StandardChess.is_checkmate(&after) {
            self.state.declare_winner(Winner::side(side));
        }
        self.state.settle_budget();

        Turn {
            side,
            action: TurnAction::Move(m),
            points,
            extra_move_granted: extra,
        }
    }
}
