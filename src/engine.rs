//! Turn state machine.
//!
//! [`GameEngine`] owns the live board and turns tile taps into moves. A turn
//! goes through these states:
//!
//! - `Idle`: nothing selected.
//! - `Selected`: one of the active player's pieces is selected and its legal
//!   moves are known. Tapping the piece again unselects it, tapping another
//!   own piece switches the selection, tapping a destination plays the move.
//! - `ChainSelected`: a capture landed where another capture is possible. Only
//!   the follow-up captures or a stay move on the landing tile are accepted;
//!   the player may stop the chain early with the stay move.
//! - `Finished`: one side has no pieces left.
//!
//! Every tap produces [`GameEvent`]s, queued until the caller drains them.

use std::collections::VecDeque;
use std::fmt;

use tracing::debug;

use crate::board::{Board, Tile};
use crate::moves::{Move, MoveChain, MoveType, generate_all_moves, generate_moves};
use crate::player::{PlayerId, Players};
use crate::position::Position;
use crate::search::{SearchConfig, SearchError, find_best_move, tap_sequence};

/// Why a tap was not acted on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    OutOfPlay,
    NotOwned,
    NotADestination,
    ChainInProgress,
    GameOver,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::OutOfPlay => write!(f, "tile out of play"),
            IgnoreReason::NotOwned => write!(f, "tile not owned by the active player"),
            IgnoreReason::NotADestination => write!(f, "tile is not a destination"),
            IgnoreReason::ChainInProgress => write!(f, "capture chain in progress"),
            IgnoreReason::GameOver => write!(f, "game is over"),
        }
    }
}

/// Notifications for the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    SelectionIgnored(IgnoreReason),
    /// A piece was selected (or a capture chain continues) with these options.
    TurnStarted { at: Position, valid_moves: Vec<Move> },
    TileUnselected { at: Position, valid_moves: Vec<Move> },
    /// `discarded` holds the options that were not taken.
    MoveExecuted { mv: Move, discarded: Vec<Move> },
    /// The turn passed to this player.
    PlayerTurnStarted(PlayerId),
    GameFinished { winner: PlayerId },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    Selected { at: Position, valid_moves: Vec<Move> },
    ChainSelected { at: Position, valid_moves: Vec<Move> },
    Finished { winner: PlayerId },
}

pub struct GameEngine {
    players: Players,
    board: Board,
    starting: PlayerId,
    active: PlayerId,
    state: TurnState,
    events: VecDeque<GameEvent>,
}

impl GameEngine {
    /// A new game in the starting layout; the first seat moves first.
    pub fn new(players: Players) -> Self {
        let board = Board::new(&players);
        Self::with_board(players, board, PlayerId::FIRST)
    }

    /// A game on a custom board with `active` to move.
    ///
    /// If one side already has no pieces the game starts finished.
    pub fn with_board(players: Players, board: Board, active: PlayerId) -> Self {
        let state = match PlayerId::ALL.into_iter().find(|&p| board.is_won_by(p)) {
            Some(winner) => TurnState::Finished { winner },
            None => TurnState::Idle,
        };
        Self {
            players,
            board,
            starting: active,
            active,
            state,
            events: VecDeque::new(),
        }
    }

    /// Rebuild the starting layout and hand the turn back to the starting player.
    pub fn reset(&mut self) {
        self.board.reset(&self.players);
        self.active = self.starting;
        self.state = TurnState::Idle;
        self.events.clear();
        debug!(active = ?self.active, "game reset");
        self.events.push_back(GameEvent::PlayerTurnStarted(self.active));
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &Players {
        &self.players
    }

    pub fn tile_at(&self, at: Position) -> &Tile {
        self.board.tile(at)
    }

    pub fn active_player(&self) -> PlayerId {
        self.active
    }

    pub fn other_player(&self) -> PlayerId {
        self.players.other(self.active)
    }

    pub fn state(&self) -> &TurnState {
        &self.state
    }

    /// Moves currently offered for the selected piece.
    pub fn valid_moves(&self) -> &[Move] {
        match &self.state {
            TurnState::Selected { valid_moves, .. } | TurnState::ChainSelected { valid_moves, .. } => {
                valid_moves.as_slice()
            }
            _ => &[],
        }
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.state {
            TurnState::Finished { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.winner().is_some()
    }

    /// Whether the active player can move any piece.
    pub fn has_legal_moves(&self) -> bool {
        !generate_all_moves(&self.board, self.active).is_empty()
    }

    pub fn poll_event(&mut self) -> Option<GameEvent> {
        self.events.pop_front()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    fn ignore(&mut self, reason: IgnoreReason) -> bool {
        debug!(%reason, "selection ignored");
        self.emit(GameEvent::SelectionIgnored(reason));
        false
    }

    /// Handle a tap on `at`. Returns whether the tap changed anything.
    pub fn select_tile(&mut self, at: Position) -> bool {
        if self.board.tile(at).is_out_of_play() {
            return self.ignore(IgnoreReason::OutOfPlay);
        }
        let owned = self.board.tile(at).is_owned_by(self.active);

        match &self.state {
            TurnState::Finished { .. } => self.ignore(IgnoreReason::GameOver),
            TurnState::Idle => {
                if owned {
                    self.start_turn(at)
                } else {
                    self.ignore(IgnoreReason::NotOwned)
                }
            }
            TurnState::Selected { at: selected, .. } => {
                let selected = *selected;
                if selected == at {
                    self.unselect();
                    true
                } else if owned {
                    self.unselect();
                    self.start_turn(at)
                } else if let Some(mv) = self.find_destination(at) {
                    self.execute(mv)
                } else {
                    self.ignore(IgnoreReason::NotADestination)
                }
            }
            TurnState::ChainSelected { .. } => match self.find_destination(at) {
                Some(mv) => self.execute(mv),
                None => self.ignore(IgnoreReason::ChainInProgress),
            },
        }
    }

    fn find_destination(&self, at: Position) -> Option<Move> {
        self.valid_moves().iter().find(|m| m.destination == at).copied()
    }

    fn start_turn(&mut self, at: Position) -> bool {
        let valid_moves = generate_moves(&self.board, self.active, at, false);
        debug!(%at, moves = valid_moves.len(), "turn started");
        self.state = TurnState::Selected {
            at,
            valid_moves: valid_moves.clone(),
        };
        self.emit(GameEvent::TurnStarted { at, valid_moves });
        true
    }

    fn unselect(&mut self) {
        let state = std::mem::replace(&mut self.state, TurnState::Idle);
        if let TurnState::Selected { at, valid_moves } = state {
            self.emit(GameEvent::TileUnselected { at, valid_moves });
        }
    }

    fn execute(&mut self, mv: Move) -> bool {
        let discarded: Vec<Move> = self
            .valid_moves()
            .iter()
            .filter(|&&m| m != mv)
            .copied()
            .collect();

        self.board.apply_move(self.active, &mv);
        debug!(%mv, player = ?self.active, "move executed");
        self.emit(GameEvent::MoveExecuted { mv, discarded });

        if mv.move_type() == MoveType::Jump {
            let mut follow_ups = generate_moves(&self.board, self.active, mv.destination, true);
            if !follow_ups.is_empty() {
                follow_ups.push(Move::stay(mv.destination));
                debug!(at = %mv.destination, options = follow_ups.len(), "capture chain continues");
                self.state = TurnState::ChainSelected {
                    at: mv.destination,
                    valid_moves: follow_ups.clone(),
                };
                self.emit(GameEvent::TurnStarted {
                    at: mv.destination,
                    valid_moves: follow_ups,
                });
                return true;
            }
        }

        self.finish_turn();
        true
    }

    fn finish_turn(&mut self) {
        let other = self.other_player();
        if self.board.tile_count(other) == 0 {
            debug!(winner = ?self.active, "game finished");
            self.state = TurnState::Finished {
                winner: self.active,
            };
            self.emit(GameEvent::GameFinished {
                winner: self.active,
            });
            return;
        }

        self.active = other;
        self.state = TurnState::Idle;
        debug!(active = ?self.active, "turn handed over");
        self.emit(GameEvent::PlayerTurnStarted(self.active));
    }

    /// Replay a move chain as a sequence of taps. Returns false at the first
    /// tap that is not accepted.
    pub fn replay_chain(&mut self, chain: &[Move]) -> bool {
        tap_sequence(chain).into_iter().all(|at| self.select_tile(at))
    }

    /// Search for the active player's best chain on a copy of the live board
    /// and play it.
    pub fn play_ai_turn(&mut self, config: &SearchConfig) -> Result<MoveChain, SearchError> {
        match &self.state {
            TurnState::Finished { .. } => {
                return Err(SearchError::InvalidState("game is over".to_string()));
            }
            TurnState::ChainSelected { .. } => {
                return Err(SearchError::InvalidState(
                    "capture chain in progress".to_string(),
                ));
            }
            TurnState::Selected { .. } => self.unselect(),
            TurnState::Idle => {}
        }

        let scratch = self.board.clone();
        let best = find_best_move(&scratch, self.active, config)?;
        if !self.replay_chain(&best.chain) {
            return Err(SearchError::InvalidState(format!(
                "engine rejected chain {:?}",
                best.chain
            )));
        }
        Ok(best.chain)
    }

    /// Play the active player's turn with its own search settings.
    pub fn take_ai_turn(&mut self) -> Result<MoveChain, SearchError> {
        let config = self
            .players
            .get(self.active)
            .search_config()
            .cloned()
            .ok_or_else(|| SearchError::InvalidState("active player is not an AI".to_string()))?;
        self.play_ai_turn(&config)
    }
}
