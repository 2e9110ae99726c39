//! Moves and legal move generation.
//!
//! A [`Move`] carries a piece from `target` to `destination`, optionally
//! capturing the piece at `jump`. A full turn is a [`MoveChain`]: one move, or
//! a sequence of captures ended either by a position with no further capture
//! or by an explicit stay move.

use std::fmt;

use tracing::{trace, warn};

use crate::board::{Board, Piece};
use crate::player::PlayerId;
use crate::position::{Position, Vertical};

/// Kind of a move, derived from its fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveType {
    /// Step to an adjacent empty tile.
    Simple,
    /// Capture the piece at `jump` and land behind it.
    Jump,
    /// Remain in place, ending a capture chain.
    Stay,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub target: Position,
    pub destination: Position,
    pub jump: Option<Position>,
}

/// The moves making up one turn, in play order.
pub type MoveChain = Vec<Move>;

impl Move {
    pub fn simple(target: Position, destination: Position) -> Self {
        Self {
            target,
            destination,
            jump: None,
        }
    }

    pub fn jump(target: Position, destination: Position, over: Position) -> Self {
        Self {
            target,
            destination,
            jump: Some(over),
        }
    }

    pub fn stay(at: Position) -> Self {
        Self {
            target: at,
            destination: at,
            jump: None,
        }
    }

    pub fn move_type(&self) -> MoveType {
        if self.target == self.destination {
            MoveType::Stay
        } else if self.jump.is_some() {
            MoveType::Jump
        } else {
            MoveType::Simple
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.move_type() {
            MoveType::Stay => write!(f, "{}=", self.target),
            MoveType::Jump => write!(f, "{}x{}", self.target, self.destination),
            MoveType::Simple => write!(f, "{}-{}", self.target, self.destination),
        }
    }
}

/// Format a chain as space separated moves.
pub fn chain_to_string(chain: &[Move]) -> String {
    chain
        .iter()
        .map(Move::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Legal moves for the piece of `player` at `at`.
///
/// Returns nothing (and logs a warning) if `player` does not own the tile.
/// With `jumps_only` set, only captures are produced; that is the mode used
/// to continue a capture chain. Order follows the neighbor scan and carries
/// no meaning.
pub fn generate_moves(board: &Board, player: PlayerId, at: Position, jumps_only: bool) -> Vec<Move> {
    let tile = board.tile(at);
    if !tile.is_owned_by(player) {
        warn!(%at, ?player, "cannot generate moves for a tile the player does not own");
        return Vec::new();
    }

    let forward = [board.pawn_direction(player)];
    let verticals: &[Vertical] = match tile.piece() {
        Piece::King => &Vertical::BOTH,
        _ => &forward,
    };

    let mut moves = Vec::new();
    for neighbor in at.candidate_move_neighbors(verticals) {
        let next = board.tile(neighbor.position);
        if next.is_empty() {
            if !jumps_only {
                moves.push(Move::simple(at, neighbor.position));
            }
        } else if next.owner().is_some_and(|owner| owner != player) {
            let Some(landing) = neighbor.jump_target() else {
                continue;
            };
            if board.tile(landing).is_empty() {
                moves.push(Move::jump(at, landing, neighbor.position));
            }
        }
    }

    trace!(%at, count = moves.len(), jumps_only, "generated moves");
    moves
}

/// Every legal first move for `player`, scanning owned tiles in row-major order.
pub fn generate_all_moves(board: &Board, player: PlayerId) -> Vec<Move> {
    board
        .owned_tiles(player)
        .flat_map(|(at, _)| generate_moves(board, player, at, false))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Players;

    fn pos(x: i32, y: i32) -> Position {
        Position::new(x, y).unwrap()
    }

    fn empty_board() -> Board {
        Board::empty(&Players::standard())
    }

    const RED: PlayerId = PlayerId::FIRST;
    const BLACK: PlayerId = PlayerId::SECOND;

    #[test]
    fn test_move_type() {
        assert_eq!(Move::simple(pos(0, 0), pos(1, 1)).move_type(), MoveType::Simple);
        assert_eq!(Move::jump(pos(0, 0), pos(2, 2), pos(1, 1)).move_type(), MoveType::Jump);
        assert_eq!(Move::stay(pos(2, 2)).move_type(), MoveType::Stay);
    }

    #[test]
    fn test_equality_includes_jump() {
        let a = Move::jump(pos(2, 2), pos(4, 4), pos(3, 3));
        let b = Move::simple(pos(2, 2), pos(4, 4));
        assert_ne!(a, b);
        assert_eq!(a, Move::jump(pos(2, 2), pos(4, 4), pos(3, 3)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Move::simple(pos(0, 2), pos(1, 3)).to_string(), "0,2-1,3");
        assert_eq!(Move::jump(pos(2, 2), pos(4, 4), pos(3, 3)).to_string(), "2,2x4,4");
        assert_eq!(Move::stay(pos(4, 4)).to_string(), "4,4=");
    }

    #[test]
    fn test_pawn_moves_forward_only() {
        let mut board = empty_board();
        board.place(Piece::Pawn, RED, pos(3, 3));
        let moves = generate_moves(&board, RED, pos(3, 3), false);
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().all(|m| m.destination.y() == 4));
    }

    #[test]
    fn test_king_moves_both_ways() {
        let mut board = empty_board();
        board.place(Piece::King, RED, pos(3, 3));
        assert_eq!(generate_moves(&board, RED, pos(3, 3), false).len(), 4);
    }

    #[test]
    fn test_unowned_tile_yields_nothing() {
        let mut board = empty_board();
        board.place(Piece::Pawn, RED, pos(3, 3));
        assert!(generate_moves(&board, BLACK, pos(3, 3), false).is_empty());
        assert!(generate_moves(&board, RED, pos(5, 5), false).is_empty());
    }

    #[test]
    fn test_jump_over_opponent() {
        let mut board = empty_board();
        board.place(Piece::Pawn, RED, pos(2, 2));
        board.place(Piece::Pawn, BLACK, pos(3, 3));
        let moves = generate_moves(&board, RED, pos(2, 2), false);
        assert!(moves.contains(&Move::jump(pos(2, 2), pos(4, 4), pos(3, 3))));
        assert!(moves.contains(&Move::simple(pos(2, 2), pos(1, 3))));
        assert_eq!(moves.len(), 2);

        let jumps = generate_moves(&board, RED, pos(2, 2), true);
        assert_eq!(jumps, vec![Move::jump(pos(2, 2), pos(4, 4), pos(3, 3))]);
    }

    #[test]
    fn test_no_jump_over_own_piece_or_onto_occupied() {
        let mut board = empty_board();
        board.place(Piece::Pawn, RED, pos(2, 2));
        board.place(Piece::Pawn, RED, pos(3, 3));
        board.place(Piece::Pawn, BLACK, pos(1, 3));
        board.place(Piece::Pawn, BLACK, pos(0, 4));
        assert!(generate_moves(&board, RED, pos(2, 2), false).is_empty());
    }

    #[test]
    fn test_no_jump_off_board() {
        let mut board = empty_board();
        board.place(Piece::Pawn, RED, pos(1, 5));
        board.place(Piece::Pawn, BLACK, pos(0, 6));
        let moves = generate_moves(&board, RED, pos(1, 5), false);
        assert_eq!(moves, vec![Move::simple(pos(1, 5), pos(2, 6))]);
    }

    #[test]
    fn test_generate_all_moves_opening() {
        let players = Players::standard();
        let board = Board::new(&players);
        // Only the front row can move: 3 interior pawns with 2 moves, 1 edge pawn with 1.
        assert_eq!(generate_all_moves(&board, RED).len(), 7);
        assert_eq!(generate_all_moves(&board, BLACK).len(), 7);
    }

    #[test]
    fn test_chain_to_string() {
        let chain = vec![
            Move::jump(pos(2, 2), pos(4, 4), pos(3, 3)),
            Move::stay(pos(4, 4)),
        ];
        assert_eq!(chain_to_string(&chain), "2,2x4,4 4,4=");
    }
}
