//! Material evaluation of a board.

use crate::board::{Board, Piece};
use crate::constants::{FUTURE_WEIGHT, KING_WEIGHT, PAWN_WEIGHT};
use crate::player::PlayerId;

/// Tunable weights used by the evaluation and the lookahead discount.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Weights {
    pub pawn: f64,
    pub king: f64,
    /// Per-level discount applied to deeper lookahead.
    pub future: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            pawn: PAWN_WEIGHT,
            king: KING_WEIGHT,
            future: FUTURE_WEIGHT,
        }
    }
}

impl Weights {
    /// Material value of a piece; zero for empty and out-of-play tiles.
    pub fn piece(&self, piece: Piece) -> f64 {
        match piece {
            Piece::Pawn => self.pawn,
            Piece::King => self.king,
            Piece::Empty | Piece::OutOfPlay => 0.0,
        }
    }

    /// Material gained when a pawn is crowned.
    #[inline]
    pub fn promotion_gain(&self) -> f64 {
        self.king - self.pawn
    }
}

/// Sum of the material `player` has on the board.
pub fn board_score(board: &Board, player: PlayerId, weights: &Weights) -> f64 {
    board
        .owned_tiles(player)
        .map(|(_, tile)| weights.piece(tile.piece()))
        .sum()
}

/// Material of `player` minus material of the opponent.
pub fn net_score(board: &Board, player: PlayerId, weights: &Weights) -> f64 {
    board_score(board, player, weights) - board_score(board, player.other(), weights)
}
