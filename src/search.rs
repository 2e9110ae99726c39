//! Bounded lookahead search for the computer player.
//!
//! The search builds a tree of [`ThoughtLevel`]s. Each level holds every
//! complete move chain the side to move could play from one board (a
//! [`PotentialMove`]), together with the board that results and the running
//! material of both sides as seen by the searching player.
//!
//! Below the root, levels are pruned to the best and worst few chains by net
//! score before the opponent's replies are expanded. Scores are combined by
//! averaging a chain's own net score with the discounted mean of its
//! replies. This is a heuristic, not minimax: the opponent is modelled by the
//! average of its kept replies rather than its best one.

use std::cmp::Ordering;

use thiserror::Error;
use tracing::debug;

use crate::board::Board;
use crate::constants::{BOTTOM_MOVE_PRUNING, SEARCH_DEPTH, TOP_MOVE_PRUNING};
use crate::moves::{Move, MoveChain, MoveType, generate_moves};
use crate::player::PlayerId;
use crate::position::Position;
use crate::scoring::{Weights, board_score};

/// Errors that can occur during a search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("no legal moves available for {0:?}")]
    NoLegalMoves(PlayerId),

    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// Configuration for the lookahead search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Deepest level built; the root is level 0.
    pub depth: usize,
    /// Highest-scoring chains kept when pruning a level.
    pub top_k: usize,
    /// Lowest-scoring chains kept when pruning a level.
    pub bottom_k: usize,
    pub weights: Weights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: SEARCH_DEPTH,
            top_k: TOP_MOVE_PRUNING,
            bottom_k: BOTTOM_MOVE_PRUNING,
            weights: Weights::default(),
        }
    }
}

impl SearchConfig {
    /// A shallow config for tests.
    pub fn for_testing() -> Self {
        Self {
            depth: 2,
            top_k: 3,
            bottom_k: 3,
            weights: Weights::default(),
        }
    }
}

/// One complete move chain from a level, with its outcome.
#[derive(Debug, Clone)]
pub struct PotentialMove {
    pub chain: MoveChain,
    /// Board after the chain has been played.
    pub board: Board,
    /// Searching player's material after the chain.
    pub my_score: f64,
    /// Opponent's material after the chain.
    pub opponent_score: f64,
    pub net_score: f64,
    /// Net score blended with the replies below it.
    pub total_score: f64,
    pub next_level: Option<Box<ThoughtLevel>>,
}

impl PotentialMove {
    fn new(chain: MoveChain, board: Board, my_score: f64, opponent_score: f64) -> Self {
        let net_score = my_score - opponent_score;
        Self {
            chain,
            board,
            my_score,
            opponent_score,
            net_score,
            total_score: net_score,
            next_level: None,
        }
    }

    /// One side has run out of material.
    pub fn is_end_of_game(&self) -> bool {
        self.my_score <= 0.0 || self.opponent_score <= 0.0
    }

    fn settle_total(&mut self, weights: &Weights) {
        self.total_score = match self.next_level.as_deref() {
            Some(level) if !level.potential_moves.is_empty() => {
                (self.net_score + level.weighted_average_score(weights)) / 2.0
            }
            _ => self.net_score,
        };
    }
}

/// One ply of lookahead.
#[derive(Debug, Clone)]
pub struct ThoughtLevel {
    pub active: PlayerId,
    pub other: PlayerId,
    pub depth: usize,
    pub potential_moves: Vec<PotentialMove>,
}

impl ThoughtLevel {
    /// Mean total score of this level's chains, discounted by `future^depth`
    /// below the root.
    pub fn weighted_average_score(&self, weights: &Weights) -> f64 {
        if self.potential_moves.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.potential_moves.iter().map(|p| p.total_score).sum();
        let mean = sum / self.potential_moves.len() as f64;
        if self.depth > 0 {
            mean * weights.future.powi(self.depth as i32)
        } else {
            mean
        }
    }

    /// Index of the chain with the highest total score; the first one wins ties.
    pub fn best_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, candidate) in self.potential_moves.iter().enumerate() {
            match best {
                Some(b) if self.potential_moves[b].total_score >= candidate.total_score => {}
                _ => best = Some(i),
            }
        }
        best
    }

    /// Number of potential moves in this level and all levels below it.
    pub fn node_count(&self) -> usize {
        self.potential_moves
            .iter()
            .map(|p| 1 + p.next_level.as_ref().map_or(0, |l| l.node_count()))
            .sum()
    }
}

/// Builds the thought tree for one player.
pub struct Searcher<'a> {
    config: &'a SearchConfig,
    me: PlayerId,
}

impl<'a> Searcher<'a> {
    pub fn new(config: &'a SearchConfig, me: PlayerId) -> Self {
        Self { config, me }
    }

    /// Build the full tree rooted at `board` with the searching player to move.
    pub fn build_tree(&self, board: &Board) -> ThoughtLevel {
        let weights = &self.config.weights;
        let other = self.me.other();
        self.build_level(
            board,
            self.me,
            0,
            board_score(board, self.me, weights),
            board_score(board, other, weights),
        )
    }

    fn build_level(
        &self,
        board: &Board,
        active: PlayerId,
        depth: usize,
        my_score: f64,
        opponent_score: f64,
    ) -> ThoughtLevel {
        let mut potential_moves = Vec::new();
        for (at, _) in board.owned_tiles(active) {
            for mv in generate_moves(board, active, at, false) {
                self.expand(board, active, mv, &[], my_score, opponent_score, &mut potential_moves);
            }
        }
        let candidates = potential_moves.len();

        if depth < self.config.depth {
            potential_moves.sort_by(|a, b| {
                b.net_score
                    .partial_cmp(&a.net_score)
                    .unwrap_or(Ordering::Equal)
            });
            self.prune(&mut potential_moves);

            for potential in potential_moves.iter_mut() {
                if potential.is_end_of_game() {
                    continue;
                }
                let next = self.build_level(
                    &potential.board,
                    active.other(),
                    depth + 1,
                    potential.my_score,
                    potential.opponent_score,
                );
                potential.next_level = Some(Box::new(next));
            }
        }

        for potential in potential_moves.iter_mut() {
            potential.settle_total(&self.config.weights);
        }

        debug!(depth, ?active, candidates, kept = potential_moves.len(), "built thought level");

        ThoughtLevel {
            active,
            other: active.other(),
            depth,
            potential_moves,
        }
    }

    /// Keep the `top_k` highest and `bottom_k` lowest entries of a list sorted
    /// by descending net score.
    fn prune(&self, moves: &mut Vec<PotentialMove>) {
        let (top, bottom) = (self.config.top_k, self.config.bottom_k);
        if moves.len() > top + bottom {
            let end = moves.len() - bottom;
            moves.drain(top..end);
        }
    }

    /// Play `mv` on a copy of `board` and collect every complete chain it starts.
    ///
    /// A capture that allows another capture yields one chain per follow-up
    /// plus a chain that stops at the landing square.
    #[allow(clippy::too_many_arguments)]
    fn expand(
        &self,
        board: &Board,
        active: PlayerId,
        mv: Move,
        prior: &[Move],
        mut my_score: f64,
        mut opponent_score: f64,
        out: &mut Vec<PotentialMove>,
    ) {
        let weights = &self.config.weights;
        let mine = active == self.me;

        let mut result = board.clone();
        let effect = result.apply_move(active, &mv);

        let mut chain = prior.to_vec();
        chain.push(mv);

        if effect.promoted {
            if mine {
                my_score += weights.promotion_gain();
            } else {
                opponent_score += weights.promotion_gain();
            }
        }
        if let Some(captured) = effect.captured {
            if mine {
                opponent_score -= weights.piece(captured);
            } else {
                my_score -= weights.piece(captured);
            }
        }

        if mv.move_type() == MoveType::Jump {
            let follow_ups = generate_moves(&result, active, mv.destination, true);
            if !follow_ups.is_empty() {
                for next in follow_ups {
                    self.expand(&result, active, next, &chain, my_score, opponent_score, out);
                }
                chain.push(Move::stay(mv.destination));
            }
        }

        out.push(PotentialMove::new(chain, result, my_score, opponent_score));
    }
}

/// Find the best move chain for `me` on `board`.
pub fn find_best_move(
    board: &Board,
    me: PlayerId,
    config: &SearchConfig,
) -> Result<PotentialMove, SearchError> {
    let mut root = Searcher::new(config, me).build_tree(board);
    debug!(nodes = root.node_count(), "search finished");

    let idx = root.best_index().ok_or(SearchError::NoLegalMoves(me))?;
    Ok(root.potential_moves.swap_remove(idx))
}

/// Taps that replay `chain` through the turn state machine: the first
/// target, then every destination in order.
pub fn tap_sequence(chain: &[Move]) -> Vec<Position> {
    let mut taps = Vec::with_capacity(chain.len() + 1);
    if let Some(first) = chain.first() {
        taps.push(first.target);
    }
    taps.extend(chain.iter().map(|m| m.destination));
    taps
}
