//! Constants for board geometry, material weights, and search parameters.
//!
//! Only standard 8x8 checkers is supported, so the geometry is fixed at
//! compile time. The weights and search parameters are the defaults used by
//! [`crate::scoring::Weights`] and [`crate::search::SearchConfig`]; both can be
//! overridden at runtime.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN).
pub const N: usize = 8;

/// Total number of tiles on the board.
pub const BOARDSIZE: usize = N * N;

/// Number of rows each side fills with pawns at the start of a game.
pub const HOME_ROWS: usize = 3;

/// Number of playable tiles (the other half of the checkerboard is out of play).
pub const PLAYABLE_TILES: usize = BOARDSIZE / 2;

/// Pawns each player starts with.
pub const STARTING_PAWNS: usize = HOME_ROWS * N / 2;

// =============================================================================
// Material Weights
// =============================================================================

/// Material value of a pawn.
pub const PAWN_WEIGHT: f64 = 1.0;

/// Material value of a king.
pub const KING_WEIGHT: f64 = 2.5;

/// Discount applied per level of lookahead (`FUTURE_WEIGHT^depth`).
pub const FUTURE_WEIGHT: f64 = 0.85;

// =============================================================================
// Search Parameters
// =============================================================================

/// Deepest thought level that is still built (the root is level 0).
pub const SEARCH_DEPTH: usize = 4;

/// Highest-scoring potential moves kept at each pruned level.
pub const TOP_MOVE_PRUNING: usize = 5;

/// Lowest-scoring potential moves kept at each pruned level.
pub const BOTTOM_MOVE_PRUNING: usize = 5;
