//! Checkers-Rust: a checkers rule engine with a lookahead computer player.
//!
//! This crate implements standard 8x8 checkers: legal move generation with
//! forced capture chains and kinging, a turn state machine driven by tile
//! taps, and a bounded lookahead search that picks moves for a computer player.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions, material weights, search defaults
//! - [`position`] - Coordinates and diagonal geometry
//! - [`player`] - Player identities and the two-seat registry
//! - [`board`] - Board state and move application
//! - [`moves`] - Moves and legal move generation
//! - [`engine`] - Turn state machine and game events
//! - [`scoring`] - Material evaluation
//! - [`search`] - Lookahead search tree
//! - [`protocol`] - Text protocol front-end
//!
//! ## Example
//!
//! ```
//! use checkers_rust::engine::GameEngine;
//! use checkers_rust::player::Players;
//! use checkers_rust::position::Position;
//! use checkers_rust::search::SearchConfig;
//!
//! // Create a new game; Red moves first
//! let mut game = GameEngine::new(Players::standard());
//!
//! // Select a pawn and move it
//! game.select_tile(Position::new(2, 2).unwrap());
//! game.select_tile(Position::new(3, 3).unwrap());
//!
//! // Let the search answer for Black
//! let chain = game.play_ai_turn(&SearchConfig::for_testing()).unwrap();
//! println!("Black played {:?}", chain);
//! ```

pub mod board;
pub mod constants;
pub mod engine;
pub mod moves;
pub mod player;
pub mod position;
pub mod protocol;
pub mod scoring;
pub mod search;
