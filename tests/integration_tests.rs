//! Integration tests for checkers-rust
//!
//! These exercise the rule engine, the turn state machine and the search
//! together through the public API.

use checkers_rust::board::{Board, Piece};
use checkers_rust::constants::{N, PLAYABLE_TILES, STARTING_PAWNS};
use checkers_rust::engine::{GameEngine, GameEvent, TurnState};
use checkers_rust::moves::{Move, MoveType, generate_all_moves, generate_moves};
use checkers_rust::player::{PlayerId, Players};
use checkers_rust::position::Position;
use checkers_rust::search::{SearchConfig, find_best_move, tap_sequence};

const RED: PlayerId = PlayerId::FIRST;
const BLACK: PlayerId = PlayerId::SECOND;

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

fn pos(x: i32, y: i32) -> Position {
    Position::new(x, y).unwrap()
}

/// Build a board holding only the given pieces.
fn setpos(pieces: &[(Piece, PlayerId, (i32, i32))]) -> Board {
    let mut board = Board::empty(&Players::standard());
    for &(piece, owner, (x, y)) in pieces {
        board.place(piece, owner, pos(x, y));
    }
    board
}

fn total_pieces(board: &Board) -> usize {
    board.tile_count(RED) + board.tile_count(BLACK)
}

/// Check the generator's guarantees for every move `player` has on `board`.
fn assert_moves_sound(board: &Board, player: PlayerId) {
    for mv in generate_all_moves(board, player) {
        assert!(
            board.tile(mv.destination).is_empty(),
            "{mv} lands on an occupied tile"
        );
        if let Some(jump) = mv.jump {
            assert_eq!(
                board.tile(jump).owner(),
                Some(player.other()),
                "{mv} captures a piece not owned by the opponent"
            );
        }
    }
}

/// No pawn may stand on its own kinging row.
fn assert_no_uncrowned_pawns(board: &Board) {
    for player in PlayerId::ALL {
        for (at, tile) in board.owned_tiles(player) {
            if board.is_kinging_tile(at, player) {
                assert_eq!(tile.piece(), Piece::King, "pawn left uncrowned at {at}");
            }
        }
    }
}

// =============================================================================
// Board and coordinate properties
// =============================================================================

#[test]
fn test_position_construction_bounds() {
    for x in -1..=N as i32 {
        for y in -1..=N as i32 {
            let valid = x >= 0 && x < N as i32 && y >= 0 && y < N as i32;
            assert_eq!(Position::new(x, y).is_ok(), valid);
        }
    }
}

#[test]
fn test_fresh_board_layout() {
    let board = Board::new(&Players::standard());
    assert_eq!(board.out_of_play_count(), 32);

    let mut empty = 0;
    for at in Position::all() {
        let tile = board.tile(at);
        match tile.owner() {
            Some(owner) => {
                assert_eq!(tile.piece(), Piece::Pawn);
                let band = if owner == RED { 0..3 } else { 5..8 };
                assert!(band.contains(&at.y()), "{owner:?} pawn outside its band at {at}");
            }
            None if !tile.is_out_of_play() => empty += 1,
            None => {}
        }
    }
    assert_eq!(board.tile_count(RED), STARTING_PAWNS);
    assert_eq!(board.tile_count(BLACK), STARTING_PAWNS);
    assert_eq!(empty, PLAYABLE_TILES - 2 * STARTING_PAWNS);
}

// =============================================================================
// Random playouts checking rule invariants
// =============================================================================

#[test]
fn test_random_games_keep_invariants() {
    let mut rng = fastrand::Rng::with_seed(7);

    for _ in 0..25 {
        let mut game = GameEngine::new(Players::standard());

        for _ in 0..200 {
            if game.is_finished() {
                break;
            }
            let active = game.active_player();
            assert_moves_sound(game.board(), active);

            let moves = generate_all_moves(game.board(), active);
            if moves.is_empty() {
                break;
            }
            let mut mv = moves[rng.usize(..moves.len())];
            assert!(game.select_tile(mv.target));

            loop {
                let before = total_pieces(game.board());
                assert!(game.select_tile(mv.destination));
                let after = total_pieces(game.board());
                match mv.move_type() {
                    MoveType::Jump => assert_eq!(after + 1, before),
                    _ => assert_eq!(after, before),
                }
                assert_no_uncrowned_pawns(game.board());

                match game.state() {
                    TurnState::ChainSelected { valid_moves, .. } => {
                        assert_eq!(game.active_player(), active);
                        mv = valid_moves[rng.usize(..valid_moves.len())];
                    }
                    _ => break,
                }
            }
        }
    }
}

// =============================================================================
// End-to-end turn handling
// =============================================================================

#[test]
fn test_opening_selection_move_counts() {
    let mut game = GameEngine::new(Players::standard());

    // Edge pawn: only one forward diagonal exists.
    assert!(game.select_tile(pos(0, 2)));
    assert_eq!(game.valid_moves(), &[Move::simple(pos(0, 2), pos(1, 3))]);

    // Interior pawn: two forward diagonals.
    assert!(game.select_tile(pos(2, 2)));
    assert_eq!(game.valid_moves().len(), 2);
}

#[test]
fn test_single_pawn_against_nothing_is_a_win() {
    let board = setpos(&[(Piece::Pawn, RED, (3, 3))]);
    assert!(board.is_won_by(RED));
    let game = GameEngine::with_board(Players::standard(), board, BLACK);
    assert_eq!(game.winner(), Some(RED));
}

#[test]
fn test_double_jump_enters_chain() {
    let board = setpos(&[
        (Piece::Pawn, RED, (1, 1)),
        (Piece::Pawn, BLACK, (2, 2)),
        (Piece::Pawn, BLACK, (4, 4)),
        (Piece::Pawn, BLACK, (0, 6)),
    ]);
    let mut game = GameEngine::with_board(Players::standard(), board, RED);

    assert!(game.select_tile(pos(1, 1)));
    assert!(game.select_tile(pos(3, 3)));

    let jumps = generate_moves(game.board(), RED, pos(3, 3), true);
    assert!(!jumps.is_empty());
    assert!(matches!(game.state(), TurnState::ChainSelected { at, .. } if *at == pos(3, 3)));
    assert_eq!(game.active_player(), RED);

    // Finish the chain and hand the turn over.
    assert!(game.select_tile(pos(5, 5)));
    assert_eq!(game.active_player(), BLACK);
    assert_eq!(game.board().tile_count(BLACK), 1);

    let events = game.drain_events();
    assert_eq!(events.last(), Some(&GameEvent::PlayerTurnStarted(BLACK)));
}

#[test]
fn test_promotion_is_permanent() {
    let board = setpos(&[(Piece::Pawn, RED, (2, 6)), (Piece::Pawn, BLACK, (7, 1))]);
    let mut game = GameEngine::with_board(Players::standard(), board, RED);

    game.select_tile(pos(2, 6));
    game.select_tile(pos(3, 7));
    assert_eq!(game.tile_at(pos(3, 7)).piece(), Piece::King);

    // Black moves, then the new king steps back up the board.
    game.select_tile(pos(7, 1));
    game.select_tile(pos(6, 0));
    game.select_tile(pos(3, 7));
    assert_eq!(game.valid_moves().len(), 2);
    game.select_tile(pos(4, 6));
    assert_eq!(game.tile_at(pos(4, 6)).piece(), Piece::King);
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn test_search_is_deterministic() {
    let board = Board::new(&Players::standard());
    let config = SearchConfig::for_testing();
    let first = find_best_move(&board, BLACK, &config).unwrap();
    for _ in 0..3 {
        let again = find_best_move(&board, BLACK, &config).unwrap();
        assert_eq!(again.chain, first.chain);
    }
}

#[test]
fn test_search_chain_replays_through_engine() {
    let board = setpos(&[
        (Piece::Pawn, RED, (1, 1)),
        (Piece::Pawn, BLACK, (2, 2)),
        (Piece::Pawn, BLACK, (4, 4)),
        (Piece::Pawn, BLACK, (0, 6)),
    ]);
    let config = SearchConfig::for_testing();
    let best = find_best_move(&board, RED, &config).unwrap();
    assert_eq!(
        best.chain,
        vec![
            Move::jump(pos(1, 1), pos(3, 3), pos(2, 2)),
            Move::jump(pos(3, 3), pos(5, 5), pos(4, 4)),
        ]
    );

    let mut game = GameEngine::with_board(Players::standard(), board, RED);
    for at in tap_sequence(&best.chain) {
        assert!(game.select_tile(at));
    }
    assert_eq!(game.board(), &best.board);
    assert_eq!(game.active_player(), BLACK);
}

#[test]
fn test_ai_game_terminates() {
    let mut game = GameEngine::new(Players::standard());
    let config = SearchConfig {
        depth: 1,
        ..SearchConfig::for_testing()
    };
    for _ in 0..300 {
        if game.is_finished() || !game.has_legal_moves() {
            break;
        }
        game.play_ai_turn(&config).unwrap();
        assert_no_uncrowned_pawns(game.board());
    }
    assert!(total_pieces(game.board()) < 2 * STARTING_PAWNS);
}
