//! The 8x8 checkers board and its mutation primitives.
//!
//! Tiles alternate in color. The tiles where `(x + y)` is odd are out of play
//! for the whole life of the board; only the other 32 ever hold a piece.

use std::fmt;

use tracing::warn;

use crate::constants::{BOARDSIZE, HOME_ROWS, N};
use crate::moves::{Move, MoveType};
use crate::player::{PlayerId, Players};
use crate::position::{Position, Vertical};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TileColor {
    Black,
    White,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Piece {
    OutOfPlay,
    Empty,
    Pawn,
    King,
}

/// One square of the board.
///
/// An owner is only ever present together with a pawn or king; clearing the
/// owner clears the piece. Out-of-play tiles never change.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    color: TileColor,
    piece: Piece,
    owner: Option<PlayerId>,
}

impl Tile {
    fn playable() -> Self {
        Self {
            color: TileColor::White,
            piece: Piece::Empty,
            owner: None,
        }
    }

    fn out_of_play() -> Self {
        Self {
            color: TileColor::Black,
            piece: Piece::OutOfPlay,
            owner: None,
        }
    }

    pub fn color(&self) -> TileColor {
        self.color
    }

    pub fn piece(&self) -> Piece {
        self.piece
    }

    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    #[inline]
    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.piece == Piece::Empty
    }

    #[inline]
    pub fn is_out_of_play(&self) -> bool {
        self.piece == Piece::OutOfPlay
    }

    /// Put `piece` owned by `owner` on this tile. Placing `Empty` clears it.
    fn occupy(&mut self, piece: Piece, owner: PlayerId) {
        debug_assert!(
            piece == Piece::Empty || !self.is_out_of_play(),
            "placed {piece:?} on an out-of-play tile"
        );
        match piece {
            Piece::Pawn | Piece::King if !self.is_out_of_play() => {
                self.piece = piece;
                self.owner = Some(owner);
            }
            Piece::Empty => self.clear(),
            _ => warn!(?piece, "ignored placement on an out-of-play tile"),
        }
    }

    fn clear(&mut self) {
        self.owner = None;
        if !self.is_out_of_play() {
            self.piece = Piece::Empty;
        }
    }
}

/// What applying a move did to the board.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveEffect {
    /// The piece removed by a capture, if any.
    pub captured: Option<Piece>,
    /// Whether the moved pawn was crowned.
    pub promoted: bool,
}

/// The checkers board.
///
/// Cloning produces an independent copy; the search explores hypothetical
/// futures on clones and never touches the live board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    tiles: [Tile; BOARDSIZE],
    /// Pawn direction per seat, indexed by [`PlayerId::index`].
    pawn_directions: [Vertical; 2],
}

impl Board {
    /// A board in the starting layout: each side's three home rows filled with pawns.
    pub fn new(players: &Players) -> Self {
        let mut board = Self::empty(players);
        board.setup(players);
        board
    }

    /// A board with every playable tile empty.
    pub fn empty(players: &Players) -> Self {
        let mut tiles = [Tile::playable(); BOARDSIZE];
        for pos in Position::all() {
            if (pos.x() + pos.y()) % 2 == 1 {
                tiles[pos.index()] = Tile::out_of_play();
            }
        }
        Self {
            tiles,
            pawn_directions: players.pawn_directions(),
        }
    }

    fn setup(&mut self, players: &Players) {
        let top = players.going(Vertical::Down);
        let bottom = players.going(Vertical::Up);
        for pos in Position::all() {
            let tile = &mut self.tiles[pos.index()];
            if tile.is_out_of_play() {
                continue;
            }
            if pos.y() < HOME_ROWS {
                tile.occupy(Piece::Pawn, top);
            } else if pos.y() >= N - HOME_ROWS {
                tile.occupy(Piece::Pawn, bottom);
            }
        }
    }

    /// Rebuild the starting layout for `players`.
    pub fn reset(&mut self, players: &Players) {
        *self = Self::new(players);
    }

    pub fn tile(&self, at: Position) -> &Tile {
        &self.tiles[at.index()]
    }

    /// Place `piece` owned by `owner` at `at`, replacing whatever was there.
    pub fn place(&mut self, piece: Piece, owner: PlayerId, at: Position) {
        self.tiles[at.index()].occupy(piece, owner);
    }

    /// Remove any piece at `at`.
    pub fn set_empty(&mut self, at: Position) {
        self.tiles[at.index()].clear();
    }

    pub fn pawn_direction(&self, player: PlayerId) -> Vertical {
        self.pawn_directions[player.index()]
    }

    /// Whether a pawn of `player` landing on `at` is crowned.
    pub fn is_kinging_tile(&self, at: Position, player: PlayerId) -> bool {
        let last_row = match self.pawn_direction(player) {
            Vertical::Up => 0,
            Vertical::Down => N - 1,
        };
        at.y() == last_row
    }

    /// Number of tiles holding a piece of `player`.
    pub fn tile_count(&self, player: PlayerId) -> usize {
        self.tiles.iter().filter(|t| t.is_owned_by(player)).count()
    }

    /// Tiles owned by `player`, in row-major order.
    pub fn owned_tiles(&self, player: PlayerId) -> impl Iterator<Item = (Position, &Tile)> + '_ {
        Position::all()
            .map(move |pos| (pos, self.tile(pos)))
            .filter(move |(_, tile)| tile.is_owned_by(player))
    }

    /// Number of out-of-play tiles (always half the board).
    pub fn out_of_play_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_out_of_play()).count()
    }

    /// `player` has won if the opponent has no pieces left and `player` still has some.
    pub fn is_won_by(&self, player: PlayerId) -> bool {
        self.tile_count(player.other()) == 0 && self.tile_count(player) > 0
    }

    /// Apply an accepted move made by `player`.
    ///
    /// The moved piece is crowned if it is a pawn landing on its last row.
    /// A captured piece is removed. Stay moves change nothing.
    pub fn apply_move(&mut self, player: PlayerId, mv: &Move) -> MoveEffect {
        if mv.move_type() == MoveType::Stay {
            return MoveEffect::default();
        }

        let mut piece = self.tile(mv.target).piece();
        let promoted = piece == Piece::Pawn && self.is_kinging_tile(mv.destination, player);
        if promoted {
            piece = Piece::King;
        }

        self.place(piece, player, mv.destination);
        self.set_empty(mv.target);

        let captured = mv.jump.map(|jump| {
            let taken = self.tile(jump).piece();
            self.set_empty(jump);
            taken
        });

        MoveEffect { captured, promoted }
    }
}

impl Board {
    /// Render with the given per-seat symbols (lower-case pawn, upper-case king).
    pub fn render(&self, symbols: [char; 2]) -> String {
        let mut out = String::from(" ");
        for x in 0..N {
            out.push_str(&format!(" {x}"));
        }
        out.push('\n');
        for y in 0..N {
            out.push_str(&y.to_string());
            for x in 0..N {
                let tile = &self.tiles[y * N + x];
                let ch = match (tile.piece(), tile.owner()) {
                    (Piece::OutOfPlay, _) => ' ',
                    (Piece::Pawn, Some(p)) => symbols[p.index()].to_ascii_lowercase(),
                    (Piece::King, Some(p)) => symbols[p.index()].to_ascii_uppercase(),
                    _ => '.',
                };
                out.push(' ');
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(['x', 'o']))
    }
}
