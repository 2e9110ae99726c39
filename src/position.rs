//! Board coordinates and diagonal geometry.
//!
//! A [`Position`] is an `(x, y)` pair where `x` is the column and `y` is the
//! row, both in `0..N`. Positions can only be built through [`Position::new`]
//! (or [`parse_coord`]), so an off-board coordinate never reaches the rest of
//! the engine.
//!
//! Movement is always diagonal: one [`Vertical`] step combined with one
//! [`Horizontal`] step. Splitting the two axes into separate enums means a
//! "vertical" left or a "horizontal" up cannot be expressed.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::N;

/// Errors produced when building or parsing a position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("position ({x}, {y}) is off the board")]
    OffBoard { x: i32, y: i32 },

    #[error("cannot parse coordinate '{0}', expected 'x,y'")]
    Parse(String),
}

/// Vertical component of a diagonal step. `Up` decreases the row, `Down` increases it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Vertical {
    Up,
    Down,
}

impl Vertical {
    /// Both vertical directions, the set a king may move in.
    pub const BOTH: [Vertical; 2] = [Vertical::Up, Vertical::Down];

    #[inline]
    fn dy(self) -> i32 {
        match self {
            Vertical::Up => -1,
            Vertical::Down => 1,
        }
    }
}

/// Horizontal component of a diagonal step. `Left` decreases the column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Horizontal {
    Left,
    Right,
}

impl Horizontal {
    pub const BOTH: [Horizontal; 2] = [Horizontal::Left, Horizontal::Right];

    #[inline]
    fn dx(self) -> i32 {
        match self {
            Horizontal::Left => -1,
            Horizontal::Right => 1,
        }
    }
}

/// A tile coordinate on the board. Always on-board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    x: u8,
    y: u8,
}

impl Position {
    /// Create a position, failing if either coordinate is outside `0..N`.
    pub fn new(x: i32, y: i32) -> Result<Self, PositionError> {
        if Self::in_range(x) && Self::in_range(y) {
            Ok(Self {
                x: x as u8,
                y: y as u8,
            })
        } else {
            Err(PositionError::OffBoard { x, y })
        }
    }

    #[inline]
    fn in_range(v: i32) -> bool {
        v >= 0 && (v as usize) < N
    }

    /// Column.
    #[inline]
    pub fn x(self) -> usize {
        self.x as usize
    }

    /// Row.
    #[inline]
    pub fn y(self) -> usize {
        self.y as usize
    }

    /// Row-major index into a board array.
    #[inline]
    pub fn index(self) -> usize {
        self.y() * N + self.x()
    }

    /// The diagonal neighbor one row in `vertical` and one column in `horizontal`,
    /// or `None` if that step leaves the board.
    pub fn neighbor(self, vertical: Vertical, horizontal: Horizontal) -> Option<Neighbor> {
        let x = self.x as i32 + horizontal.dx();
        let y = self.y as i32 + vertical.dy();
        Position::new(x, y).ok().map(|position| Neighbor {
            position,
            vertical,
            horizontal,
        })
    }

    /// Left and right diagonal neighbors for each vertical direction supplied.
    ///
    /// A pawn passes only its own forward direction, a king passes
    /// [`Vertical::BOTH`]. At most four neighbors are returned, fewer at the
    /// board edges.
    pub fn candidate_move_neighbors(self, verticals: &[Vertical]) -> Vec<Neighbor> {
        let mut neighbors = Vec::with_capacity(verticals.len() * 2);
        for &vertical in verticals {
            for horizontal in Horizontal::BOTH {
                if let Some(n) = self.neighbor(vertical, horizontal) {
                    neighbors.push(n);
                }
            }
        }
        neighbors
    }

    /// Iterate over every position on the board in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..N as u8).flat_map(|y| (0..N as u8).map(move |x| Position { x, y }))
    }
}

/// A diagonal neighbor together with the step that reached it.
///
/// Remembering the step lets a capture compute its landing square by
/// continuing in the same direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Neighbor {
    pub position: Position,
    pub vertical: Vertical,
    pub horizontal: Horizontal,
}

impl Neighbor {
    /// Landing square of a capture over this neighbor: one more step along the
    /// same diagonal, or `None` if that falls off the board.
    pub fn jump_target(&self) -> Option<Position> {
        self.position
            .neighbor(self.vertical, self.horizontal)
            .map(|n| n.position)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Position {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_coord(s)
    }
}

/// Parse an `x,y` coordinate string such as `"0,2"`.
pub fn parse_coord(s: &str) -> Result<Position, PositionError> {
    let parse_err = || PositionError::Parse(s.to_string());
    let (x, y) = s.trim().split_once(',').ok_or_else(parse_err)?;
    let x = x.trim().parse::<i32>().map_err(|_| parse_err())?;
    let y = y.trim().parse::<i32>().map_err(|_| parse_err())?;
    Position::new(x, y)
}
