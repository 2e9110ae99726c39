//! Player identities and the two-seat player registry.
//!
//! Players are referred to everywhere by a [`PlayerId`] handle. Two players
//! are the same player only if their handles match; names and symbols are
//! display data and play no part in equality.

use thiserror::Error;

use crate::position::Vertical;
use crate::search::SearchConfig;

/// Errors produced when registering players.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayersError {
    #[error("both players advance {0:?}; pawn directions must be opposite")]
    SameDirection(Vertical),
}

/// Opaque handle for one of the two seats at the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlayerId(u8);

impl PlayerId {
    pub const FIRST: PlayerId = PlayerId(0);
    pub const SECOND: PlayerId = PlayerId(1);

    /// Both seats, in registration order.
    pub const ALL: [PlayerId; 2] = [PlayerId::FIRST, PlayerId::SECOND];

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The opposing seat.
    #[inline]
    pub fn other(self) -> PlayerId {
        PlayerId(1 - self.0)
    }
}

/// Who decides the moves for a seat.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerKind {
    Human,
    Ai(SearchConfig),
}

/// A participant in the game.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub name: String,
    /// Character used when rendering this player's pieces (lower-case pawn, upper-case king).
    pub symbol: char,
    /// The vertical direction this player's pawns advance in.
    pub pawn_direction: Vertical,
    pub kind: PlayerKind,
}

impl Player {
    pub fn human(name: impl Into<String>, symbol: char, pawn_direction: Vertical) -> Self {
        Self {
            name: name.into(),
            symbol,
            pawn_direction,
            kind: PlayerKind::Human,
        }
    }

    pub fn ai(
        name: impl Into<String>,
        symbol: char,
        pawn_direction: Vertical,
        config: SearchConfig,
    ) -> Self {
        Self {
            name: name.into(),
            symbol,
            pawn_direction,
            kind: PlayerKind::Ai(config),
        }
    }

    /// Search settings if this seat is computer controlled.
    pub fn search_config(&self) -> Option<&SearchConfig> {
        match &self.kind {
            PlayerKind::Ai(config) => Some(config),
            PlayerKind::Human => None,
        }
    }
}

/// Registry of exactly two players with opposite pawn directions.
#[derive(Debug, Clone, PartialEq)]
pub struct Players {
    seats: [Player; 2],
}

impl Players {
    pub fn new(first: Player, second: Player) -> Result<Self, PlayersError> {
        if first.pawn_direction == second.pawn_direction {
            return Err(PlayersError::SameDirection(first.pawn_direction));
        }
        Ok(Self {
            seats: [first, second],
        })
    }

    /// Red (moving down, starts) against Black (moving up), both human.
    pub fn standard() -> Self {
        Self {
            seats: [
                Player::human("Red", 'r', Vertical::Down),
                Player::human("Black", 'b', Vertical::Up),
            ],
        }
    }

    pub fn get(&self, id: PlayerId) -> &Player {
        &self.seats[id.index()]
    }

    /// The opponent of `id`.
    pub fn other(&self, id: PlayerId) -> PlayerId {
        id.other()
    }

    /// The seat whose pawns advance in `direction`.
    pub fn going(&self, direction: Vertical) -> PlayerId {
        if self.seats[0].pawn_direction == direction {
            PlayerId::FIRST
        } else {
            PlayerId::SECOND
        }
    }

    /// Pawn directions indexed by [`PlayerId::index`].
    pub fn pawn_directions(&self) -> [Vertical; 2] {
        [self.seats[0].pawn_direction, self.seats[1].pawn_direction]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &Player)> {
        PlayerId::ALL.into_iter().zip(self.seats.iter())
    }
}

impl Default for Players {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_is_involution() {
        assert_eq!(PlayerId::FIRST.other(), PlayerId::SECOND);
        assert_eq!(PlayerId::SECOND.other(), PlayerId::FIRST);
        assert_eq!(PlayerId::FIRST.other().other(), PlayerId::FIRST);
    }

    #[test]
    fn test_same_direction_rejected() {
        let a = Player::human("A", 'a', Vertical::Up);
        let b = Player::human("B", 'b', Vertical::Up);
        assert_eq!(
            Players::new(a, b),
            Err(PlayersError::SameDirection(Vertical::Up))
        );
    }

    #[test]
    fn test_identity_is_by_handle_not_name() {
        let players = Players::new(
            Player::human("Sam", 's', Vertical::Down),
            Player::human("Sam", 's', Vertical::Up),
        )
        .unwrap();
        let ids: Vec<_> = players.iter().map(|(id, _)| id).collect();
        assert_ne!(ids[0], ids[1]);
        assert_eq!(players.get(ids[0]).name, players.get(ids[1]).name);
    }

    #[test]
    fn test_going() {
        let players = Players::standard();
        assert_eq!(players.going(Vertical::Down), PlayerId::FIRST);
        assert_eq!(players.going(Vertical::Up), PlayerId::SECOND);
    }

    #[test]
    fn test_ai_kind() {
        let ai = Player::ai("Bot", 'b', Vertical::Up, SearchConfig::default());
        assert_eq!(ai.search_config(), Some(&SearchConfig::default()));
        assert_eq!(Player::human("Ann", 'a', Vertical::Down).search_config(), None);
    }
}
