use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Occupant of a single cell. `A` always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Player {
    #[default]
    None,
    A,
    B,
}

impl Player {
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Player::None => Player::None,
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }

    /// Base-3 digit used by the column codec: 0 = empty, 1 = A, 2 = B.
    #[inline]
    pub fn ternary_digit(self) -> u32 {
        match self {
            Player::None => 0,
            Player::A => 1,
            Player::B => 2,
        }
    }

    #[inline]
    pub fn from_ternary_digit(digit: u32) -> Self {
        match digit % 3 {
            0 => Player::None,
            1 => Player::A,
            _ => Player::B,
        }
    }

    #[inline]
    pub fn to_char(self) -> char {
        match self {
            Player::A => 'A',
            Player::B => 'B',
            Player::None => '.',
        }
    }

    pub fn from_char(c: char) -> Result<Self> {
        match c {
            'A' => Ok(Player::A),
            'B' => Ok(Player::B),
            '.' => Ok(Player::None),
            _ => Err(Error::InvalidCharacter {
                character: c,
                context: "player",
            }),
        }
    }
}

/// Game-theoretical result of a position under perfect play.
/// `Indeterminate` marks positions whose value is not (yet) known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    AWins,
    BWins,
    Draw,
    Indeterminate,
}

impl Outcome {
    /// The winning outcome for `player`; `Player::None` has no win and maps to `Indeterminate`.
    #[inline]
    pub fn win_for(player: Player) -> Self {
        match player {
            Player::A => Outcome::AWins,
            Player::B => Outcome::BWins,
            Player::None => Outcome::Indeterminate,
        }
    }

    #[inline]
    pub fn is_win_for(self, player: Player) -> bool {
        player != Player::None && self == Outcome::win_for(player)
    }

    #[inline]
    pub fn is_resolved(self) -> bool {
        self != Outcome::Indeterminate
    }

    #[inline]
    pub fn to_char(self) -> char {
        match self {
            Outcome::AWins => 'A',
            Outcome::BWins => 'B',
            Outcome::Draw => '-',
            Outcome::Indeterminate => '?',
        }
    }

    pub fn from_char(c: char) -> Result<Self> {
        match c {
            'A' => Ok(Outcome::AWins),
            'B' => Ok(Outcome::BWins),
            '-' => Ok(Outcome::Draw),
            '?' => Ok(Outcome::Indeterminate),
            _ => Err(Error::InvalidCharacter {
                character: c,
                context: "outcome",
            }),
        }
    }
}

/// Line directions scanned for a connect-Q run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Horizontal,
    Vertical,
    Diagonal,
    AntiDiagonal,
}

impl Dir {
    #[inline]
    pub fn all() -> [Dir; 4] {
        [Dir::Horizontal, Dir::Vertical, Dir::Diagonal, Dir::AntiDiagonal]
    }

    /// Step as (dx, dy), with y growing downwards (row 0 is the top row).
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::Horizontal => (1, 0),
            Dir::Vertical => (0, 1),
            Dir::Diagonal => (1, 1),
            Dir::AntiDiagonal => (1, -1),
        }
    }
}
