use serde::{Deserialize, Serialize};

use crate::base62;
use crate::error::{Error, Result};
use crate::types::Outcome;

/// Largest ply the packed score byte can hold.
pub const MAX_PLY: u8 = 63;

const TAG_DRAW: u8 = 0b00;
const TAG_A_WINS: u8 = 0b01;
const TAG_B_WINS: u8 = 0b10;
const TAG_INDETERMINATE: u8 = 0b11;

/// Outcome plus the number of plies until it is forced under optimal play.
/// The ply of an `Indeterminate` score is always 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    outcome: Outcome,
    ply: u8,
}

impl Score {
    pub const INDETERMINATE: Score = Score {
        outcome: Outcome::Indeterminate,
        ply: 0,
    };

    #[inline]
    pub fn new(outcome: Outcome, ply: u8) -> Self {
        let ply = if outcome == Outcome::Indeterminate { 0 } else { ply };
        Self { outcome, ply }
    }

    /// Score of a position whose outcome is visible on the board itself.
    #[inline]
    pub fn trivial(outcome: Outcome) -> Self {
        Self::new(outcome, 0)
    }

    #[inline]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[inline]
    pub fn ply(&self) -> u8 {
        self.ply
    }

    /// Same outcome, one ply further away.
    pub fn one_ply_earlier(self) -> Result<Self> {
        let ply = self.ply + 1;
        if ply > MAX_PLY {
            return Err(Error::PlyOutOfRange { ply: u32::from(ply) });
        }
        Ok(Self::new(self.outcome, ply))
    }

    /// Pack as `outcome tag (2 high bits) | ply (6 low bits)`.
    pub fn to_byte(self) -> Result<u8> {
        if self.ply > MAX_PLY {
            return Err(Error::PlyOutOfRange {
                ply: u32::from(self.ply),
            });
        }
        let tag = match self.outcome {
            Outcome::Draw => TAG_DRAW,
            Outcome::AWins => TAG_A_WINS,
            Outcome::BWins => TAG_B_WINS,
            Outcome::Indeterminate => TAG_INDETERMINATE,
        };
        Ok((tag << 6) | self.ply)
    }

    pub fn from_byte(byte: u8) -> Self {
        let outcome = match byte >> 6 {
            TAG_DRAW => Outcome::Draw,
            TAG_A_WINS => Outcome::AWins,
            TAG_B_WINS => Outcome::BWins,
            _ => Outcome::Indeterminate,
        };
        Self::new(outcome, byte & MAX_PLY)
    }

    /// Decode the legacy signed win-ply byte.
    ///
    /// 1..=127 is an A win in `byte - 1`, 128..=255 a B win in `255 - byte`,
    /// and 0 a draw once the `empty_cells` remaining cells are filled.
    pub fn from_legacy_byte(byte: u8, empty_cells: u8) -> Self {
        match byte {
            1..=127 => Self::new(Outcome::AWins, byte - 1),
            128..=255 => Self::new(Outcome::BWins, 255 - byte),
            0 => Self::new(Outcome::Draw, empty_cells),
        }
    }

    /// Append the text form: outcome character followed by `ply_digits` base-62 digits.
    pub fn write_text(self, ply_digits: usize, out: &mut String) -> Result<()> {
        out.push(self.outcome.to_char());
        base62::encode_into(u64::from(self.ply), ply_digits, out)
    }

    pub fn to_text(self, ply_digits: usize) -> Result<String> {
        let mut s = String::with_capacity(1 + ply_digits);
        self.write_text(ply_digits, &mut s)?;
        Ok(s)
    }

    pub fn parse_text(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        let outcome_char = chars.next().ok_or(Error::InvalidCharacter {
            character: '\0',
            context: "outcome",
        })?;
        let outcome = Outcome::from_char(outcome_char)?;
        let ply = base62::decode(chars.as_str())?;
        match u8::try_from(ply) {
            Ok(ply) if ply <= MAX_PLY => Ok(Self::new(outcome, ply)),
            _ => Err(Error::PlyOutOfRange {
                ply: u32::try_from(ply).unwrap_or(u32::MAX),
            }),
        }
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.outcome {
            Outcome::AWins => write!(f, "A wins in {} ply", self.ply),
            Outcome::BWins => write!(f, "B wins in {} ply", self.ply),
            Outcome::Draw => write!(f, "draw in {} ply", self.ply),
            Outcome::Indeterminate => write!(f, "indeterminate"),
        }
    }
}
