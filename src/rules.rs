use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Largest number of cells on a board. Every ply count must fit the 6-bit score field.
pub const MAX_CELLS: usize = 63;

/// Tallest supported column; the ternary lookup table holds 3^height entries.
pub const MAX_HEIGHT: u8 = 12;

/// Board geometry and win rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rules {
    pub width: u8,
    pub height: u8,
    pub connect: u8,
}

impl Default for Rules {
    fn default() -> Self {
        Self::standard()
    }
}

impl Rules {
    /// 7 wide, 6 tall, connect-4.
    #[inline]
    pub const fn standard() -> Self {
        Self {
            width: 7,
            height: 6,
            connect: 4,
        }
    }

    pub fn new(width: u8, height: u8, connect: u8) -> Result<Self> {
        let rules = Self {
            width,
            height,
            connect,
        };
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |message: String| Err(Error::InvalidRules { message });
        if self.width == 0 || self.height == 0 || self.connect == 0 {
            return fail(format!(
                "width, height and connect must be positive (got {}x{} connect-{})",
                self.width, self.height, self.connect
            ));
        }
        if self.height > MAX_HEIGHT {
            return fail(format!("height {} exceeds {}", self.height, MAX_HEIGHT));
        }
        if self.cells() > MAX_CELLS {
            return fail(format!("{} cells exceeds {}", self.cells(), MAX_CELLS));
        }
        if self.number_of_boards_in_column_representation().is_none() {
            return fail(format!(
                "{}^{} boards do not fit in 64 bits",
                self.number_of_possible_columns(),
                self.width
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn cells(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    #[inline]
    pub fn number_of_possible_columns(&self) -> u64 {
        number_of_possible_columns(u32::from(self.connect), u32::from(self.height))
    }

    /// Size of the mixed-radix board space, or `None` if it overflows `u64`.
    #[inline]
    pub fn number_of_boards_in_column_representation(&self) -> Option<u64> {
        self.number_of_possible_columns()
            .checked_pow(u32::from(self.width))
    }

    pub fn constants(&self) -> Result<Constants> {
        self.validate()?;
        let boards = self
            .number_of_boards_in_column_representation()
            .unwrap_or(u64::MAX);
        // Plies run 0..=cells.
        let ply_digits = num_digits_required(62, u64::from(self.width) * u64::from(self.height) + 1).max(1);
        Ok(Constants {
            width: self.width,
            height: self.height,
            connect: self.connect,
            number_of_possible_columns: self.number_of_possible_columns(),
            number_of_boards_in_column_representation: boards,
            num_base62_board_digits: num_digits_required(62, boards).max(1),
            num_base256_board_digits: num_digits_required(256, boards).max(1),
            num_base62_ply_digits: ply_digits,
        })
    }
}

/// Record widths derived from the board geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constants {
    pub width: u8,
    pub height: u8,
    pub connect: u8,
    pub number_of_possible_columns: u64,
    pub number_of_boards_in_column_representation: u64,
    pub num_base62_board_digits: usize,
    pub num_base256_board_digits: usize,
    pub num_base62_ply_digits: usize,
}

/// Number of legal columns of height `n` for connect-`q`.
///
///   f(q, n) = 2^(n+1) - 1                          if n <= q
///   f(q, n) = sum(k = n-q+1 .. n-1) f(q, k) + q + 2  if n >  q
///
/// Must agree with [`crate::column::ColumnEncoder::count`].
pub fn number_of_possible_columns(q: u32, n: u32) -> u64 {
    let mut table: Vec<u64> = Vec::new();
    for k in 0..=n {
        let value = if k <= q {
            (2u64 << k) - 1
        } else {
            // f(q, k-1) down to f(q, k-q+1)
            let window: u64 = table.iter().rev().zip(1..q).map(|(f, _)| f).sum();
            window + u64::from(q) + 2
        };
        table.push(value);
    }
    table.last().copied().unwrap_or(1)
}

/// Smallest `d` such that `base^d >= value`.
pub fn num_digits_required(base: u64, value: u64) -> usize {
    let mut digits = 0usize;
    let mut capacity: u128 = 1;
    while capacity < u128::from(value) {
        capacity *= u128::from(base);
        digits += 1;
    }
    digits
}
