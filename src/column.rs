use crate::error::{Error, Result};
use crate::rules::MAX_HEIGHT;
use crate::types::Player;

const NOT_A_COLUMN: u32 = u32::MAX;

/// Dense index over every legal single-column configuration.
///
/// Chips stack from the bottom with no gaps, and no chip may sit on top of a
/// connect-Q run, since that run already ended the game. A column is stored
/// as a base-3 number with the bottom chip as the least significant digit
/// (see [`Player::ternary_digit`]); legal columns are numbered in ascending
/// ternary order.
#[derive(Debug, Clone)]
pub struct ColumnEncoder {
    height: u8,
    connect: u8,
    index_to_ternary: Vec<u32>,
    ternary_to_index: Vec<u32>,
}

impl ColumnEncoder {
    /// Enumerate every legal column. Fails with `InvalidRules` above
    /// `MAX_HEIGHT`, where the ternary table would no longer fit.
    pub fn new(height: u8, connect: u8) -> Result<Self> {
        if height > MAX_HEIGHT {
            return Err(Error::InvalidRules {
                message: format!("height {height} exceeds {MAX_HEIGHT}"),
            });
        }
        let mut index_to_ternary: Vec<u32> = Vec::new();

        // Columns listed bottom chip first.
        let mut pending: Vec<Vec<Player>> = vec![Vec::new()];
        while let Some(column) = pending.pop() {
            index_to_ternary.push(column_ternary(&column));

            if column.len() < usize::from(height) && !top_run_complete(&column, connect) {
                for chip in [Player::A, Player::B] {
                    let mut taller = column.clone();
                    taller.push(chip);
                    pending.push(taller);
                }
            }
        }

        index_to_ternary.sort_unstable();

        let max_ternary = index_to_ternary.last().map_or(0, |&t| slot(t));
        let mut ternary_to_index = vec![NOT_A_COLUMN; max_ternary + 1];
        for (index, &ternary) in (0u32..).zip(&index_to_ternary) {
            ternary_to_index[slot(ternary)] = index;
        }

        Ok(Self {
            height,
            connect,
            index_to_ternary,
            ternary_to_index,
        })
    }

    #[inline]
    pub fn height(&self) -> u8 {
        self.height
    }

    #[inline]
    pub fn connect(&self) -> u8 {
        self.connect
    }

    /// Number of legal columns.
    #[inline]
    pub fn count(&self) -> u64 {
        u64::try_from(self.index_to_ternary.len()).unwrap_or(u64::MAX)
    }

    pub fn encode(&self, ternary: u32) -> Result<u64> {
        match self.ternary_to_index.get(slot(ternary)) {
            Some(&index) if index != NOT_A_COLUMN => Ok(u64::from(index)),
            _ => Err(Error::InvalidColumn { ternary }),
        }
    }

    pub fn decode(&self, index: u64) -> Result<u32> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.index_to_ternary.get(i).copied())
            .ok_or(Error::IndexOutOfRange {
                index,
                count: self.count(),
            })
    }

    /// Ternary values of all legal columns in index order.
    #[inline]
    pub fn columns(&self) -> &[u32] {
        &self.index_to_ternary
    }
}

#[inline]
fn slot(ternary: u32) -> usize {
    usize::try_from(ternary).unwrap_or(usize::MAX)
}

fn column_ternary(column: &[Player]) -> u32 {
    column
        .iter()
        .rev()
        .fold(0u32, |acc, chip| acc * 3 + chip.ternary_digit())
}

/// True when the top `connect` chips belong to the same player.
fn top_run_complete(column: &[Player], connect: u8) -> bool {
    let q = usize::from(connect);
    if q == 0 || column.len() < q {
        return false;
    }
    let top = &column[column.len() - q..];
    top.iter().all(|&chip| chip == top[0])
}
