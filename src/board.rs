use std::fmt;

use crate::column::ColumnEncoder;
use crate::error::{Error, Result};
use crate::rules::{Rules, MAX_CELLS};
use crate::types::{Dir, Outcome, Player};

/// Fixed `height x width` grid of cells.
///
/// Cells are laid out row-major, `y * width + x`, with row 0 the top row and
/// row `height - 1` the bottom row. The mover is derived from stone counts,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    width: u8,
    height: u8,
    cells: [Player; MAX_CELLS],
}

impl Board {
    /// Empty board for `rules`. Fails with `InvalidRules` when the grid is
    /// empty or does not fit in `MAX_CELLS`.
    pub fn empty(rules: &Rules) -> Result<Self> {
        if rules.width == 0 || rules.height == 0 || rules.cells() > MAX_CELLS {
            return Err(Error::InvalidRules {
                message: format!(
                    "{}x{} board does not fit in 1..={} cells",
                    rules.width, rules.height, MAX_CELLS
                ),
            });
        }
        Ok(Self::blank(rules))
    }

    /// Empty board for rules that are already validated.
    #[inline]
    pub(crate) fn blank(rules: &Rules) -> Self {
        Self {
            width: rules.width,
            height: rules.height,
            cells: [Player::None; MAX_CELLS],
        }
    }

    #[inline]
    pub fn width(&self) -> u8 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u8 {
        self.height
    }

    #[inline]
    pub fn num_cells(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    #[inline]
    pub fn cells(&self) -> &[Player] {
        &self.cells[..self.num_cells()]
    }

    #[inline]
    pub fn get(&self, x: u8, y: u8) -> Player {
        self.cells[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: u8, y: u8, player: Player) {
        let idx = self.index(x, y);
        self.cells[idx] = player;
    }

    #[inline]
    fn index(&self, x: u8, y: u8) -> usize {
        debug_assert!(x < self.width && y < self.height);
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }

    #[inline]
    fn is_valid_coordinate(&self, x: i32, y: i32) -> bool {
        0 <= x && x < i32::from(self.width) && 0 <= y && y < i32::from(self.height)
    }

    /// Board whose cell `i` holds this board's cell `source_of[i]`.
    ///
    /// `source_of` must be a permutation of `0..num_cells()`.
    pub fn relabel(&self, source_of: &[u8]) -> Board {
        debug_assert_eq!(source_of.len(), self.num_cells());
        let mut out = Board {
            width: self.width,
            height: self.height,
            cells: [Player::None; MAX_CELLS],
        };
        for (i, &src) in source_of.iter().enumerate() {
            out.cells[i] = self.cells[usize::from(src)];
        }
        out
    }

    /// Stone counts for (A, B).
    pub fn stone_counts(&self) -> (u32, u32) {
        self.cells().iter().fold((0, 0), |(a, b), &p| match p {
            Player::A => (a + 1, b),
            Player::B => (a, b + 1),
            Player::None => (a, b),
        })
    }

    /// Number of occupied cells, which equals the number of moves played.
    #[inline]
    pub fn count(&self) -> u32 {
        let (a, b) = self.stone_counts();
        a + b
    }

    #[inline]
    pub fn empty_cells(&self) -> u32 {
        u32::from(self.width) * u32::from(self.height) - self.count()
    }

    /// The top row is occupied in every column.
    #[inline]
    pub fn is_full(&self) -> bool {
        (0..self.width).all(|x| self.get(x, 0) != Player::None)
    }

    #[inline]
    pub fn is_column_full(&self, x: u8) -> bool {
        self.get(x, 0) != Player::None
    }

    /// Lowest empty row of column `x`, if any.
    pub fn landing_row(&self, x: u8) -> Option<u8> {
        (0..self.height).rev().find(|&y| self.get(x, y) == Player::None)
    }

    pub fn mover(&self) -> Result<Player> {
        let (a_count, b_count) = self.stone_counts();
        if a_count == b_count {
            Ok(Player::A)
        } else if a_count == b_count + 1 {
            Ok(Player::B)
        } else {
            Err(Error::InconsistentMover { a_count, b_count })
        }
    }

    /// Outcome visible by direct inspection: a connect-`connect` run for
    /// either player, a full board (draw), or `Indeterminate`.
    pub fn trivial_outcome(&self, connect: u8) -> Result<Outcome> {
        let q = i32::from(connect);
        let mut a_wins = false;
        let mut b_wins = false;

        for y in 0..self.height {
            for x in 0..self.width {
                let player = self.get(x, y);
                if player == Player::None {
                    continue;
                }
                for dir in Dir::all() {
                    if self.has_run_from(x, y, dir, q) {
                        match player {
                            Player::A => a_wins = true,
                            Player::B => b_wins = true,
                            Player::None => {}
                        }
                    }
                }
            }
        }

        match (a_wins, b_wins) {
            (true, true) => Err(Error::MultipleWinners),
            (true, false) => Ok(Outcome::AWins),
            (false, true) => Ok(Outcome::BWins),
            (false, false) if self.is_full() => Ok(Outcome::Draw),
            (false, false) => Ok(Outcome::Indeterminate),
        }
    }

    fn has_run_from(&self, x: u8, y: u8, dir: Dir, q: i32) -> bool {
        let (dx, dy) = dir.delta();
        let (x0, y0) = (i32::from(x), i32::from(y));
        if !self.is_valid_coordinate(x0 + dx * (q - 1), y0 + dy * (q - 1)) {
            return false;
        }
        let player = self.get(x, y);
        (1..q).all(|i| {
            match (u8::try_from(x0 + dx * i), u8::try_from(y0 + dy * i)) {
                (Ok(xi), Ok(yi)) => self.get(xi, yi) == player,
                _ => false,
            }
        })
    }

    /// One successor per non-full column, left to right, with the mover's chip
    /// dropped into it. Not deduplicated and not normalized.
    pub fn generate_successors(&self) -> Result<Vec<Board>> {
        let mover = self.mover()?;
        let mut out = Vec::with_capacity(usize::from(self.width));
        for x in 0..self.width {
            if let Some(y) = self.landing_row(x) {
                let mut next = *self;
                next.set(x, y, mover);
                out.push(next);
            }
        }
        Ok(out)
    }

    /// Column `x` as a base-3 number, bottom cell least significant.
    pub fn column_ternary(&self, x: u8) -> u32 {
        (0..self.height).fold(0u32, |acc, y| acc * 3 + self.get(x, y).ternary_digit())
    }

    /// Mixed-radix integer: one digit per column, base `columns.count()`,
    /// leftmost column most significant.
    pub fn to_integer(&self, columns: &ColumnEncoder) -> Result<u64> {
        let radix = columns.count();
        let mut n: u64 = 0;
        for x in 0..self.width {
            n = n * radix + columns.encode(self.column_ternary(x))?;
        }
        Ok(n)
    }

    pub fn from_integer(mut n: u64, rules: &Rules, columns: &ColumnEncoder) -> Result<Board> {
        let value = n;
        let radix = columns.count();
        let mut board = Board::empty(rules)?;
        for x in (0..board.width).rev() {
            let mut ternary = columns.decode(n % radix)?;
            n /= radix;
            for y in (0..board.height).rev() {
                board.set(x, y, Player::from_ternary_digit(ternary % 3));
                ternary /= 3;
            }
        }
        if n != 0 {
            let count = rules
                .number_of_boards_in_column_representation()
                .unwrap_or(u64::MAX);
            return Err(Error::IndexOutOfRange { index: value, count });
        }
        Ok(board)
    }

    /// Parse rows written top row first with `A`, `B` and `.`, separated by
    /// `/` or newlines. Gravity is not checked here; encoding rejects floating chips.
    pub fn parse_rows(rules: &Rules, s: &str) -> Result<Board> {
        let rows: Vec<&str> = s
            .split(|c| c == '/' || c == '\n')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .collect();
        if rows.len() != usize::from(rules.height) {
            return Err(Error::MalformedRecord {
                line: 0,
                reason: format!("expected {} rows, got {}", rules.height, rows.len()),
            });
        }
        let mut board = Board::empty(rules)?;
        for ((y, line), row) in (0..rules.height).zip(1u64..).zip(&rows) {
            let chars: Vec<char> = row.chars().collect();
            if chars.len() != usize::from(rules.width) {
                return Err(Error::MalformedRecord {
                    line,
                    reason: format!("expected {} cells, got {}", rules.width, chars.len()),
                });
            }
            for (x, c) in (0..rules.width).zip(chars) {
                board.set(x, y, Player::from_char(c)?);
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.width {
                write!(f, "{}", self.get(x, y).to_char())?;
            }
        }
        Ok(())
    }
}
