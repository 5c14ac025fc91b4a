use std::collections::BTreeSet;

use crate::board::Board;
use crate::column::ColumnEncoder;
use crate::error::{Error, Result};
use crate::rules::Rules;

/// Bijection over cell indices. Applying it to a board puts the board's cell
/// `entries[i]` into cell `i`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Permutation {
    entries: Vec<u8>,
}

impl Permutation {
    fn from_fn(rules: &Rules, f: impl Fn(usize, usize) -> (usize, usize)) -> Self {
        let (w, h) = (usize::from(rules.width), usize::from(rules.height));
        let entries = (0..w * h)
            .map(|i| {
                let (x, y) = f(i % w, i / w);
                u8::try_from(y * w + x).unwrap_or(u8::MAX)
            })
            .collect();
        Self { entries }
    }

    pub fn identity(rules: &Rules) -> Self {
        Self::from_fn(rules, |x, y| (x, y))
    }

    /// Left-right mirror; the only symmetry that respects gravity.
    pub fn mirror_horizontally(rules: &Rules) -> Self {
        let w = usize::from(rules.width);
        Self::from_fn(rules, move |x, y| (w - 1 - x, y))
    }

    /// Top-bottom mirror. Not a symmetry of a gravity game.
    pub fn mirror_vertically(rules: &Rules) -> Self {
        let h = usize::from(rules.height);
        Self::from_fn(rules, move |x, y| (x, h - 1 - y))
    }

    /// Swap rows and columns; square boards only.
    pub fn transpose(rules: &Rules) -> Result<Self> {
        if rules.width != rules.height {
            return Err(Error::InvalidRules {
                message: format!("transpose needs a square board, got {}x{}", rules.width, rules.height),
            });
        }
        Ok(Self::from_fn(rules, |x, y| (y, x)))
    }

    #[inline]
    pub fn entries(&self) -> &[u8] {
        &self.entries
    }

    #[inline]
    pub fn apply(&self, board: &Board) -> Board {
        board.relabel(&self.entries)
    }

    /// Permutation equal to applying `other` first, then `self`.
    pub fn compose(&self, other: &Permutation) -> Permutation {
        let entries = self
            .entries
            .iter()
            .map(|&i| other.entries[usize::from(i)])
            .collect();
        Permutation { entries }
    }

    pub fn is_identity(&self) -> bool {
        self.entries.iter().enumerate().all(|(i, &e)| i == usize::from(e))
    }
}

/// Maps every board to the smallest (by integer encoding) image under a symmetry group.
#[derive(Debug, Clone)]
pub struct Normalizer {
    permutations: Vec<Permutation>,
}

impl Normalizer {
    /// Close `generators` under composition; the identity is dropped.
    pub fn new(rules: &Rules, generators: &[Permutation]) -> Self {
        let identity = Permutation::identity(rules);
        let mut found: BTreeSet<Permutation> = BTreeSet::new();
        let mut pending = vec![identity];

        while let Some(perm) = pending.pop() {
            if found.contains(&perm) {
                continue;
            }
            for generator in generators {
                pending.push(generator.compose(&perm));
            }
            found.insert(perm);
        }

        let permutations = found.into_iter().filter(|p| !p.is_identity()).collect();
        Self { permutations }
    }

    /// Group for gravity games: identity and the horizontal mirror.
    pub fn for_gravity(rules: &Rules) -> Self {
        Self::new(rules, &[Permutation::mirror_horizontally(rules)])
    }

    /// Non-identity group members.
    #[inline]
    pub fn permutations(&self) -> &[Permutation] {
        &self.permutations
    }

    /// Canonical board and its integer key.
    pub fn normalize_with_key(&self, board: &Board, columns: &ColumnEncoder) -> Result<(Board, u64)> {
        let mut best = *board;
        let mut best_key = board.to_integer(columns)?;
        for perm in &self.permutations {
            let image = perm.apply(board);
            let key = image.to_integer(columns)?;
            if key < best_key {
                best = image;
                best_key = key;
            }
        }
        Ok((best, best_key))
    }

    pub fn normalize(&self, board: &Board, columns: &ColumnEncoder) -> Result<Board> {
        self.normalize_with_key(board, columns).map(|(b, _)| b)
    }
}
