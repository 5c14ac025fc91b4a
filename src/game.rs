use crate::base62;
use crate::board::Board;
use crate::column::ColumnEncoder;
use crate::engine::score::Score;
use crate::error::Result;
use crate::rules::{Constants, Rules};
use crate::symmetry::Normalizer;

/// Everything derived from one board geometry: the column table, the
/// symmetry group and the record widths. Built once and passed by reference.
#[derive(Debug, Clone)]
pub struct Game {
    rules: Rules,
    constants: Constants,
    columns: ColumnEncoder,
    normalizer: Normalizer,
}

impl Game {
    pub fn new(rules: Rules) -> Result<Self> {
        let constants = rules.constants()?;
        let columns = ColumnEncoder::new(rules.height, rules.connect)?;
        let normalizer = Normalizer::for_gravity(&rules);
        Ok(Self {
            rules,
            constants,
            columns,
            normalizer,
        })
    }

    #[inline]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    #[inline]
    pub fn constants(&self) -> &Constants {
        &self.constants
    }

    #[inline]
    pub fn columns(&self) -> &ColumnEncoder {
        &self.columns
    }

    #[inline]
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    #[inline]
    pub fn empty_board(&self) -> Board {
        Board::blank(&self.rules)
    }

    #[inline]
    pub fn encode(&self, board: &Board) -> Result<u64> {
        board.to_integer(&self.columns)
    }

    #[inline]
    pub fn decode(&self, key: u64) -> Result<Board> {
        Board::from_integer(key, &self.rules, &self.columns)
    }

    /// Canonical image of `board` and its key.
    #[inline]
    pub fn canonical(&self, board: &Board) -> Result<(Board, u64)> {
        self.normalizer.normalize_with_key(board, &self.columns)
    }

    #[inline]
    pub fn trivial_score(&self, board: &Board) -> Result<Score> {
        Ok(Score::trivial(board.trivial_outcome(self.rules.connect)?))
    }

    /// Canonical successors of `board`, deduplicated, in ascending key order.
    pub fn unique_successors(&self, board: &Board) -> Result<Vec<(u64, Board)>> {
        let mut out = board
            .generate_successors()?
            .iter()
            .map(|b| self.canonical(b).map(|(c, k)| (k, c)))
            .collect::<Result<Vec<_>>>()?;
        out.sort_unstable_by_key(|(k, _)| *k);
        out.dedup_by_key(|(k, _)| *k);
        Ok(out)
    }

    /// Fixed-width base-62 text of a board key.
    pub fn key_text(&self, key: u64) -> Result<String> {
        base62::encode(key, self.constants.num_base62_board_digits)
    }
}
