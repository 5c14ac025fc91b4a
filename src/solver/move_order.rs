use std::cmp::Ordering;

use crate::board::Board;
use crate::engine::apply::drop_chip;
use crate::engine::score::Score;
use crate::error::Result;
use crate::game::Game;
use crate::types::{Outcome, Player};

/// Best drops from a position and the score they lead to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveChoice {
    /// 0-based columns, ascending.
    pub columns: Vec<u8>,
    /// Score of the position after any of `columns` is played.
    pub child_score: Score,
}

/// Ranking of a child score from the mover's side. Greater is better.
/// Within a win the fastest ranks highest; otherwise the longest game does.
fn rank(mover: Player, score: Score) -> (u8, i16) {
    let ply = i16::from(score.ply());
    match score.outcome() {
        o if o.is_win_for(mover) => (3, -ply),
        Outcome::Draw => (2, ply),
        Outcome::Indeterminate => (0, 0),
        _ => (1, ply),
    }
}

/// Score every legal drop and keep the best ones.
///
/// Children that end the game are scored directly; otherwise `score_of` is
/// asked for the canonical key of the child. Returns `None` when the game is
/// already over.
pub fn optimal_moves<F>(game: &Game, board: &Board, mut score_of: F) -> Result<Option<MoveChoice>>
where
    F: FnMut(u64) -> Result<Score>,
{
    if game.trivial_score(board)?.outcome().is_resolved() {
        return Ok(None);
    }
    let mover = board.mover()?;

    let mut best: Option<MoveChoice> = None;
    for column in 0..board.width() {
        if board.is_column_full(column) {
            continue;
        }
        let child = drop_chip(board, column)?;
        let trivial = game.trivial_score(&child)?;
        let score = if trivial.outcome().is_resolved() {
            trivial
        } else {
            let (_, key) = game.canonical(&child)?;
            score_of(key)?
        };

        let order = match &best {
            None => Ordering::Greater,
            Some(choice) => rank(mover, score).cmp(&rank(mover, choice.child_score)),
        };
        match order {
            Ordering::Greater => {
                best = Some(MoveChoice {
                    columns: vec![column],
                    child_score: score,
                });
            }
            Ordering::Equal => {
                if let Some(choice) = best.as_mut() {
                    choice.columns.push(column);
                }
            }
            Ordering::Less => {}
        }
    }
    Ok(best)
}
