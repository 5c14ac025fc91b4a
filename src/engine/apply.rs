use crate::board::Board;
use crate::error::{Error, Result};
use crate::rules::Rules;

/// Drop the mover's chip into column `column` (0-based).
pub fn drop_chip(board: &Board, column: u8) -> Result<Board> {
    if column >= board.width() {
        return Err(Error::IndexOutOfRange {
            index: u64::from(column),
            count: u64::from(board.width()),
        });
    }
    let mover = board.mover()?;
    let y = board.landing_row(column).ok_or(Error::ColumnFull { column })?;
    let mut next = *board;
    next.set(column, y, mover);
    Ok(next)
}

/// Replay a string of 1-based column digits (e.g. `"4453"`) from the empty board.
///
/// Play stops being legal once a player has a connect-Q run; moves after that
/// are rejected.
pub fn play_moves(rules: &Rules, moves: &str) -> Result<Board> {
    let mut board = Board::empty(rules)?;
    for c in moves.chars().filter(|c| !c.is_whitespace()) {
        let column = c
            .to_digit(10)
            .and_then(|d| u8::try_from(d).ok())
            .filter(|&d| d >= 1 && d <= rules.width)
            .ok_or(Error::InvalidCharacter {
                character: c,
                context: "column move",
            })?;
        if board.trivial_outcome(rules.connect)?.is_resolved() {
            return Err(Error::MalformedRecord {
                line: 0,
                reason: format!("move {c} played after the game ended"),
            });
        }
        board = drop_chip(&board, column - 1)?;
    }
    Ok(board)
}
