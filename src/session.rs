//! Interactive play against a solved table: human drops, computer replies,
//! undo and reset. The caller owns the input loop and the table lookup.

use std::io::Write;

use rand::Rng;

use crate::board::Board;
use crate::engine::apply::drop_chip;
use crate::engine::score::Score;
use crate::error::Result;
use crate::game::Game;
use crate::solver::move_order::optimal_moves;
use crate::types::Outcome;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Help,
    Info,
    ComputerMove,
    /// 1-based column as typed.
    Drop(u32),
    Undo,
    Reset,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let word = line.trim().to_ascii_lowercase();
        match word.as_str() {
            "" => Command::Empty,
            "h" | "help" => Command::Help,
            "i" | "info" => Command::Info,
            "m" | "move" => Command::ComputerMove,
            "u" | "undo" => Command::Undo,
            "r" | "reset" => Command::Reset,
            "q" | "quit" => Command::Quit,
            _ => match word.parse::<u32>() {
                Ok(column) => Command::Drop(column),
                Err(_) => Command::Unknown(line.trim().to_string()),
            },
        }
    }
}

/// Score of `board` itself: its trivial outcome if the game is over,
/// otherwise whatever `score_of` holds for its canonical key.
pub fn score_board<F>(game: &Game, board: &Board, score_of: &mut F) -> Result<Score>
where
    F: FnMut(u64) -> Result<Score>,
{
    let trivial = game.trivial_score(board)?;
    if trivial.outcome().is_resolved() {
        return Ok(trivial);
    }
    let (_, key) = game.canonical(board)?;
    score_of(key)
}

/// A game in progress. `history[0]` is the empty board.
#[derive(Debug, Clone)]
pub struct Session<'g> {
    game: &'g Game,
    history: Vec<Board>,
    moves: Vec<u8>,
}

impl<'g> Session<'g> {
    pub fn new(game: &'g Game) -> Self {
        Self {
            game,
            history: vec![game.empty_board()],
            moves: Vec::new(),
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        // history is never empty
        &self.history[self.history.len() - 1]
    }

    /// 0-based columns played so far.
    #[inline]
    pub fn moves(&self) -> &[u8] {
        &self.moves
    }

    fn push(&mut self, column: u8) -> Result<()> {
        let next = drop_chip(self.board(), column)?;
        self.history.push(next);
        self.moves.push(column);
        Ok(())
    }

    /// Board followed by whose turn it is, or how the game ended.
    pub fn write_status<W: Write>(&self, out: &mut W) -> Result<()> {
        let board = self.board();
        writeln!(out, "{board}")?;
        writeln!(out)?;
        let played = self.moves.len();
        match board.trivial_outcome(self.game.rules().connect)? {
            Outcome::AWins => writeln!(out, "Player A has won after {played} moves.")?,
            Outcome::BWins => writeln!(out, "Player B has won after {played} moves.")?,
            Outcome::Draw => writeln!(out, "The game is drawn after {played} moves.")?,
            Outcome::Indeterminate => writeln!(
                out,
                "Move {}; player {} to move.",
                played + 1,
                board.mover()?.to_char()
            )?,
        }
        writeln!(out)?;
        Ok(())
    }

    /// Run one command. Returns `false` once the user asks to quit.
    pub fn execute<W, F, R>(&mut self, command: &Command, score_of: &mut F, rng: &mut R, out: &mut W) -> Result<bool>
    where
        W: Write,
        F: FnMut(u64) -> Result<Score>,
        R: Rng,
    {
        match command {
            Command::Empty => {}
            Command::Help => self.write_help(out)?,
            Command::Info => self.write_info(score_of, out)?,
            Command::ComputerMove => self.computer_move(score_of, rng, out)?,
            Command::Drop(column) => self.human_move(*column, out)?,
            Command::Undo => {
                if self.moves.pop().is_some() {
                    self.history.pop();
                } else {
                    writeln!(out, "No move to undo.\n")?;
                }
            }
            Command::Reset => {
                self.history.truncate(1);
                self.moves.clear();
            }
            Command::Quit => return Ok(false),
            Command::Unknown(text) => writeln!(out, "Unknown command: {text:?}. Type 'help' for help.\n")?,
        }
        Ok(true)
    }

    fn write_help<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Commands:")?;
        writeln!(out)?;
        writeln!(out, "  help, h     Print this help text.")?;
        writeln!(out, "  info, i     Show the score of the board and of every move.")?;
        writeln!(out, "  move, m     Make an optimal computer move.")?;
        writeln!(out, "  1 .. {:<6} Drop a chip in that column.", self.game.rules().width)?;
        writeln!(out, "  undo, u     Undo the last move.")?;
        writeln!(out, "  reset, r    Start again from the empty board.")?;
        writeln!(out, "  quit, q     Quit.")?;
        writeln!(out)?;
        Ok(())
    }

    fn write_info<W, F>(&self, score_of: &mut F, out: &mut W) -> Result<()>
    where
        W: Write,
        F: FnMut(u64) -> Result<Score>,
    {
        let board = self.board();
        let played = if self.moves.is_empty() {
            "none".to_string()
        } else {
            self.moves
                .iter()
                .enumerate()
                .map(|(i, c)| format!("{}: {}{}", i + 1, if i % 2 == 0 { 'A' } else { 'B' }, c + 1))
                .collect::<Vec<_>>()
                .join(", ")
        };
        writeln!(out, "Moves so far ....... : {played}")?;
        let score = score_board(self.game, board, score_of)?;
        writeln!(out, "Current score ...... : {score}")?;
        writeln!(out)?;

        if score.outcome().is_resolved() && score.ply() == 0 {
            return Ok(());
        }
        writeln!(out, "Consequences of the moves that player {} can make:", board.mover()?.to_char())?;
        writeln!(out)?;
        for column in 0..board.width() {
            if board.is_column_full(column) {
                writeln!(out, "  {} : impossible (column full)", column + 1)?;
            } else {
                let child = drop_chip(board, column)?;
                let child_score = score_board(self.game, &child, score_of)?;
                writeln!(out, "  {} : {child_score}", column + 1)?;
            }
        }
        writeln!(out)?;
        Ok(())
    }

    fn computer_move<W, F, R>(&mut self, score_of: &mut F, rng: &mut R, out: &mut W) -> Result<()>
    where
        W: Write,
        F: FnMut(u64) -> Result<Score>,
        R: Rng,
    {
        let Some(choice) = optimal_moves(self.game, self.board(), &mut *score_of)? else {
            writeln!(out, "The game is finished.\n")?;
            return Ok(());
        };
        let column = choice.columns[rng.gen_range(0..choice.columns.len())];
        let listed: Vec<String> = choice.columns.iter().map(|c| (c + 1).to_string()).collect();
        writeln!(
            out,
            "Optimal moves: {}; playing in column {}.\n",
            listed.join(", "),
            column + 1
        )?;
        self.push(column)
    }

    fn human_move<W: Write>(&mut self, column: u32, out: &mut W) -> Result<()> {
        let board = self.board();
        if self.game.trivial_score(board)?.outcome().is_resolved() {
            writeln!(out, "The game is finished.\n")?;
            return Ok(());
        }
        let Some(column) = column
            .checked_sub(1)
            .and_then(|c| u8::try_from(c).ok())
            .filter(|&c| c < board.width())
        else {
            writeln!(out, "The selected column is invalid.\n")?;
            return Ok(());
        };
        if board.is_column_full(column) {
            writeln!(out, "The selected column is full.\n")?;
            return Ok(());
        }
        self.push(column)
    }
}
