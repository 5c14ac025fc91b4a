//! Error type shared by the codecs, the board model and the stream passes.
//!
//! Every variant is fatal: it means either corrupted persisted data or a
//! violated pass-ordering precondition. Nothing here is retried.

use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid rules: {message}")]
    InvalidRules { message: String },

    #[error("ternary value {ternary} is not a legal column")]
    InvalidColumn { ternary: u32 },

    #[error("index {index} out of range (count = {count})")]
    IndexOutOfRange { index: u64, count: u64 },

    #[error("impossible board: A has {a_count} stones, B has {b_count}")]
    InconsistentMover { a_count: u32, b_count: u32 },

    #[error("both players have a winning run on the same board")]
    MultipleWinners,

    #[error("column {column} is full")]
    ColumnFull { column: u8 },

    #[error("edge destination {destination} has no score record")]
    UnresolvedDestination { destination: u64 },

    #[error("score record for board {board} has no incoming edge")]
    UnreferencedScore { board: u64 },

    #[error("board {board}: draw children disagree on ply ({first} vs {second})")]
    InconsistentDrawPly { board: u64, first: u8, second: u8 },

    #[error("board {board} is indeterminate but has no child scores")]
    MissingChildScores { board: u64 },

    #[error("child score for source board {board} has no matching node")]
    OrphanChildScore { board: u64 },

    #[error("{stream} stream is not sorted: key {current} follows {previous}")]
    UnsortedStream {
        stream: &'static str,
        previous: u64,
        current: u64,
    },

    #[error("invalid character {character:?} for {context}")]
    InvalidCharacter { character: char, context: &'static str },

    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("value {value} does not fit in {digits} digits")]
    ValueTooLarge { value: u64, digits: usize },

    #[error("ply {ply} exceeds the 6-bit score field")]
    PlyOutOfRange { ply: u32 },

    #[error("board {board} has an indeterminate score where a resolved one is required")]
    UnexpectedIndeterminate { board: u64 },

    #[error("truncated binary record: expected {expected} bytes, got {got}")]
    TruncatedRecord { expected: usize, got: usize },

    #[error("board {board} not found in lookup table")]
    NotFound { board: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
