#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod types;
pub mod rules;
pub mod base62;
pub mod column;
pub mod board;
pub mod symmetry;
pub mod game;

pub mod engine {
    pub mod apply;
    pub mod score;
}

pub mod persist;
pub mod persist_stream;
pub mod session;
pub mod solver;

// Re-exports: stable minimal API surface for external callers
pub use crate::board::Board;
pub use crate::column::ColumnEncoder;
pub use crate::engine::apply::{drop_chip, play_moves};
pub use crate::engine::score::Score;
pub use crate::error::{Error, Result};
pub use crate::game::Game;
pub use crate::persist_stream::{EdgeRecord, NodeRecord};
pub use crate::rules::{Constants, Rules};
pub use crate::symmetry::{Normalizer, Permutation};
pub use crate::types::{Outcome, Player};
