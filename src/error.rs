//! Errors raised while building, reading or running programs.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The front-end asked for a leaf kind outside `0..=5`.
    #[error("no instruction is defined for arity {arity}")]
    UnsupportedArity { arity: usize },

    /// A loop needs exactly one body.
    #[error("a loop takes exactly one body, got {count}")]
    InvalidLoopArgumentCount { count: usize },

    #[error("input exhausted while reading into cell {cursor}")]
    InputExhausted { cursor: i64 },

    #[error("step limit of {limit} exceeded")]
    StepLimitExceeded { limit: usize },

    #[error("unmatched `[` at offset {offset}")]
    UnmatchedOpen { offset: usize },

    #[error("unmatched `]` at offset {offset}")]
    UnmatchedClose { offset: usize },

    #[error("i/o port failure: {0}")]
    Io(#[from] std::io::Error),
}
