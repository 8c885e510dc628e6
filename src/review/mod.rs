//! The review write path: resolving the latest stored review, allocating
//! version numbers, and persisting new scoring records.

pub mod resolver;
pub mod version;
pub mod writer;

pub use resolver::*;
pub use version::*;
pub use writer::*;

use thiserror::Error;

/// Highest allowed score on the 0–5 scale.
pub const MAX_SCORE: u8 = 5;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Reviewer id must not be empty")]
    EmptyReviewer,

    #[error("Score {0} is out of range (0-{MAX_SCORE})")]
    ScoreOutOfRange(u8),

    #[error("No prediction for model: {0}")]
    UnknownModel(String),

    #[error("No case is loaded")]
    NoCase,

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
