//! Case resolution: parsing one patient study (image + reference report +
//! model predictions + review history) out of a folder or an uploaded bundle.

pub mod filename;
pub mod loader;
pub mod source;
pub mod types;

pub use loader::*;
pub use source::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaseError {
    #[error("Case location not found: {0}")]
    NotFound(String),

    #[error("No such entry in bundle: {0}")]
    MissingEntry(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One file that existed but could not be parsed. Collected, never fatal:
/// a corrupt prediction for one model must not block review of the others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub file_name: String,
    pub detail: String,
}

impl std::fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.file_name, self.detail)
    }
}
