//! Persisting new scoring records.
//!
//! A written review is immutable: corrections are a new file with a higher
//! version, never an edit. The allocator's monotonic guarantee means the
//! writer never overwrites an existing file.

use std::path::{Path, PathBuf};

use chrono::Utc;

use super::version::next_version;
use super::{ReviewError, MAX_SCORE};
use crate::case::filename::review_file_name;
use crate::case::Review;

/// A score submission before validation and version assignment.
#[derive(Debug, Clone)]
pub struct ReviewDraft {
    pub model_name: String,
    pub reviewer_id: String,
    /// 0..=5 inclusive.
    pub score: u8,
    /// Case provenance, stored as `case_name` in the record.
    pub case_id: String,
}

/// The outcome of a successful write.
#[derive(Debug, Clone)]
pub struct WrittenReview {
    pub path: PathBuf,
    pub review: Review,
}

/// Validate `draft`, allocate the next version for its (model, reviewer)
/// pair at `dir`, and persist the record as pretty UTF-8 JSON.
///
/// The caller owns updating any in-memory `Case` with the returned review;
/// the writer touches only the filesystem.
pub fn write_review(dir: &Path, draft: &ReviewDraft) -> Result<WrittenReview, ReviewError> {
    let reviewer = draft.reviewer_id.trim();
    if reviewer.is_empty() {
        return Err(ReviewError::EmptyReviewer);
    }
    if draft.score > MAX_SCORE {
        return Err(ReviewError::ScoreOutOfRange(draft.score));
    }

    std::fs::create_dir_all(dir)?;

    let version = next_version(dir, &draft.model_name, reviewer)?;
    let review = Review {
        model_name: draft.model_name.clone(),
        peer_score: draft.score,
        timestamp: Utc::now().to_rfc3339(),
        case_name: draft.case_id.clone(),
        username: reviewer.to_string(),
        review_number: version,
    };

    let path = dir.join(review_file_name(&draft.model_name, reviewer, version));
    let body = serde_json::to_string_pretty(&review)?;
    std::fs::write(&path, body)?;

    tracing::info!(
        model = %draft.model_name,
        reviewer = %reviewer,
        version,
        case_id = %draft.case_id,
        "Review written"
    );

    Ok(WrittenReview { path, review })
}
