//! Reviewer session state.
//!
//! One `ReviewSession` per UI session replaces the original tool's global
//! "current case" state: every handler receives the session explicitly.
//! It owns the active case, the reviewer identity, and — for uploaded
//! bundles — a scratch directory that stages the uploaded bytes and
//! receives written reviews. The scratch area is private to the session
//! and is removed when the case is replaced or the session is dropped.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use uuid::Uuid;

use crate::case::filename::parse_review_file_name;
use crate::case::{
    load_case, BundleFile, Case, CaseError, CaseSource, LoadedCase, ParseFailure, ReviewFileRef,
};
use crate::review::{write_review, ReviewDraft, ReviewError, WrittenReview};

/// Whether a model has at least one stored review for the current case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Processed,
    Unprocessed,
}

struct ActiveCase {
    loaded: LoadedCase,
    /// Where submitted reviews land: the case directory, or the scratch
    /// directory for bundle-backed cases.
    write_dir: PathBuf,
    /// Staged bundle bytes; removal on drop cleans the scratch area.
    _scratch: Option<TempDir>,
}

/// Session state for one reviewer working one case at a time.
pub struct ReviewSession {
    id: Uuid,
    reviewer_id: Option<String>,
    active: Option<ActiveCase>,
}

impl ReviewSession {
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(session = %id, "Review session created");
        Self {
            id,
            reviewer_id: None,
            active: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    // ── Reviewer identity ────────────────────────────────

    pub fn reviewer_id(&self) -> Option<&str> {
        self.reviewer_id.as_deref()
    }

    /// Set the active reviewer. Whitespace is trimmed; a blank id clears
    /// the reviewer, which blocks scoring until one is set again.
    pub fn set_reviewer(&mut self, reviewer_id: &str) {
        let trimmed = reviewer_id.trim();
        self.reviewer_id = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    // ── Case lifecycle ───────────────────────────────────

    /// Load a directory-backed case, replacing the current one (and
    /// releasing any previous bundle scratch).
    pub fn load_directory(&mut self, path: impl Into<PathBuf>) -> Result<(), CaseError> {
        let path = path.into();
        let source = CaseSource::directory(&path);
        let loaded = load_case(&source)?;
        self.active = Some(ActiveCase {
            loaded,
            write_dir: path,
            _scratch: None,
        });
        Ok(())
    }

    /// Load an uploaded bundle, staging its bytes into a fresh scratch
    /// directory. Submitted reviews for bundle cases are written there,
    /// where the presentation layer can offer them as downloads.
    pub fn load_bundle(&mut self, label: &str, files: Vec<BundleFile>) -> Result<(), CaseError> {
        let scratch = TempDir::new()?;
        for file in &files {
            std::fs::write(scratch.path().join(&file.name), &file.bytes)?;
        }
        tracing::debug!(
            session = %self.id,
            files = files.len(),
            scratch = %scratch.path().display(),
            "Bundle staged"
        );

        let source = CaseSource::bundle(label, files);
        let loaded = load_case(&source)?;
        self.active = Some(ActiveCase {
            loaded,
            write_dir: scratch.path().to_path_buf(),
            _scratch: Some(scratch),
        });
        Ok(())
    }

    /// Discard the current case, releasing any scratch storage.
    pub fn clear_case(&mut self) {
        self.active = None;
    }

    pub fn case(&self) -> Option<&Case> {
        self.active.as_ref().map(|a| &a.loaded.case)
    }

    /// Parse failures collected while loading the current case, so the UI
    /// can report which sub-resource broke rather than an opaque error.
    pub fn parse_failures(&self) -> &[ParseFailure] {
        self.active
            .as_ref()
            .map(|a| a.loaded.failures.as_slice())
            .unwrap_or(&[])
    }

    /// Where submitted reviews are written for the current case.
    pub fn write_dir(&self) -> Option<&Path> {
        self.active.as_ref().map(|a| a.write_dir.as_path())
    }

    pub fn review_status(&self, model: &str) -> ReviewStatus {
        match self.case() {
            Some(case) if case.is_reviewed(model) => ReviewStatus::Processed,
            _ => ReviewStatus::Unprocessed,
        }
    }

    // ── Scoring ──────────────────────────────────────────

    /// Submit a score for `model` on the current case: validates, writes
    /// the versioned review record, and updates the in-memory case so the
    /// UI pre-fills from the new record immediately.
    pub fn submit_score(&mut self, model: &str, score: u8) -> Result<WrittenReview, ReviewError> {
        let reviewer = self.reviewer_id.clone().ok_or(ReviewError::EmptyReviewer)?;
        let active = self.active.as_mut().ok_or(ReviewError::NoCase)?;
        if !active.loaded.case.predictions.contains_key(model) {
            return Err(ReviewError::UnknownModel(model.to_string()));
        }

        let draft = ReviewDraft {
            model_name: model.to_string(),
            reviewer_id: reviewer,
            score,
            case_id: active.loaded.case.case_id.clone(),
        };
        let written = write_review(&active.write_dir, &draft)?;

        let file_name = written
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        active
            .loaded
            .case
            .reviews
            .insert(model.to_string(), written.review.clone());
        active
            .loaded
            .case
            .review_history
            .entry(model.to_string())
            .or_default()
            .push(ReviewFileRef {
                decoded: parse_review_file_name(&file_name),
                modified: std::fs::metadata(&written.path)
                    .and_then(|m| m.modified())
                    .ok(),
                file_name,
            });

        Ok(written)
    }
}

impl Default for ReviewSession {
    fn default() -> Self {
        Self::new()
    }
}
