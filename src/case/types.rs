//! Typed records for one patient study.
//!
//! Everything the loader produces is an explicit struct — missing JSON
//! fields default rather than fail, because upstream export pipelines are
//! inconsistent about which keys they emit.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use super::filename::ReviewName;

// ---------------------------------------------------------------------------
// Reference report & predictions
// ---------------------------------------------------------------------------

/// Subject/study ids appear as strings or bare numbers depending on the
/// exporting pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum IdValue {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for IdValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// The reference read for the study (`report.json`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReferenceReport {
    #[serde(default)]
    pub subject_id: Option<IdValue>,
    #[serde(default)]
    pub study_id: Option<IdValue>,
    #[serde(default)]
    pub findings: String,
    #[serde(default)]
    pub impression: String,
}

/// One model's predicted report (`<model>_predict.json`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Prediction {
    #[serde(default)]
    pub findings: String,
    #[serde(default)]
    pub impression: String,
}

// ---------------------------------------------------------------------------
// Image
// ---------------------------------------------------------------------------

/// Backing storage for the display image.
#[derive(Debug, Clone)]
pub enum ImageData {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// Handle to the one image selected for display (smallest embedded index).
#[derive(Debug, Clone)]
pub struct ImageRef {
    pub file_name: String,
    /// Index decoded from `image_<n>.<ext>`, if the name conforms.
    pub index: Option<u32>,
    pub data: ImageData,
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// One scoring record as persisted to JSON. Immutable once written;
/// corrections are a new record with a higher `review_number`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Review {
    #[serde(default)]
    pub model_name: String,
    #[serde(default)]
    pub peer_score: u8,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub case_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub review_number: u32,
}

/// A discovered review file, kept for the audit trail. Ordering across
/// storage backends is not guaranteed to be chronological.
#[derive(Debug, Clone)]
pub struct ReviewFileRef {
    pub file_name: String,
    /// The decoded (model, reviewer, version) triple; `None` for
    /// non-conforming names that still match the history pattern.
    pub decoded: Option<ReviewName>,
    /// Last-modified time, directory backends only.
    pub modified: Option<SystemTime>,
}

// ---------------------------------------------------------------------------
// Case aggregate
// ---------------------------------------------------------------------------

/// One patient study: the aggregate the presentation layer renders.
#[derive(Debug, Default)]
pub struct Case {
    /// `subject_<sid>_study_<stid>` when the reference report has both ids,
    /// else the source folder/bundle name, else `"unknown_case"`. Stable
    /// for the session; the join key across predictions and reviews.
    pub case_id: String,
    pub reference_report: Option<ReferenceReport>,
    pub image: Option<ImageRef>,
    /// Model name → predicted report.
    pub predictions: BTreeMap<String, Prediction>,
    /// Model name → the resolved latest review, for UI pre-fill.
    pub reviews: BTreeMap<String, Review>,
    /// Model name → every discovered review file, for auditing.
    pub review_history: BTreeMap<String, Vec<ReviewFileRef>>,
}

impl Case {
    /// Whether any review exists for the model (the status badge).
    pub fn is_reviewed(&self, model: &str) -> bool {
        self.reviews.contains_key(model)
    }

    /// Subject/study ids recovered from the case id, when it has the
    /// `subject_<sid>_study_<stid>` shape. Used for the prefixed download
    /// filename when the reference report lacks the ids.
    pub fn subject_study_ids(&self) -> Option<(String, String)> {
        parse_case_id(&self.case_id)
    }
}

/// Split `subject_<sid>_study_<stid>` back into its ids.
pub fn parse_case_id(case_id: &str) -> Option<(String, String)> {
    let rest = case_id.strip_prefix("subject_")?;
    let (subject, study) = rest.split_once("_study_")?;
    if subject.is_empty() || study.is_empty() {
        return None;
    }
    Some((subject.to_string(), study.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_value_accepts_string_or_number() {
        let report: ReferenceReport =
            serde_json::from_str(r#"{"subject_id": "10", "study_id": 2}"#).unwrap();
        assert_eq!(report.subject_id.unwrap().to_string(), "10");
        assert_eq!(report.study_id.unwrap().to_string(), "2");
    }

    #[test]
    fn report_fields_default_to_empty() {
        let report: ReferenceReport = serde_json::from_str("{}").unwrap();
        assert!(report.subject_id.is_none());
        assert!(report.findings.is_empty());
        assert!(report.impression.is_empty());
    }

    #[test]
    fn review_tolerates_missing_fields() {
        let review: Review = serde_json::from_str(r#"{"peer_score": 4}"#).unwrap();
        assert_eq!(review.peer_score, 4);
        assert_eq!(review.review_number, 0);
        assert!(review.username.is_empty());
    }

    #[test]
    fn case_id_round_trips() {
        assert_eq!(
            parse_case_id("subject_10_study_2"),
            Some(("10".to_string(), "2".to_string()))
        );
        assert_eq!(parse_case_id("some_folder"), None);
        assert_eq!(parse_case_id("subject__study_2"), None);
    }
}
