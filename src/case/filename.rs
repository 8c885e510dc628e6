//! Filename codec for the on-disk case layout.
//!
//! Pure functions, no I/O. The layout uses structured names:
//! - `report.json` — reference report
//! - `image_<n>.jpg|jpeg|png` — study images, `n` picks the display image
//! - `<model>_predict.json` — one predicted report per model
//! - `<model>_review_<reviewer>_<version>.json` — one scoring record,
//!   optionally prefixed with `subject_<id>_study_<id>_` (older deployments
//!   emitted the prefixed form from the download flow; both are accepted).
//!
//! The codec does not sanitize: callers supply identifiers that do not
//! contain the literal `_review_` separator.

use regex::Regex;

/// The literal separator between model name and reviewer/version tail.
const REVIEW_SEPARATOR: &str = "_review_";

/// A decoded review filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewName {
    pub model: String,
    pub reviewer: String,
    pub version: u32,
}

/// Build `<model>_review_<reviewer>_<version>.json`.
pub fn review_file_name(model: &str, reviewer: &str, version: u32) -> String {
    format!("{model}{REVIEW_SEPARATOR}{reviewer}_{version}.json")
}

/// Build the subject/study-prefixed variant used by the download flow:
/// `subject_<sid>_study_<stid>_<model>_review_<reviewer>_<version>.json`.
pub fn prefixed_review_file_name(
    subject_id: &str,
    study_id: &str,
    model: &str,
    reviewer: &str,
    version: u32,
) -> String {
    format!(
        "subject_{subject_id}_study_{study_id}_{}",
        review_file_name(model, reviewer, version)
    )
}

/// Decode a review filename into (model, reviewer, version).
///
/// Accepts both the plain and the subject/study-prefixed form. Returns
/// `None` when the name does not conform (wrong extension, missing
/// separator, non-numeric version); such files are ignored upstream,
/// never treated as errors.
pub fn parse_review_file_name(name: &str) -> Option<ReviewName> {
    let stem = name.strip_suffix(".json")?;
    let stem = strip_subject_study_prefix(stem);

    let sep = stem.rfind(REVIEW_SEPARATOR)?;
    let model = &stem[..sep];
    let tail = &stem[sep + REVIEW_SEPARATOR.len()..];

    // Tail is `<reviewer>_<version>`; the version is the last token.
    let underscore = tail.rfind('_')?;
    let reviewer = &tail[..underscore];
    let version: u32 = tail[underscore + 1..].parse().ok()?;

    if model.is_empty() || reviewer.is_empty() {
        return None;
    }

    Some(ReviewName {
        model: model.to_string(),
        reviewer: reviewer.to_string(),
        version,
    })
}

/// Drop a leading `subject_<id>_study_<id>_` prefix if present.
fn strip_subject_study_prefix(stem: &str) -> &str {
    let prefix = Regex::new(r"^subject_[^_]+_study_[^_]+_").unwrap();
    match prefix.find(stem) {
        Some(m) => &stem[m.end()..],
        None => stem,
    }
}

/// Extract `n` from `image_<n>.<ext>`.
///
/// `None` for names without an embedded index; callers rank those last so a
/// non-conforming file never wins the smallest-index selection (it can still
/// be picked when it is the sole candidate).
pub fn image_index(name: &str) -> Option<u32> {
    let pattern = Regex::new(r"image_(\d+)\.").unwrap();
    pattern
        .captures(name)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Whether a filename is an image candidate for the case display.
pub fn is_image_candidate(name: &str) -> bool {
    name.starts_with("image_")
        && (name.ends_with(".jpg") || name.ends_with(".jpeg") || name.ends_with(".png"))
}

/// Whether a filename holds the reference report.
pub fn is_reference_report(name: &str) -> bool {
    name == "report.json" || name.ends_with("report.json")
}

/// The model name of a `<model>_predict.json` file, or `None`.
pub fn prediction_model_name(name: &str) -> Option<&str> {
    let model = name.strip_suffix("_predict.json")?;
    if model.is_empty() {
        None
    } else {
        Some(model)
    }
}

/// Whether a filename belongs to `model`'s review history
/// (`<model>_review*.json`, either plain or prefixed).
pub fn is_review_for(name: &str, model: &str) -> bool {
    let Some(stem) = name.strip_suffix(".json") else {
        return false;
    };
    let stem = strip_subject_study_prefix(stem);
    stem.strip_prefix(model)
        .is_some_and(|rest| rest.starts_with("_review"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_name_round_trips() {
        let name = review_file_name("chexpert_v2", "alice", 7);
        assert_eq!(name, "chexpert_v2_review_alice_7.json");

        let decoded = parse_review_file_name(&name).unwrap();
        assert_eq!(decoded.model, "chexpert_v2");
        assert_eq!(decoded.reviewer, "alice");
        assert_eq!(decoded.version, 7);
    }

    #[test]
    fn prefixed_review_name_round_trips() {
        let name = prefixed_review_file_name("10", "2", "m1", "bob", 0);
        assert_eq!(name, "subject_10_study_2_m1_review_bob_0.json");

        let decoded = parse_review_file_name(&name).unwrap();
        assert_eq!(decoded.model, "m1");
        assert_eq!(decoded.reviewer, "bob");
        assert_eq!(decoded.version, 0);
    }

    #[test]
    fn version_zero_round_trips() {
        let decoded = parse_review_file_name(&review_file_name("m", "u", 0)).unwrap();
        assert_eq!((decoded.model.as_str(), decoded.reviewer.as_str(), decoded.version), ("m", "u", 0));
    }

    #[test]
    fn non_numeric_version_is_rejected() {
        assert!(parse_review_file_name("m1_review_alice_draft.json").is_none());
        assert!(parse_review_file_name("m1_review_alice_-1.json").is_none());
    }

    #[test]
    fn wrong_extension_is_rejected() {
        assert!(parse_review_file_name("m1_review_alice_0.txt").is_none());
        assert!(parse_review_file_name("m1_review_alice_0").is_none());
    }

    #[test]
    fn missing_separator_is_rejected() {
        assert!(parse_review_file_name("m1_alice_0.json").is_none());
        assert!(parse_review_file_name("_review_alice_0.json").is_none());
    }

    #[test]
    fn image_index_extracts_number() {
        assert_eq!(image_index("image_3.jpg"), Some(3));
        assert_eq!(image_index("image_12.png"), Some(12));
        assert_eq!(image_index("image_front.jpg"), None);
        assert_eq!(image_index("scan_1.jpg"), None);
    }

    #[test]
    fn image_candidates_by_extension() {
        assert!(is_image_candidate("image_1.jpg"));
        assert!(is_image_candidate("image_1.jpeg"));
        assert!(is_image_candidate("image_1.png"));
        assert!(!is_image_candidate("image_1.tiff"));
        assert!(!is_image_candidate("photo_1.jpg"));
    }

    #[test]
    fn reference_report_matches_suffix() {
        assert!(is_reference_report("report.json"));
        assert!(is_reference_report("case_report.json"));
        assert!(!is_reference_report("report.json.bak"));
    }

    #[test]
    fn prediction_model_name_strips_suffix() {
        assert_eq!(prediction_model_name("chexpert_v2_predict.json"), Some("chexpert_v2"));
        assert_eq!(prediction_model_name("_predict.json"), None);
        assert_eq!(prediction_model_name("report.json"), None);
    }

    #[test]
    fn review_membership_accepts_both_forms() {
        assert!(is_review_for("m1_review_alice_0.json", "m1"));
        assert!(is_review_for("subject_10_study_2_m1_review_alice_0.json", "m1"));
        assert!(!is_review_for("m1_review_alice_0.json", "m2"));
        assert!(!is_review_for("m12_review_alice_0.json", "m1"));
        assert!(!is_review_for("m1_predict.json", "m1"));
    }
}
