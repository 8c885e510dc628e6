//! Case loader: turn a [`CaseSource`] into a [`Case`].
//!
//! Per-file parse failures are collected, not fatal — one corrupt model
//! prediction must not block review of the others. Only a missing location
//! aborts the load.

use serde_json::from_slice;

use super::filename;
use super::{Case, CaseError, CaseSource, ParseFailure};
use super::{ImageData, ImageRef, Prediction, ReferenceReport, Review, ReviewFileRef};
use crate::review::resolver::{resolve_latest, Freshness};

/// Fallback case id when neither the report nor the source yields a name.
pub const UNKNOWN_CASE: &str = "unknown_case";

/// A loaded case plus everything that failed to parse along the way, so
/// the presentation layer can name the specific sub-resource that broke.
#[derive(Debug)]
pub struct LoadedCase {
    pub case: Case,
    pub failures: Vec<ParseFailure>,
}

/// Load a case with the canonical freshness policy (version number).
pub fn load_case(source: &CaseSource) -> Result<LoadedCase, CaseError> {
    load_case_with(source, Freshness::VersionNumber)
}

/// Load a case, resolving each model's latest review with `freshness`.
pub fn load_case_with(source: &CaseSource, freshness: Freshness) -> Result<LoadedCase, CaseError> {
    if !source.exists() {
        return Err(CaseError::NotFound(source.describe()));
    }

    let names = source.entry_names()?;
    let mut failures = Vec::new();

    let reference_report = load_reference_report(source, &names, &mut failures);
    let case_id = derive_case_id(reference_report.as_ref(), source);
    let image = select_image(source, &names);
    let predictions = load_predictions(source, &names, &mut failures);

    let mut reviews = std::collections::BTreeMap::new();
    let mut review_history = std::collections::BTreeMap::new();
    for model in predictions.keys() {
        let refs = collect_review_refs(source, &names, model);
        if let Some(latest) = resolve_latest(&refs, freshness) {
            match read_review(source, &latest.file_name) {
                Ok(review) => {
                    reviews.insert(model.clone(), review);
                }
                Err(failure) => failures.push(failure),
            }
        }
        review_history.insert(model.clone(), refs);
    }

    tracing::debug!(
        case_id = %case_id,
        models = predictions.len(),
        has_image = image.is_some(),
        parse_failures = failures.len(),
        "Case loaded"
    );

    Ok(LoadedCase {
        case: Case {
            case_id,
            reference_report,
            image,
            predictions,
            reviews,
            review_history,
        },
        failures,
    })
}

fn load_reference_report(
    source: &CaseSource,
    names: &[String],
    failures: &mut Vec<ParseFailure>,
) -> Option<ReferenceReport> {
    let name = names.iter().find(|n| filename::is_reference_report(n))?;
    match source.read(name).map_err(|e| e.to_string()).and_then(|bytes| {
        from_slice::<ReferenceReport>(&bytes).map_err(|e| e.to_string())
    }) {
        Ok(report) => Some(report),
        Err(detail) => {
            failures.push(ParseFailure {
                file_name: name.clone(),
                detail,
            });
            None
        }
    }
}

/// `subject_<sid>_study_<stid>` when both ids are present, else the source
/// name, else [`UNKNOWN_CASE`].
fn derive_case_id(report: Option<&ReferenceReport>, source: &CaseSource) -> String {
    if let Some(report) = report {
        if let (Some(subject), Some(study)) = (&report.subject_id, &report.study_id) {
            return format!("subject_{subject}_study_{study}");
        }
    }
    source
        .display_name()
        .unwrap_or_else(|| UNKNOWN_CASE.to_string())
}

/// Pick the image with the numerically smallest embedded index. Indexless
/// candidates rank last (they win only as the sole match); ties go to the
/// first-enumerated name.
fn select_image(source: &CaseSource, names: &[String]) -> Option<ImageRef> {
    let name = names
        .iter()
        .filter(|n| filename::is_image_candidate(n))
        .min_by_key(|n| filename::image_index(n).map_or(u64::MAX, u64::from))?;

    let data = match source {
        CaseSource::Directory(dir) => ImageData::Path(dir.join(name)),
        CaseSource::Bundle { .. } => ImageData::Bytes(source.read(name).ok()?),
    };

    Some(ImageRef {
        file_name: name.clone(),
        index: filename::image_index(name),
        data,
    })
}

fn load_predictions(
    source: &CaseSource,
    names: &[String],
    failures: &mut Vec<ParseFailure>,
) -> std::collections::BTreeMap<String, Prediction> {
    let mut predictions = std::collections::BTreeMap::new();
    for name in names {
        let Some(model) = filename::prediction_model_name(name) else {
            continue;
        };
        match source.read(name).map_err(|e| e.to_string()).and_then(|bytes| {
            from_slice::<Prediction>(&bytes).map_err(|e| e.to_string())
        }) {
            Ok(prediction) => {
                predictions.insert(model.to_string(), prediction);
            }
            Err(detail) => {
                tracing::warn!(file = %name, %detail, "Skipping unreadable prediction");
                failures.push(ParseFailure {
                    file_name: name.clone(),
                    detail,
                });
            }
        }
    }
    predictions
}

fn collect_review_refs(source: &CaseSource, names: &[String], model: &str) -> Vec<ReviewFileRef> {
    names
        .iter()
        .filter(|n| filename::is_review_for(n, model))
        .map(|n| ReviewFileRef {
            file_name: n.clone(),
            decoded: filename::parse_review_file_name(n),
            modified: source.modified(n),
        })
        .collect()
}

fn read_review(source: &CaseSource, name: &str) -> Result<Review, ParseFailure> {
    source
        .read(name)
        .map_err(|e| e.to_string())
        .and_then(|bytes| from_slice::<Review>(&bytes).map_err(|e| e.to_string()))
        .map_err(|detail| ParseFailure {
            file_name: name.to_string(),
            detail,
        })
}
