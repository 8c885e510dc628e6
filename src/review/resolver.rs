//! Latest-review resolution.
//!
//! Picks the one stored review per model that pre-fills the scoring UI.
//! The choice is advisory: version allocation always re-scans the target
//! directory at write time and never trusts the resolved review.
//!
//! The policy is pluggable because "latest" has two historical readings:
//! modification time (directory backends) and filename order (uploaded
//! bundles, which carry no timestamps). Both are approximations; the
//! canonical policy ranks by the version number embedded in the filename,
//! which is the same notion of "latest" the allocator uses.

use crate::case::ReviewFileRef;

/// How to rank review files when picking the latest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Freshness {
    /// Greatest decoded version wins; undecodable names rank last.
    /// Canonical: agrees with the version allocator even when files were
    /// restored from backup with shuffled modification times.
    #[default]
    VersionNumber,
    /// Greatest last-modified time wins. Approximation for directory
    /// backends with coarse mtime resolution; entries without an mtime
    /// rank last.
    ModifiedTime,
    /// Greatest file name (lexicographic) wins. Approximation for bundle
    /// backends; version numbers are not zero-padded, so `_10` sorts
    /// below `_9`.
    FileName,
}

/// Pick the latest review file under `policy`. Ties always break to the
/// lexicographically greatest file name, so the result is independent of
/// enumeration order. Empty set yields `None`.
pub fn resolve_latest(refs: &[ReviewFileRef], policy: Freshness) -> Option<&ReviewFileRef> {
    match policy {
        Freshness::VersionNumber => refs
            .iter()
            .max_by_key(|r| (r.decoded.as_ref().map(|d| d.version), &r.file_name)),
        Freshness::ModifiedTime => refs.iter().max_by_key(|r| (r.modified, &r.file_name)),
        Freshness::FileName => refs.iter().max_by_key(|r| &r.file_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::filename::parse_review_file_name;
    use std::time::{Duration, SystemTime};

    fn file_ref(name: &str, modified: Option<SystemTime>) -> ReviewFileRef {
        ReviewFileRef {
            file_name: name.to_string(),
            decoded: parse_review_file_name(name),
            modified,
        }
    }

    #[test]
    fn empty_set_has_no_latest() {
        assert!(resolve_latest(&[], Freshness::VersionNumber).is_none());
    }

    #[test]
    fn version_number_beats_modification_time() {
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        // Restored from backup: version 0 has the newer mtime.
        let refs = vec![
            file_ref("m1_review_alice_0.json", Some(base + Duration::from_secs(60))),
            file_ref("m1_review_alice_3.json", Some(base)),
        ];
        let latest = resolve_latest(&refs, Freshness::VersionNumber).unwrap();
        assert_eq!(latest.file_name, "m1_review_alice_3.json");
    }

    #[test]
    fn version_ranking_is_numeric_not_lexicographic() {
        let refs = vec![
            file_ref("m1_review_alice_9.json", None),
            file_ref("m1_review_alice_10.json", None),
        ];
        let latest = resolve_latest(&refs, Freshness::VersionNumber).unwrap();
        assert_eq!(latest.file_name, "m1_review_alice_10.json");
    }

    #[test]
    fn undecodable_names_rank_last() {
        let refs = vec![
            file_ref("m1_review_notes.json", None),
            file_ref("m1_review_alice_0.json", None),
        ];
        let latest = resolve_latest(&refs, Freshness::VersionNumber).unwrap();
        assert_eq!(latest.file_name, "m1_review_alice_0.json");
    }

    #[test]
    fn modified_time_policy_uses_mtime_with_name_tiebreak() {
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let refs = vec![
            file_ref("m1_review_alice_3.json", Some(base)),
            file_ref("m1_review_alice_0.json", Some(base + Duration::from_secs(60))),
        ];
        let latest = resolve_latest(&refs, Freshness::ModifiedTime).unwrap();
        assert_eq!(latest.file_name, "m1_review_alice_0.json");

        // Coarse clocks: identical mtimes fall back to the greater name.
        let refs = vec![
            file_ref("m1_review_alice_0.json", Some(base)),
            file_ref("m1_review_alice_1.json", Some(base)),
        ];
        let latest = resolve_latest(&refs, Freshness::ModifiedTime).unwrap();
        assert_eq!(latest.file_name, "m1_review_alice_1.json");
    }

    #[test]
    fn file_name_policy_is_lexicographic() {
        let refs = vec![
            file_ref("m1_review_alice_1.json", None),
            file_ref("m1_review_bob_0.json", None),
        ];
        let latest = resolve_latest(&refs, Freshness::FileName).unwrap();
        assert_eq!(latest.file_name, "m1_review_bob_0.json");
    }

    #[test]
    fn result_is_enumeration_order_independent() {
        let mut refs = vec![
            file_ref("m1_review_alice_2.json", None),
            file_ref("m1_review_alice_0.json", None),
            file_ref("m1_review_alice_1.json", None),
        ];
        let forward = resolve_latest(&refs, Freshness::VersionNumber)
            .unwrap()
            .file_name
            .clone();
        refs.reverse();
        let backward = resolve_latest(&refs, Freshness::VersionNumber)
            .unwrap()
            .file_name
            .clone();
        assert_eq!(forward, backward);
        assert_eq!(forward, "m1_review_alice_2.json");
    }
}
