//! Version allocation for review files.
//!
//! Versions are scoped per (directory, model, reviewer): distinct reviewer
//! ids live in disjoint filename namespaces and can never collide. Every
//! allocation is a full re-scan of the directory — no cached counter — so
//! the sequence stays monotonic across process restarts and external file
//! manipulation. Two processes sharing one reviewer id inside the same
//! scan-window can still race; that is an accepted limitation, not masked
//! by locking.

use std::path::Path;

use super::ReviewError;
use crate::case::filename::parse_review_file_name;

/// Next free version for (model, reviewer) at `dir`: `max + 1` over the
/// decodable existing files, or `0` when there are none. Filenames that do
/// not decode are skipped, never fatal.
pub fn next_version(dir: &Path, model: &str, reviewer: &str) -> Result<u32, ReviewError> {
    if !dir.is_dir() {
        return Ok(0);
    }

    let mut max: Option<u32> = None;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(decoded) = parse_review_file_name(&name.to_string_lossy()) else {
            continue;
        };
        if decoded.model == model && decoded.reviewer == reviewer {
            max = Some(max.map_or(decoded.version, |m| m.max(decoded.version)));
        }
    }

    Ok(max.map_or(0, |m| m + 1))
}
