//! Case location backends.
//!
//! A case can live in a real folder on disk or arrive as a flat set of
//! uploaded (name, bytes) pairs. Both expose the same operations so the
//! loader stays backend-agnostic; only modification times are
//! directory-only (uploads carry no trustworthy timestamps).

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::CaseError;

/// One uploaded file of a bundle-backed case.
#[derive(Debug, Clone)]
pub struct BundleFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl BundleFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Where a case's files come from.
#[derive(Debug)]
pub enum CaseSource {
    /// A folder on disk containing the case files.
    Directory(PathBuf),
    /// A flat uploaded collection; enumeration order is upload order.
    Bundle { label: String, files: Vec<BundleFile> },
}

impl CaseSource {
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::Directory(path.into())
    }

    pub fn bundle(label: impl Into<String>, files: Vec<BundleFile>) -> Self {
        Self::Bundle {
            label: label.into(),
            files,
        }
    }

    /// Whether the location exists at all. A bundle always does.
    pub fn exists(&self) -> bool {
        match self {
            Self::Directory(path) => path.is_dir(),
            Self::Bundle { .. } => true,
        }
    }

    /// The location's own name, used as the case-id fallback when the
    /// reference report carries no subject/study ids.
    pub fn display_name(&self) -> Option<String> {
        match self {
            Self::Directory(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned()),
            Self::Bundle { label, .. } => {
                if label.trim().is_empty() {
                    None
                } else {
                    Some(label.clone())
                }
            }
        }
    }

    /// A human-readable description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Directory(path) => path.display().to_string(),
            Self::Bundle { label, files } => {
                format!("bundle '{}' ({} files)", label, files.len())
            }
        }
    }

    /// The backing directory, when there is one to write reviews into.
    pub fn dir_path(&self) -> Option<&Path> {
        match self {
            Self::Directory(path) => Some(path),
            Self::Bundle { .. } => None,
        }
    }

    /// Enumerate entry names. Directory entries are sorted by name so the
    /// selection tie-breaks are stable across platforms; bundle entries
    /// keep their upload order.
    pub fn entry_names(&self) -> Result<Vec<String>, CaseError> {
        match self {
            Self::Directory(path) => {
                let mut names = Vec::new();
                for entry in std::fs::read_dir(path)? {
                    let entry = entry?;
                    if entry.path().is_file() {
                        names.push(entry.file_name().to_string_lossy().into_owned());
                    }
                }
                names.sort();
                Ok(names)
            }
            Self::Bundle { files, .. } => Ok(files.iter().map(|f| f.name.clone()).collect()),
        }
    }

    /// Read the bytes of one named entry.
    pub fn read(&self, name: &str) -> Result<Vec<u8>, CaseError> {
        match self {
            Self::Directory(path) => Ok(std::fs::read(path.join(name))?),
            Self::Bundle { files, .. } => files
                .iter()
                .find(|f| f.name == name)
                .map(|f| f.bytes.clone())
                .ok_or_else(|| CaseError::MissingEntry(name.to_string())),
        }
    }

    /// Last-modified time of one entry. `None` for bundles (no reliable
    /// timestamps) and for unreadable metadata.
    pub fn modified(&self, name: &str) -> Option<SystemTime> {
        match self {
            Self::Directory(path) => std::fs::metadata(path.join(name))
                .and_then(|m| m.modified())
                .ok(),
            Self::Bundle { .. } => None,
        }
    }
}
