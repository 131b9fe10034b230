//! Raw assets written by the extraction tool.
//!
//! `pdfimages -png <pdf> <dir>/image` produces `image-000.png`,
//! `image-001.png`, ... where the number is the `num` column of the listing.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Recognizes raw asset file names for a given prefix.
#[derive(Debug, Clone)]
pub struct AssetMatcher {
    pattern: Regex,
}

impl AssetMatcher {
    /// Matcher for `<prefix>-<digits>[.<ext>]`.
    pub fn new(prefix: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(r"^{}-(\d+)(?:\.[^.]*)?$", regex::escape(prefix)))
            .map_err(|e| Error::InvalidInput(format!("asset prefix {:?}: {}", prefix, e)))?;
        Ok(Self { pattern })
    }

    /// Sequence number embedded in `file_name`, if it names a raw asset.
    pub fn sequence_number(&self, file_name: &str) -> Option<u32> {
        let caps = self.pattern.captures(file_name)?;
        caps.get(1)?.as_str().parse().ok()
    }

    /// Whether `file_name` names a raw asset.
    pub fn is_match(&self, file_name: &str) -> bool {
        self.sequence_number(file_name).is_some()
    }
}

/// Extraction sequence number to raw asset path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetPathIndex {
    paths: BTreeMap<u32, PathBuf>,
}

impl AssetPathIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `dir` recursively for raw assets named with `prefix`.
    pub fn locate(dir: &Path, prefix: &str) -> Result<Self> {
        let matcher = AssetMatcher::new(prefix)?;
        let mut index = Self::new();
        for path in walk_files(dir)? {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(sequence) = matcher.sequence_number(name) {
                index.insert(sequence, path);
            }
        }
        log::debug!("Located {} raw assets in {}", index.len(), dir.display());
        Ok(index)
    }

    /// Record a path; a later path for the same number replaces the earlier.
    pub fn insert(&mut self, sequence: u32, path: PathBuf) {
        self.paths.insert(sequence, path);
    }

    /// Path of the asset with this sequence number.
    pub fn get(&self, sequence: u32) -> Option<&Path> {
        self.paths.get(&sequence).map(PathBuf::as_path)
    }

    /// Number of indexed assets.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Entries in ascending sequence number.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Path)> {
        self.paths.iter().map(|(k, v)| (*k, v.as_path()))
    }
}

/// Delete every raw asset under `dir`, except paths listed in `keep`.
///
/// Returns the number of files removed.
pub fn remove_raw_assets(dir: &Path, prefix: &str, keep: &[PathBuf]) -> Result<usize> {
    let matcher = AssetMatcher::new(prefix)?;
    let mut removed = 0;
    for path in walk_files(dir)? {
        let is_asset = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| matcher.is_match(n));
        if is_asset && !keep.contains(&path) {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    log::debug!("Removed {} raw assets from {}", removed, dir.display());
    Ok(removed)
}

/// All regular files under `dir`, depth first, sorted by name per directory.
fn walk_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            files.extend(walk_files(&path)?);
        } else if file_type.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}
