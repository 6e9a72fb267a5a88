use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::foundation::error::{ReelError, ReelResult};

/// Source of encoded image bytes, keyed by pack-relative path.
///
/// This is the seam where a downloading collaborator plugs in; the crate ships a local
/// directory source and an in-memory source.
pub trait ImageFetcher: Send {
    /// Return the encoded bytes stored under `key`.
    fn fetch(&mut self, key: &str) -> ReelResult<Vec<u8>>;
}

/// Reads images from a directory on disk.
#[derive(Clone, Debug)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    /// Fetch relative keys below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ImageFetcher for DirFetcher {
    fn fetch(&mut self, key: &str) -> ReelResult<Vec<u8>> {
        let norm = normalize_rel_path(key)?;
        let p = self.root.join(Path::new(&norm));
        std::fs::read(&p).map_err(|e| {
            ReelError::validation(format!("failed to read image '{}': {e}", p.display()))
        })
    }
}

/// Serves images from an in-memory map.
#[derive(Clone, Debug, Default)]
pub struct MemoryFetcher {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes under `key`.
    pub fn insert(&mut self, key: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(key.into(), bytes);
    }
}

impl ImageFetcher for MemoryFetcher {
    fn fetch(&mut self, key: &str) -> ReelResult<Vec<u8>> {
        self.files
            .get(key)
            .cloned()
            .ok_or_else(|| ReelError::validation(format!("no image registered for '{key}'")))
    }
}

/// Normalize and validate pack-relative image paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub(crate) fn normalize_rel_path(source: &str) -> ReelResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(ReelError::validation("image paths must be relative"));
    }
    if s.is_empty() {
        return Err(ReelError::validation("image path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ReelError::validation("image paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ReelError::validation(
            "image path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
