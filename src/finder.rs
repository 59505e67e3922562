//!
//! File index behind the demo palette.
//!
//! Walks a root directory once at startup and answers queries with a
//! case-insensitive substring match on the relative path. Matches on the
//! file name sort ahead of matches elsewhere in the path.

use std::fs;
use std::path::{Component, Path, PathBuf};

/// How many directory levels below the root are indexed.
pub const MAX_DEPTH: usize = 8;

/// Upper bound on matches handed to the palette per query.
pub const MAX_RESULTS: usize = 200;

/// Files under a root directory.
pub struct FileIndex {
    root: PathBuf,
    paths: Vec<PathBuf>,
}

impl FileIndex {
    /// Indexes every non-excluded file under `root`.
    pub fn build(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut paths = Vec::new();
        walk_directory(&root, &root, 0, &mut paths);
        paths.sort();
        tracing::info!(root = %root.display(), files = paths.len(), "indexed files");
        Self { root, paths }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[cfg_attr(not(target_os = "macos"), allow(dead_code))]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Relative paths containing `query`, ignoring case.
    ///
    /// An empty query matches nothing, so the palette collapses to just its
    /// search field.
    pub fn query(&self, query: &str) -> Vec<PathBuf> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(u8, &PathBuf)> = self
            .paths
            .iter()
            .filter_map(|path| score_match(&query, path).map(|score| (score, path)))
            .collect();
        // Stable sort keeps paths in walk order within a score
        scored.sort_by_key(|(score, _)| *score);

        scored
            .into_iter()
            .take(MAX_RESULTS)
            .map(|(_, path)| path.clone())
            .collect()
    }
}

/// Lower is better. `None` when the path does not contain the query.
fn score_match(query: &str, path: &Path) -> Option<u8> {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if name.starts_with(query) {
        return Some(0);
    }
    if name.contains(query) {
        return Some(1);
    }
    if path.to_string_lossy().to_lowercase().contains(query) {
        return Some(2);
    }
    None
}

/// Dot entries and build output directories are skipped.
fn is_excluded(path: &Path) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => {
            let name = name.to_string_lossy();
            name.starts_with('.') || name == "target" || name == "node_modules"
        }
        _ => false,
    })
}

fn walk_directory(root: &Path, dir: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(dir = %dir.display(), %err, "skipping unreadable directory");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        if is_excluded(relative) {
            continue;
        }

        if path.is_dir() {
            if depth < MAX_DEPTH {
                walk_directory(root, &path, depth + 1, out);
            }
        } else if path.is_file() {
            out.push(relative.to_path_buf());
        }
    }
}
