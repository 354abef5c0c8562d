use std::collections::BTreeSet;

use crate::core::path::rebase;
use crate::models::FileEntry;

/// Rewrite every entry at or beneath `old` so that it lives beneath `new`.
///
/// Output has the same length and order as the input; only `path` changes.
pub fn rewrite_paths(entries: &[FileEntry], old: &str, new: &str) -> Vec<FileEntry> {
    entries
        .iter()
        .map(|entry| match rebase(&entry.path, old, new) {
            Some(path) => FileEntry {
                path,
                ..entry.clone()
            },
            None => entry.clone(),
        })
        .collect()
}

/// Same prefix rule as [`rewrite_paths`], applied to a set of paths.
pub fn rewrite_path_set(paths: &BTreeSet<String>, old: &str, new: &str) -> BTreeSet<String> {
    paths
        .iter()
        .map(|path| rebase(path, old, new).unwrap_or_else(|| path.clone()))
        .collect()
}
