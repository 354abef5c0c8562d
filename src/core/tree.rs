//! Derives the displayed tree from a flat entry list.
//!
//! Directories are an overlay computed from file paths: the remote store
//! only knows about files, so every ancestor of a listed path is synthesized
//! here and nowhere else.

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

use crate::core::expanded::ExpandedDirs;
use crate::core::path;
use crate::core::patterns::IgnorePatterns;
use crate::models::{EntryKind, FileEntry, TreeNode, VisibleRow};

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SnapshotError {
    #[error("malformed path: {0:?}")]
    Malformed(String),
    #[error("duplicate path: {0}")]
    Duplicate(String),
    #[error("file has children: {0}")]
    FileHasChildren(String),
}

/// Options for turning a listing into a tree.
#[derive(Debug, Clone)]
pub struct TreeOptions {
    /// Pipe-separated patterns to hide (e.g. "node_modules|.git|*.log")
    pub ignore_pattern: Option<String>,
    /// Whether to show entries with a segment starting with '.'
    pub show_hidden: bool,
    /// Whether to sort directories before files
    pub dirs_first: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            ignore_pattern: None,
            show_hidden: true,
            dirs_first: false,
        }
    }
}

/// Reject listings that break the path invariants.
pub fn check_snapshot(entries: &[FileEntry]) -> Result<(), SnapshotError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !path::is_well_formed(&entry.path) {
            return Err(SnapshotError::Malformed(entry.path.clone()));
        }
        if !seen.insert(entry.path.as_str()) {
            return Err(SnapshotError::Duplicate(entry.path.clone()));
        }
    }

    let files: HashSet<&str> = entries
        .iter()
        .filter(|entry| entry.kind == EntryKind::File)
        .map(|entry| entry.path.as_str())
        .collect();
    for entry in entries {
        if let Some(parent) = path::ancestors(&entry.path).find(|a| files.contains(a)) {
            return Err(SnapshotError::FileHasChildren(parent.to_owned()));
        }
    }

    Ok(())
}

/// The listing plus a synthetic entry for every implied directory.
///
/// Input order is kept; synthesized directories follow in order of first
/// appearance.
pub fn with_directories(entries: &[FileEntry]) -> Vec<FileEntry> {
    let mut known: HashSet<&str> = entries.iter().map(|e| e.path.as_str()).collect();
    let mut synthetic = Vec::new();
    for entry in entries {
        for ancestor in path::ancestors(&entry.path) {
            if known.insert(ancestor) {
                synthetic.push(FileEntry::directory(ancestor));
            }
        }
    }

    let mut all = entries.to_vec();
    all.extend(synthetic);
    all
}

/// Build the hierarchical tree for a listing.
///
/// Returns an error if the ignore pattern is invalid.
pub fn build_tree(entries: &[FileEntry], options: &TreeOptions) -> anyhow::Result<Vec<TreeNode>> {
    let ignore = options
        .ignore_pattern
        .as_deref()
        .map(IgnorePatterns::new)
        .transpose()?;

    let kept: Vec<FileEntry> = entries
        .iter()
        .filter(|entry| {
            if !options.show_hidden && is_hidden(&entry.path) {
                return false;
            }
            if let Some(patterns) = &ignore
                && patterns.matches_path(&entry.path)
            {
                return false;
            }
            true
        })
        .cloned()
        .collect();

    let all = with_directories(&kept);
    let mut by_parent: BTreeMap<&str, Vec<&FileEntry>> = BTreeMap::new();
    for entry in &all {
        by_parent
            .entry(path::parent_path(&entry.path))
            .or_default()
            .push(entry);
    }

    Ok(build_level(&by_parent, "", 0, options.dirs_first))
}

fn build_level(
    by_parent: &BTreeMap<&str, Vec<&FileEntry>>,
    parent: &str,
    level: usize,
    dirs_first: bool,
) -> Vec<TreeNode> {
    let Some(entries) = by_parent.get(parent) else {
        return Vec::new();
    };

    let mut nodes: Vec<TreeNode> = entries
        .iter()
        .map(|entry| TreeNode {
            name: path::file_name(&entry.path).to_owned(),
            full_path: entry.path.clone(),
            kind: entry.kind,
            sha: entry.sha.clone(),
            level,
            children: match entry.kind {
                EntryKind::Directory => {
                    build_level(by_parent, &entry.path, level + 1, dirs_first)
                }
                EntryKind::File => Vec::new(),
            },
        })
        .collect();

    // Directory names sort with their trailing slash, so "a" < "a/" < "b".
    nodes.sort_by_cached_key(|node| {
        (
            dirs_first && node.kind != EntryKind::Directory,
            rendered_name(&node.name, node.kind),
        )
    });
    nodes
}

/// Depth-first rows, descending only into expanded directories.
pub fn visible_rows(nodes: &[TreeNode], expanded: &ExpandedDirs) -> Vec<VisibleRow> {
    let mut rows = Vec::new();
    push_rows(nodes, expanded, &mut rows);
    rows
}

fn push_rows(nodes: &[TreeNode], expanded: &ExpandedDirs, rows: &mut Vec<VisibleRow>) {
    for node in nodes {
        rows.push(VisibleRow {
            full_path: node.full_path.clone(),
            name: node.name.clone(),
            kind: node.kind,
            level: node.level,
        });
        if node.kind == EntryKind::Directory && expanded.contains(&node.full_path) {
            push_rows(&node.children, expanded, rows);
        }
    }
}

pub fn rendered_name(name: &str, kind: EntryKind) -> String {
    match kind {
        EntryKind::Directory => format!("{name}/"),
        EntryKind::File => name.to_owned(),
    }
}

fn is_hidden(entry_path: &str) -> bool {
    entry_path
        .split(path::SEPARATOR)
        .any(|segment| segment.starts_with('.'))
}
