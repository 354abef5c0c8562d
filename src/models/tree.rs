use serde::Serialize;

use super::EntryKind;

/// A node of the tree derived from a flat entry list.
///
/// Always rebuilt from the entries, never edited in place.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TreeNode {
    pub name: String,
    pub full_path: String,
    pub kind: EntryKind,
    pub sha: Option<String>,
    /// Nesting depth; children of the repository root are at level 0.
    pub level: usize,
    pub children: Vec<TreeNode>,
}

/// One row of the flattened, currently rendered tree.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct VisibleRow {
    pub full_path: String,
    pub name: String,
    pub kind: EntryKind,
    pub level: usize,
}
