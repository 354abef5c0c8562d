mod entry;
mod tree;

pub use entry::{EntryKind, FileContent, FileEntry};
pub use tree::{TreeNode, VisibleRow};
