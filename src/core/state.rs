use crate::core::expanded::ExpandedDirs;
use crate::core::rewrite::rewrite_paths;
use crate::core::selection::{ClickModifier, Selection};
use crate::core::tree::{self, TreeOptions};
use crate::core::validate;
use crate::models::{FileEntry, VisibleRow};

/// Client-side view of one repository snapshot.
///
/// The remote store stays the source of truth: entries only change through
/// a fresh listing or after a rename the store has confirmed.
#[derive(Clone, Debug, Default)]
pub struct TreeState {
    repo: String,
    entries: Vec<FileEntry>,
    expanded: ExpandedDirs,
    selection: Selection,
}

impl TreeState {
    pub fn new(repo: impl Into<String>, entries: Vec<FileEntry>) -> Self {
        Self {
            repo: repo.into(),
            entries,
            ..Self::default()
        }
    }

    /// Switch to another snapshot, dropping selection and expansion.
    pub fn reset(&mut self, repo: impl Into<String>, entries: Vec<FileEntry>) {
        self.repo = repo.into();
        self.entries = entries;
        self.expanded.clear();
        self.selection.clear();
    }

    /// Take a re-fetched listing of the same repository.
    pub fn replace_entries(&mut self, entries: Vec<FileEntry>) {
        self.entries = entries;
        let entries = &self.entries;
        self.expanded
            .retain_existing(|dir| validate::is_directory(entries, dir));
        self.selection
            .retain(|path| validate::path_in_use(entries, path));
    }

    /// Rewrite entries, expanded directories and selection after a confirmed
    /// rename of `old` to `new`.
    pub fn apply_rename(&mut self, old: &str, new: &str) {
        self.entries = rewrite_paths(&self.entries, old, new);
        self.expanded.rewrite(old, new);
        self.selection.rewrite(old, new);
    }

    pub fn toggle_expanded(&mut self, dir: &str) -> bool {
        self.expanded.toggle(dir)
    }

    /// Apply a click against the order currently rendered with `options`.
    pub fn click(
        &mut self,
        path: &str,
        modifier: ClickModifier,
        options: &TreeOptions,
    ) -> anyhow::Result<()> {
        let order = self.visible_order(options)?;
        self.selection.apply(path, modifier, &order);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn visible_rows(&self, options: &TreeOptions) -> anyhow::Result<Vec<VisibleRow>> {
        let nodes = tree::build_tree(&self.entries, options)?;
        Ok(tree::visible_rows(&nodes, &self.expanded))
    }

    pub fn visible_order(&self, options: &TreeOptions) -> anyhow::Result<Vec<String>> {
        Ok(self
            .visible_rows(options)?
            .into_iter()
            .map(|row| row.full_path)
            .collect())
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn expanded(&self) -> &ExpandedDirs {
        &self.expanded
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }
}
