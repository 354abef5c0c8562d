use std::collections::BTreeSet;

use crate::core::rewrite::rewrite_path_set;

/// Directories currently shown expanded.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExpandedDirs {
    paths: BTreeSet<String>,
}

impl ExpandedDirs {
    pub fn contains(&self, dir: &str) -> bool {
        self.paths.contains(dir)
    }

    pub fn expand(&mut self, dir: impl Into<String>) {
        self.paths.insert(dir.into());
    }

    pub fn collapse(&mut self, dir: &str) {
        self.paths.remove(dir);
    }

    /// Flip `dir` and report whether it is now expanded.
    pub fn toggle(&mut self, dir: &str) -> bool {
        if self.paths.remove(dir) {
            false
        } else {
            self.paths.insert(dir.to_owned());
            true
        }
    }

    pub fn rewrite(&mut self, old: &str, new: &str) {
        self.paths = rewrite_path_set(&self.paths, old, new);
    }

    /// Drop directories for which `exists` returns false.
    pub fn retain_existing(&mut self, exists: impl Fn(&str) -> bool) {
        self.paths.retain(|dir| exists(dir));
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn as_set(&self) -> &BTreeSet<String> {
        &self.paths
    }
}

impl<S: Into<String>> FromIterator<S> for ExpandedDirs {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}
