use std::collections::BTreeSet;

use crate::core::path::rebase;
use crate::core::rewrite::rewrite_path_set;

/// Modifier held while clicking a row.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ClickModifier {
    #[default]
    Plain,
    /// Ctrl or Cmd
    Toggle,
    /// Shift
    Range,
}

/// Selected paths plus the anchor that range selection extends from.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Selection {
    selected: BTreeSet<String>,
    anchor: Option<String>,
}

impl Selection {
    pub fn apply<S: AsRef<str>>(&mut self, path: &str, modifier: ClickModifier, order: &[S]) {
        match modifier {
            ClickModifier::Plain => self.click(path),
            ClickModifier::Toggle => self.toggle(path),
            ClickModifier::Range => self.extend(path, order),
        }
    }

    pub fn click(&mut self, path: &str) {
        self.selected.clear();
        self.selected.insert(path.to_owned());
        self.anchor = Some(path.to_owned());
    }

    pub fn toggle(&mut self, path: &str) {
        if !self.selected.remove(path) {
            self.selected.insert(path.to_owned());
        }
        self.anchor = Some(path.to_owned());
    }

    /// Select the slice of `order` between the anchor and `path`, inclusive.
    ///
    /// The anchor stays where it is, so repeated range clicks pivot around the
    /// same row. Without a usable anchor this is a plain click.
    pub fn extend<S: AsRef<str>>(&mut self, path: &str, order: &[S]) {
        let position = |needle: &str| order.iter().position(|p| p.as_ref() == needle);

        let bounds = self
            .anchor
            .as_deref()
            .and_then(position)
            .zip(position(path));
        let Some((from, to)) = bounds else {
            self.click(path);
            return;
        };

        let (start, end) = if from <= to { (from, to) } else { (to, from) };
        self.selected = order[start..=end]
            .iter()
            .map(|p| p.as_ref().to_owned())
            .collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    /// Follow a rename of `old` to `new`.
    pub fn rewrite(&mut self, old: &str, new: &str) {
        self.selected = rewrite_path_set(&self.selected, old, new);
        if let Some(anchor) = self.anchor.as_deref()
            && let Some(rebased) = rebase(anchor, old, new)
        {
            self.anchor = Some(rebased);
        }
    }

    /// Keep only paths for which `keep` returns true.
    pub fn retain(&mut self, keep: impl Fn(&str) -> bool) {
        self.selected.retain(|path| keep(path));
        if self.anchor.as_deref().is_some_and(|anchor| !keep(anchor)) {
            self.anchor = None;
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.selected.contains(path)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }
}
