use std::collections::HashSet;

use anyhow::Context;
use regex::RegexSet;

use crate::core::path::SEPARATOR;

/// Ignore list compiled from a pipe-separated pattern string such as
/// `".git|node_modules|*.log"`.
///
/// Patterns match single path segments. A path is ignored when any of its
/// segments matches, so ignoring `node_modules` hides everything beneath it.
#[derive(Debug)]
pub struct IgnorePatterns {
    exact: HashSet<String>,
    globs: Option<RegexSet>,
}

impl IgnorePatterns {
    pub fn new(pattern: &str) -> anyhow::Result<Self> {
        let mut exact = HashSet::new();
        let mut globs = Vec::new();

        for segment in pattern.split('|').map(str::trim) {
            if segment.is_empty() {
                continue;
            }
            if segment.contains(['*', '?']) {
                globs.push(glob_to_regex(segment));
            } else {
                exact.insert(segment.to_owned());
            }
        }

        let globs = if globs.is_empty() {
            None
        } else {
            Some(
                RegexSet::new(&globs)
                    .with_context(|| format!("invalid ignore pattern: {pattern}"))?,
            )
        };

        Ok(Self { exact, globs })
    }

    pub fn matches_name(&self, name: &str) -> bool {
        if self.exact.contains(name) {
            return true;
        }
        self.globs
            .as_ref()
            .is_some_and(|globs| globs.is_match(name))
    }

    pub fn matches_path(&self, path: &str) -> bool {
        path.split(SEPARATOR).any(|segment| self.matches_name(segment))
    }
}

/// `*` is any run of characters, `?` exactly one; everything else is literal.
fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() * 2 + 2);
    out.push('^');
    for c in glob.chars() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            c => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    out.push('$');
    out
}
