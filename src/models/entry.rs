use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File,
}

/// One file or directory known to exist in a repository snapshot.
///
/// Paths are `/`-separated with no leading or trailing slash. Directories
/// carry no `sha`; they only exist because some file lives beneath them.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

impl FileEntry {
    pub fn file(path: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
            sha: Some(sha.into()),
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
            sha: None,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Raw content of a file together with its current content id.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileContent {
    pub content: Vec<u8>,
    pub sha: String,
}
