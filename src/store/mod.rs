mod local;

#[cfg(test)]
mod mock;

pub use local::LocalStore;

#[cfg(test)]
pub use mock::{Call, MockStore};

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{FileContent, FileEntry};

/// Failures reported by a [`RemoteStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    /// The caller's sha no longer matches, or the path was created meanwhile.
    #[error("conflicting change at {0}")]
    Conflict(String),
    #[error("invalid path: {0:?}")]
    InvalidPath(String),
    #[error("store unavailable: {0}")]
    Transient(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Worth retrying by hand later, as opposed to reloading first.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_) | Self::Io(_))
    }
}

/// The file store a repository snapshot comes from.
///
/// There is no rename primitive: moves are composed from these four calls.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list_entries(&self) -> Result<Vec<FileEntry>, StoreError>;

    async fn read_file(&self, path: &str) -> Result<FileContent, StoreError>;

    /// Create `path` (`prior_sha` of `None`) or replace it when `prior_sha`
    /// matches the current content. Returns the new sha.
    async fn write_file(
        &self,
        path: &str,
        content: Vec<u8>,
        prior_sha: Option<&str>,
    ) -> Result<String, StoreError>;

    async fn delete_file(&self, path: &str, sha: Option<&str>) -> Result<(), StoreError>;
}
