use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::task;

use crate::core::path::{self as repo_path, SEPARATOR};
use crate::models::{FileContent, FileEntry};

use super::{RemoteStore, StoreError};

/// A repository checked out in a local directory.
///
/// Content ids are blake3 digests of the file bytes. Directories only exist
/// through their files: empty ones are not listed, and a delete removes any
/// parent left without files. `.git` is never listed.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        let traversal = path.split(SEPARATOR).any(|s| s == "." || s == "..");
        if !repo_path::is_well_formed(path) || traversal {
            return Err(StoreError::InvalidPath(path.to_owned()));
        }
        Ok(path.split(SEPARATOR).fold(self.root.clone(), |acc, s| acc.join(s)))
    }
}

pub fn content_sha(content: &[u8]) -> String {
    blake3::hash(content).to_hex().to_string()
}

async fn blocking<T, F>(work: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
{
    task::spawn_blocking(work)
        .await
        .map_err(|err| StoreError::Transient(err.to_string()))?
}

fn not_found_as(path: &str) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |err| match err.kind() {
        ErrorKind::NotFound => StoreError::NotFound(path.to_owned()),
        _ => StoreError::Io(err),
    }
}

/// Current sha of the file at `disk`, or `None` if nothing is there.
fn current_sha(disk: &Path) -> Result<Option<String>, StoreError> {
    match std::fs::read(disk) {
        Ok(content) => Ok(Some(content_sha(&content))),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(StoreError::Io(err)),
    }
}

/// Names never listed. Version-control metadata is not repository content.
const SKIPPED_NAMES: &[&str] = &[".git"];

/// Push the files under `dir` and every directory holding at least one of
/// them. Returns whether any file was found.
fn collect_entries(
    dir: &Path,
    prefix: &str,
    out: &mut Vec<FileEntry>,
) -> Result<bool, StoreError> {
    let mut found = false;
    for entry in std::fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("skipping unreadable entry in {}: {err}", dir.display());
                continue;
            }
        };
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(err) => {
                log::warn!("skipping {}: {err}", entry.path().display());
                continue;
            }
        };
        // Links and special files have no counterpart in a remote tree.
        if file_type.is_symlink() || !(file_type.is_dir() || file_type.is_file()) {
            log::debug!("skipping {}: not a regular file", entry.path().display());
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if SKIPPED_NAMES.contains(&name.as_str()) {
            continue;
        }
        let path = repo_path::join(prefix, &name);
        if file_type.is_dir() {
            let at = out.len();
            if collect_entries(&entry.path(), &path, out)? {
                out.insert(at, FileEntry::directory(path));
                found = true;
            }
        } else {
            let content = std::fs::read(entry.path())?;
            out.push(FileEntry::file(path, content_sha(&content)));
            found = true;
        }
    }
    Ok(found)
}

/// Whether `dir` holds nothing but (possibly nested) empty directories.
fn holds_no_files(dir: &Path) -> bool {
    let Ok(mut entries) = std::fs::read_dir(dir) else {
        return false;
    };
    entries.all(|entry| match entry {
        Ok(entry) => entry
            .file_type()
            .is_ok_and(|t| t.is_dir() && holds_no_files(&entry.path())),
        Err(_) => false,
    })
}

/// Remove the ancestors of `disk` left without files, stopping at `root`.
fn prune_empty_parents(root: &Path, disk: &Path) {
    let mut current = disk.parent();
    while let Some(dir) = current {
        if dir == root || !holds_no_files(dir) {
            break;
        }
        if let Err(err) = std::fs::remove_dir_all(dir) {
            log::warn!("leaving {}: {err}", dir.display());
            break;
        }
        current = dir.parent();
    }
}

#[async_trait]
impl RemoteStore for LocalStore {
    async fn list_entries(&self) -> Result<Vec<FileEntry>, StoreError> {
        let root = self.root.clone();
        log::debug!("listing {}", root.display());
        blocking(move || {
            let mut entries = Vec::new();
            collect_entries(&root, "", &mut entries)?;
            entries.sort_by(|a, b| a.path.cmp(&b.path));
            Ok(entries)
        })
        .await
    }

    async fn read_file(&self, path: &str) -> Result<FileContent, StoreError> {
        let disk = self.resolve(path)?;
        let path = path.to_owned();
        blocking(move || {
            let content = std::fs::read(&disk).map_err(not_found_as(&path))?;
            let sha = content_sha(&content);
            Ok(FileContent { content, sha })
        })
        .await
    }

    async fn write_file(
        &self,
        path: &str,
        content: Vec<u8>,
        prior_sha: Option<&str>,
    ) -> Result<String, StoreError> {
        let disk = self.resolve(path)?;
        let path = path.to_owned();
        let prior_sha = prior_sha.map(str::to_owned);
        blocking(move || {
            match (current_sha(&disk)?, prior_sha) {
                (None, None) => {}
                (Some(current), Some(expected)) if current == expected => {}
                (None, Some(_)) => return Err(StoreError::NotFound(path)),
                (Some(_), _) => return Err(StoreError::Conflict(path)),
            }
            if let Some(parent) = disk.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&disk, &content)?;
            Ok(content_sha(&content))
        })
        .await
    }

    async fn delete_file(&self, path: &str, sha: Option<&str>) -> Result<(), StoreError> {
        let disk = self.resolve(path)?;
        let root = self.root.clone();
        let path = path.to_owned();
        let sha = sha.map(str::to_owned);
        blocking(move || {
            let Some(current) = current_sha(&disk)? else {
                return Err(StoreError::NotFound(path));
            };
            if sha.is_some_and(|expected| expected != current) {
                return Err(StoreError::Conflict(path));
            }
            std::fs::remove_file(&disk).map_err(not_found_as(&path))?;
            prune_empty_parents(&root, &disk);
            Ok(())
        })
        .await
    }
}
