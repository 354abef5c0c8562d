use thiserror::Error;

use crate::core::path;
use crate::models::{EntryKind, FileEntry};

/// Why a proposed rename or move was refused before any remote call.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ValidationError {
    #[error("name required")]
    NameRequired,
    #[error("name cannot contain separator")]
    ContainsSeparator,
    #[error("reserved name")]
    ReservedName,
    #[error("name already in use")]
    AlreadyExists,
    #[error("cannot move a directory into itself")]
    MoveIntoSelf,
    #[error("target is not a directory")]
    NotADirectory,
}

/// Outcome of a successful validation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NameCheck {
    /// The entry would end up where it already is; treat as a cancel.
    Unchanged,
    Changed { new_path: String },
}

/// Check `new_name` as the new last segment of `old_path`.
///
/// Rules apply in order and the first failure wins. Only structural rules are
/// enforced here; length and character restrictions belong to the store.
pub fn validate_new_name(
    new_name: &str,
    old_path: &str,
    entries: &[FileEntry],
) -> Result<NameCheck, ValidationError> {
    if new_name.trim().is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if new_name.contains(path::SEPARATOR) {
        return Err(ValidationError::ContainsSeparator);
    }
    if new_name == "." || new_name == ".." {
        return Err(ValidationError::ReservedName);
    }

    let new_path = path::join(path::parent_path(old_path), new_name);
    if new_path == old_path {
        return Ok(NameCheck::Unchanged);
    }
    if path_in_use(entries, &new_path) {
        return Err(ValidationError::AlreadyExists);
    }

    Ok(NameCheck::Changed { new_path })
}

/// Check a drag-and-drop move of `source` into `target_dir` (`""` is the root).
pub fn validate_move(
    source: &str,
    target_dir: &str,
    entries: &[FileEntry],
) -> Result<NameCheck, ValidationError> {
    if path::is_descendant_or_self(target_dir, source) {
        return Err(ValidationError::MoveIntoSelf);
    }
    if !target_dir.is_empty() && !is_directory(entries, target_dir) {
        return Err(ValidationError::NotADirectory);
    }

    let new_path = path::join(target_dir, path::file_name(source));
    if new_path == source {
        return Ok(NameCheck::Unchanged);
    }
    if path_in_use(entries, &new_path) {
        return Err(ValidationError::AlreadyExists);
    }

    Ok(NameCheck::Changed { new_path })
}

/// True when `candidate` is an entry or an implicit directory above one.
pub fn path_in_use(entries: &[FileEntry], candidate: &str) -> bool {
    entries
        .iter()
        .any(|entry| path::is_descendant_or_self(&entry.path, candidate))
}

/// True when `candidate` is a listed directory or has anything beneath it.
pub fn is_directory(entries: &[FileEntry], candidate: &str) -> bool {
    entries.iter().any(|entry| {
        (entry.path == candidate && entry.kind == EntryKind::Directory)
            || path::is_strict_descendant(&entry.path, candidate)
    })
}
