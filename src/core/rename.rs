//! Renames and moves against a store that cannot rename.
//!
//! A rename is planned against the local snapshot, applied remotely as copies
//! followed by deletes, and only then committed to the local [`TreeState`].
//! A directory rename is nothing more than the batch of its file moves.

use std::fmt;

use thiserror::Error;

use crate::core::path::rebase;
use crate::core::state::TreeState;
use crate::core::validate::{self, NameCheck, ValidationError};
use crate::models::EntryKind;
use crate::store::{RemoteStore, StoreError};

/// One file to relocate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileMove {
    pub from: String,
    pub to: String,
    /// Content id seen in the snapshot the plan was made from.
    pub sha: Option<String>,
}

/// A validated rename, frozen against the snapshot it was computed from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RenamePlan {
    pub repo: String,
    pub old_path: String,
    pub new_path: String,
    pub is_directory: bool,
    pub moves: Vec<FileMove>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Step {
    Copied { from: String, to: String },
    Deleted(String),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copied { from, to } => write!(f, "copied {from} to {to}"),
            Self::Deleted(path) => write!(f, "deleted {path}"),
        }
    }
}

/// What the store did for a fully applied plan.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ApplyReport {
    pub steps: Vec<Step>,
}

#[derive(Debug, Error)]
pub enum RenameError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("no such path: {0}")]
    UnknownPath(String),
    /// A listed directory with nothing in it cannot be carried to the store.
    #[error("{0} holds no files")]
    NoFiles(String),
    /// Someone else changed the file; reload instead of retrying.
    #[error("{path} was changed remotely, reload before retrying")]
    Conflict { path: String },
    #[error("{path}: {source}")]
    Remote {
        path: String,
        #[source]
        source: StoreError,
    },
    /// Some steps landed before the failure. Nothing is rolled back.
    #[error("rename stopped at {failed} after {} of {total} steps", .completed.len())]
    Partial {
        completed: Vec<Step>,
        failed: String,
        total: usize,
        #[source]
        source: StoreError,
    },
    #[error("repository switched from {expected} to {current}, rename result ignored")]
    Stale { expected: String, current: String },
}

impl RenameError {
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Conflict { .. } => true,
            Self::Partial { source, .. } => matches!(source, StoreError::Conflict(_)),
            _ => false,
        }
    }

    pub fn is_transient(&self) -> bool {
        match self {
            Self::Remote { source, .. } | Self::Partial { source, .. } => source.is_transient(),
            _ => false,
        }
    }
}

/// Plan renaming the last segment of `old_path` to `new_name`.
///
/// `Ok(None)` means the name did not change.
pub fn plan_rename(
    state: &TreeState,
    old_path: &str,
    new_name: &str,
) -> Result<Option<RenamePlan>, RenameError> {
    ensure_known(state, old_path)?;
    match validate::validate_new_name(new_name, old_path, state.entries())? {
        NameCheck::Unchanged => Ok(None),
        NameCheck::Changed { new_path } => build_plan(state, old_path, new_path).map(Some),
    }
}

/// Plan a drag-and-drop move of `source` into `target_dir` (`""` is the root).
pub fn plan_move(
    state: &TreeState,
    source: &str,
    target_dir: &str,
) -> Result<Option<RenamePlan>, RenameError> {
    ensure_known(state, source)?;
    match validate::validate_move(source, target_dir, state.entries())? {
        NameCheck::Unchanged => Ok(None),
        NameCheck::Changed { new_path } => build_plan(state, source, new_path).map(Some),
    }
}

fn ensure_known(state: &TreeState, path: &str) -> Result<(), RenameError> {
    if validate::path_in_use(state.entries(), path) {
        Ok(())
    } else {
        Err(RenameError::UnknownPath(path.to_owned()))
    }
}

fn build_plan(
    state: &TreeState,
    old_path: &str,
    new_path: String,
) -> Result<RenamePlan, RenameError> {
    let moves: Vec<FileMove> = state
        .entries()
        .iter()
        .filter(|entry| entry.kind == EntryKind::File)
        .filter_map(|entry| {
            rebase(&entry.path, old_path, &new_path).map(|to| FileMove {
                from: entry.path.clone(),
                to,
                sha: entry.sha.clone(),
            })
        })
        .collect();
    if moves.is_empty() {
        return Err(RenameError::NoFiles(old_path.to_owned()));
    }

    Ok(RenamePlan {
        repo: state.repo().to_owned(),
        old_path: old_path.to_owned(),
        is_directory: validate::is_directory(state.entries(), old_path),
        new_path,
        moves,
    })
}

/// Carry out `plan` against the store.
///
/// Every file is copied before any original is deleted, so a failure while
/// copying leaves all originals in place. Failures stop the run; steps that
/// already landed are reported, not undone.
pub async fn apply_plan<S: RemoteStore + ?Sized>(
    store: &S,
    plan: &RenamePlan,
) -> Result<ApplyReport, RenameError> {
    let total = plan.moves.len() * 2;
    let mut steps = Vec::with_capacity(total);
    let mut staged = Vec::with_capacity(plan.moves.len());

    for file in &plan.moves {
        log::debug!("copying {} to {}", file.from, file.to);
        match copy_file(store, file).await {
            Ok(sha) => {
                staged.push((file.from.as_str(), sha));
                steps.push(Step::Copied {
                    from: file.from.clone(),
                    to: file.to.clone(),
                });
            }
            Err(err) => return Err(stopped(steps, &file.from, total, err)),
        }
    }

    for (from, sha) in staged {
        log::debug!("deleting {from}");
        if let Err(err) = store.delete_file(from, Some(sha.as_str())).await {
            return Err(stopped(steps, from, total, err));
        }
        steps.push(Step::Deleted(from.to_owned()));
    }

    Ok(ApplyReport { steps })
}

/// Copy one file to its new path and return the sha of the original.
async fn copy_file<S: RemoteStore + ?Sized>(
    store: &S,
    file: &FileMove,
) -> Result<String, StoreError> {
    let current = store.read_file(&file.from).await?;
    if file.sha.as_deref().is_some_and(|seen| seen != current.sha) {
        return Err(StoreError::Conflict(file.from.clone()));
    }
    store.write_file(&file.to, current.content, None).await?;
    Ok(current.sha)
}

fn stopped(completed: Vec<Step>, path: &str, total: usize, source: StoreError) -> RenameError {
    if !completed.is_empty() {
        log::warn!(
            "rename stopped at {path} after {} of {total} steps: {source}",
            completed.len()
        );
        return RenameError::Partial {
            completed,
            failed: path.to_owned(),
            total,
            source,
        };
    }
    match source {
        StoreError::Conflict(path) => RenameError::Conflict { path },
        source => RenameError::Remote {
            path: path.to_owned(),
            source,
        },
    }
}

impl TreeState {
    /// Apply a remotely completed plan to the local views.
    ///
    /// Refused when the state has since moved on to another repository.
    pub fn commit(&mut self, plan: &RenamePlan) -> Result<(), RenameError> {
        if plan.repo != self.repo() {
            return Err(RenameError::Stale {
                expected: plan.repo.clone(),
                current: self.repo().to_owned(),
            });
        }
        self.apply_rename(&plan.old_path, &plan.new_path);
        log::info!("renamed {} to {}", plan.old_path, plan.new_path);
        Ok(())
    }
}

/// Validate, apply remotely, then commit locally.
///
/// Returns `Ok(None)` when the new name equals the old one.
pub async fn rename_entry<S: RemoteStore + ?Sized>(
    store: &S,
    state: &mut TreeState,
    old_path: &str,
    new_name: &str,
) -> Result<Option<ApplyReport>, RenameError> {
    let Some(plan) = plan_rename(state, old_path, new_name)? else {
        return Ok(None);
    };
    execute(store, state, &plan).await.map(Some)
}

/// Move `source` into `target_dir`, like [`rename_entry`].
pub async fn move_entry<S: RemoteStore + ?Sized>(
    store: &S,
    state: &mut TreeState,
    source: &str,
    target_dir: &str,
) -> Result<Option<ApplyReport>, RenameError> {
    let Some(plan) = plan_move(state, source, target_dir)? else {
        return Ok(None);
    };
    execute(store, state, &plan).await.map(Some)
}

async fn execute<S: RemoteStore + ?Sized>(
    store: &S,
    state: &mut TreeState,
    plan: &RenamePlan,
) -> Result<ApplyReport, RenameError> {
    let report = apply_plan(store, plan).await?;
    state.commit(plan)?;
    Ok(report)
}
