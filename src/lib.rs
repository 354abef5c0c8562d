//! Rename and move reconciliation for repository file trees.
//!
//! A repository snapshot is a flat list of [`models::FileEntry`] values.
//! Directories are derived from file paths, renames are validated locally,
//! applied to a [`store::RemoteStore`] as copies and deletes, and only then
//! rewritten into the local [`crate::core::state::TreeState`].

pub mod core;
pub mod models;
pub mod store;

pub use crate::core::rename::{
    ApplyReport, RenameError, RenamePlan, apply_plan, move_entry, plan_move, plan_rename,
    rename_entry,
};
pub use crate::core::selection::{ClickModifier, Selection};
pub use crate::core::state::TreeState;
pub use crate::core::tree::TreeOptions;
pub use crate::core::validate::{NameCheck, ValidationError, validate_move, validate_new_name};
