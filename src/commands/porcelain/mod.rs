//! Porcelain commands (user-facing operations)
//!
//! ## Commands
//!
//! - `init`: Create a repository with its root snapshot
//! - `add` / `rm`: Stage files for addition or removal
//! - `commit`: Record the stage as a new snapshot
//! - `log` / `global-log` / `find`: Inspect history
//! - `status`: Show branches, stage and working tree changes
//! - `checkout`: Restore files or switch branches
//! - `branch` / `rm-branch`: Create or delete branches
//! - `reset`: Move the current branch to another snapshot
//! - `merge`: Three-way merge another branch into the current one

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod find;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;

#[cfg(test)]
pub(crate) mod fixtures;
