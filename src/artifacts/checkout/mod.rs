//! Moving the working directory between snapshots
//!
//! Used by branch checkout, reset and fast-forward merges. All collisions
//! with untracked files are detected before any file is touched.

pub mod migration;
