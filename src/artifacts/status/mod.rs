//! Working tree status inspection
//!
//! Compares the working files against the stage and the HEAD snapshot.
//!
//! ## Components
//!
//! - `file_change`: categories of unstaged changes
//! - `inspector`: hashes working files and compares them with recorded blobs
//! - `status_info`: aggregates everything `status` prints

pub mod file_change;
pub mod inspector;
pub mod status_info;
