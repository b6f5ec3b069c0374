//! Command implementations
//!
//! Each user-facing command lives in its own file under `porcelain` as an
//! `impl Repository` block, so commands share the repository's store handles
//! and writer.

pub mod porcelain;
