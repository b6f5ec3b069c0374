//! Three-way merging
//!
//! - [`merge_base`]: ancestor enumeration and merge-base selection over the
//!   snapshot graph
//! - [`resolution`]: the per-file decision table
//! - [`three_way`]: applies those decisions to the working files and stage

pub mod merge_base;
pub mod resolution;
pub mod three_way;
