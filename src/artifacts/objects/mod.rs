//! Content-addressed records
//!
//! Everything sprig persists in its object store is one of two records:
//!
//! - **Blob**: the raw bytes of a file at some point in time
//! - **Snapshot**: an immutable commit (parents, message, timestamp and a
//!   name -> blob id map)
//!
//! Records are framed as `<type> <size>\0<content>` before hashing, so a blob
//! and a snapshot can never share an id even if their payloads coincide.

pub mod blob;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod snapshot;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of the abbreviated form printed in short listings
pub const SHORT_OBJECT_ID_LENGTH: usize = 7;
