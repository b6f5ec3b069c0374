//! Stage file format
//!
//! The stage records pending additions and removals between commits.
//!
//! ## File Format
//!
//! ```text
//! Header (16 bytes):
//!   - Signature: "STGE" (4 bytes)
//!   - Version: 1 (4 bytes)
//!   - Addition count (4 bytes)
//!   - Removal count (4 bytes)
//!
//! Entries (variable length):
//!   - Kind: 'A' or 'R' (1 byte)
//!   - Blob id (20 bytes)
//!   - Name length (2 bytes)
//!   - Name (UTF-8)
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```
//!
//! All integers are big-endian.

pub mod checksum;
pub mod stage_entry;
pub mod stage_header;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of stage header in bytes
pub const HEADER_SIZE: usize = 16;

/// Size of an entry before its name: kind, blob id and name length
pub const ENTRY_FIXED_SIZE: usize = 23;

/// Magic signature identifying stage files
pub const SIGNATURE: &str = "STGE";

/// Stage file format version
pub const VERSION: u32 = 1;
