//! Snapshot history listings
//!
//! - `rev_list`: first-parent traversal from a starting snapshot
//!
//! Every listing (`log`, `global-log`) prints entries in the same shape:
//!
//! ```text
//! ===
//! commit <id>
//! Merge: <first parent, short> <second parent, short>   (merges only)
//! Date: Thu Jan 1 00:00:00 1970 +0000
//! <message>
//!
//! ```

pub mod rev_list;

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::snapshot::{Snapshot, SnapshotKind};
use colored::Colorize;

/// Render one history entry, trailing blank line included
pub fn format_entry(oid: &ObjectId, snapshot: &Snapshot) -> String {
    let mut entry = format!("===\n{}\n", format!("commit {oid}").yellow());

    if let SnapshotKind::Merge {
        parent,
        merge_parent,
    } = snapshot.kind()
    {
        entry.push_str(&format!(
            "Merge: {} {}\n",
            parent.to_short_oid(),
            merge_parent.to_short_oid()
        ));
    }

    entry.push_str(&format!("Date: {}\n", snapshot.readable_timestamp()));
    entry.push_str(snapshot.message());
    entry.push_str("\n\n");

    entry
}
