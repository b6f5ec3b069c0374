use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;

const CONFLICT_HEAD_MARKER: &str = "<<<<<<< HEAD\n";
const CONFLICT_SEPARATOR: &str = "=======\n";
const CONFLICT_END_MARKER: &str = ">>>>>>>\n";

/// What a three-way merge does with one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Leave the head version (or its absence) alone
    Unchanged,
    /// Check out the other side's blob and stage it
    TakeOther(ObjectId),
    /// Delete the file and stage its removal; carries the head blob id
    Remove(ObjectId),
    /// Both sides changed the file differently; `None` stands for a deletion
    Conflict {
        head: Option<ObjectId>,
        other: Option<ObjectId>,
    },
}

/// Decide a file's fate from its blob id in the base, head and other snapshots
pub fn resolve(
    base: Option<&ObjectId>,
    head: Option<&ObjectId>,
    other: Option<&ObjectId>,
) -> Resolution {
    let conflict = |head: Option<&ObjectId>, other: Option<&ObjectId>| Resolution::Conflict {
        head: head.cloned(),
        other: other.cloned(),
    };

    match (base, head, other) {
        // added only on the other side
        (None, None, Some(o)) => Resolution::TakeOther(o.clone()),
        // added on both sides, differently
        (None, Some(h), Some(o)) if h != o => conflict(Some(h), Some(o)),
        // deleted on the other side, untouched at head
        (Some(s), Some(h), None) if s == h => Resolution::Remove(h.clone()),
        // deleted on the other side, modified at head
        (Some(_), Some(h), None) => conflict(Some(h), None),
        // deleted at head, modified on the other side
        (Some(s), None, Some(o)) if s != o => conflict(None, Some(o)),
        // modified only on the other side
        (Some(s), Some(h), Some(o)) if s == h && h != o => Resolution::TakeOther(o.clone()),
        // modified on both sides, differently
        (Some(s), Some(h), Some(o)) if s != h && s != o && h != o => conflict(Some(h), Some(o)),
        _ => Resolution::Unchanged,
    }
}

/// Working file content recording both sides of a conflict
pub fn conflict_content(head: &[u8], other: &[u8]) -> Bytes {
    let mut content = Vec::with_capacity(
        CONFLICT_HEAD_MARKER.len()
            + head.len()
            + CONFLICT_SEPARATOR.len()
            + other.len()
            + CONFLICT_END_MARKER.len(),
    );

    content.extend_from_slice(CONFLICT_HEAD_MARKER.as_bytes());
    content.extend_from_slice(head);
    content.extend_from_slice(CONFLICT_SEPARATOR.as_bytes());
    content.extend_from_slice(other);
    content.extend_from_slice(CONFLICT_END_MARKER.as_bytes());

    content.into()
}
