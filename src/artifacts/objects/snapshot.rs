//! Snapshot record (a commit)
//!
//! Snapshots are immutable once stored. They contain:
//! - Zero, one or two parent snapshot ids
//! - A commit timestamp with its UTC offset
//! - A name -> blob id map of every tracked file
//! - The commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! snapshot <size>\0
//! parent <parent-sha>
//! parent <merge-parent-sha>
//! timestamp <unix-seconds> <+hhmm>
//! blob <blob-sha> <file name>
//!
//! <commit message>
//! ```
//!
//! Blob lines are written in name order, so two snapshots with equal fields
//! always serialize (and hash) identically.

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, Timelike, Utc};
use std::collections::BTreeMap;
use std::io::{BufRead, Read};

/// Tracked file name -> blob id, ordered by name
pub type BlobMap = BTreeMap<String, ObjectId>;

/// Message of the snapshot every repository starts from
pub const ROOT_MESSAGE: &str = "initial commit";

/// Environment variable overriding the commit timestamp
pub const COMMIT_DATE_ENV: &str = "SPRIG_COMMIT_DATE";

/// Shape of a snapshot's ancestry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotKind {
    /// The single parentless snapshot created by `init`
    Root,
    /// A regular commit
    Normal { parent: ObjectId },
    /// A merge commit; `parent` is the branch merged into
    Merge {
        parent: ObjectId,
        merge_parent: ObjectId,
    },
}

impl SnapshotKind {
    pub fn from_parents(parents: Vec<ObjectId>) -> anyhow::Result<Self> {
        let mut parents = parents.into_iter();

        match (parents.next(), parents.next(), parents.next()) {
            (None, _, _) => Ok(SnapshotKind::Root),
            (Some(parent), None, _) => Ok(SnapshotKind::Normal { parent }),
            (Some(parent), Some(merge_parent), None) => Ok(SnapshotKind::Merge {
                parent,
                merge_parent,
            }),
            _ => anyhow::bail!("a snapshot has at most two parents"),
        }
    }

    /// Parents in order: first parent, then merge parent
    pub fn parents(&self) -> Vec<&ObjectId> {
        match self {
            SnapshotKind::Root => vec![],
            SnapshotKind::Normal { parent } => vec![parent],
            SnapshotKind::Merge {
                parent,
                merge_parent,
            } => vec![parent, merge_parent],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    kind: SnapshotKind,
    message: String,
    timestamp: DateTime<FixedOffset>,
    blobs: BlobMap,
}

impl Snapshot {
    pub fn new(
        kind: SnapshotKind,
        message: String,
        timestamp: DateTime<FixedOffset>,
        blobs: BlobMap,
    ) -> Self {
        Snapshot {
            kind,
            message,
            timestamp,
            blobs,
        }
    }

    /// The parentless, empty snapshot dated at the Unix epoch
    ///
    /// Its id is the same in every repository.
    pub fn root() -> Self {
        Snapshot::new(
            SnapshotKind::Root,
            ROOT_MESSAGE.to_string(),
            DateTime::<Utc>::default().fixed_offset(),
            BlobMap::new(),
        )
    }

    /// Commit time for a new snapshot
    ///
    /// Reads `SPRIG_COMMIT_DATE` (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`) and falls
    /// back to the local clock. Sub-second precision is dropped since the
    /// stored form keeps whole seconds.
    pub fn timestamp_from_env() -> DateTime<FixedOffset> {
        let timestamp = std::env::var(COMMIT_DATE_ENV).ok().and_then(|date_str| {
            DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        });

        let timestamp = timestamp.unwrap_or_else(|| chrono::Local::now().fixed_offset());
        timestamp.with_nanosecond(0).unwrap_or(timestamp)
    }

    pub fn kind(&self) -> &SnapshotKind {
        &self.kind
    }

    pub fn parents(&self) -> Vec<&ObjectId> {
        self.kind.parents()
    }

    /// First parent; the one `log` follows
    pub fn parent(&self) -> Option<&ObjectId> {
        self.kind.parents().first().copied()
    }

    pub fn merge_parent(&self) -> Option<&ObjectId> {
        match &self.kind {
            SnapshotKind::Merge { merge_parent, .. } => Some(merge_parent),
            _ => None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Timestamp like "Thu Jan 1 00:00:00 1970 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    pub fn blobs(&self) -> &BlobMap {
        &self.blobs
    }

    pub fn blob_oid(&self, name: &str) -> Option<&ObjectId> {
        self.blobs.get(name)
    }

    pub fn tracks(&self, name: &str) -> bool {
        self.blobs.contains_key(name)
    }

    fn parse_timestamp(value: &str) -> anyhow::Result<DateTime<FixedOffset>> {
        let (seconds, timezone) = value
            .split_once(' ')
            .with_context(|| format!("malformed timestamp line: {value}"))?;

        let seconds = seconds
            .parse::<i64>()
            .with_context(|| format!("malformed timestamp seconds: {seconds}"))?;
        let offset = parse_offset(timezone)?;

        DateTime::from_timestamp(seconds, 0)
            .map(|utc| utc.with_timezone(&offset))
            .with_context(|| format!("timestamp out of range: {seconds}"))
    }
}

fn parse_offset(timezone: &str) -> anyhow::Result<FixedOffset> {
    let (sign, digits) = match timezone.split_at_checked(1) {
        Some(("+", digits)) => (1, digits),
        Some(("-", digits)) => (-1, digits),
        _ => anyhow::bail!("malformed timezone: {timezone}"),
    };

    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        anyhow::bail!("malformed timezone: {timezone}");
    }

    let hours = digits[..2].parse::<i32>()?;
    let minutes = digits[2..].parse::<i32>()?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .with_context(|| format!("timezone out of range: {timezone}"))
}

impl Packable for Snapshot {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut lines = Vec::new();

        for parent in self.parents() {
            lines.push(format!("parent {parent}"));
        }

        lines.push(format!(
            "timestamp {} {}",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        ));

        for (name, oid) in &self.blobs {
            if name.is_empty() || name.contains('\n') {
                anyhow::bail!("file name {name:?} cannot be recorded in a snapshot");
            }
            lines.push(format!("blob {oid} {name}"));
        }

        let content = format!("{}\n\n{}", lines.join("\n"), self.message);

        Ok(Bytes::from(self.object_type().frame(content.as_bytes())))
    }
}

impl Unpackable for Snapshot {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let (header, message) = content
            .split_once("\n\n")
            .context("snapshot is missing its message separator")?;

        let mut parents = Vec::new();
        let mut timestamp = None;
        let mut blobs = BlobMap::new();

        for line in header.lines() {
            if let Some(parent) = line.strip_prefix("parent ") {
                parents.push(ObjectId::try_parse(parent.to_string())?);
            } else if let Some(value) = line.strip_prefix("timestamp ") {
                timestamp = Some(Self::parse_timestamp(value)?);
            } else if let Some(entry) = line.strip_prefix("blob ") {
                let (oid, name) = entry
                    .split_at_checked(OBJECT_ID_LENGTH)
                    .with_context(|| format!("malformed blob line: {line}"))?;
                let name = name
                    .strip_prefix(' ')
                    .with_context(|| format!("malformed blob line: {line}"))?;

                blobs.insert(name.to_string(), ObjectId::try_parse(oid.to_string())?);
            } else {
                anyhow::bail!("unexpected snapshot line: {line}");
            }
        }

        Ok(Snapshot::new(
            SnapshotKind::from_parents(parents)?,
            message.to_string(),
            timestamp.context("snapshot is missing its timestamp")?,
            blobs,
        ))
    }
}

impl Object for Snapshot {
    fn object_type(&self) -> ObjectType {
        ObjectType::Snapshot
    }
}
