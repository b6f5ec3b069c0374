//! Staging area
//!
//! Two disjoint name -> blob id maps: files staged for addition and files
//! staged for removal. The stage is loaded whole, edited in memory and
//! written back whole under the `stage` state key.

use crate::areas::state::StateStore;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::snapshot::BlobMap;
use crate::artifacts::stage::checksum::Checksum;
use crate::artifacts::stage::stage_entry::{EntryKind, StageEntry};
use crate::artifacts::stage::stage_header::StageHeader;
use crate::artifacts::stage::{ENTRY_FIXED_SIZE, HEADER_SIZE};
use crate::errors::UserError;
use byteorder::ByteOrder;
use std::io::Cursor;

/// State key the stage is stored under
pub const STAGE_KEY: &str = "stage";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stage {
    additions: BlobMap,
    removals: BlobMap,
}

impl Stage {
    pub fn load(state: &dyn StateStore) -> anyhow::Result<Self> {
        let mut stage = Stage::default();

        let data = match state.read(STAGE_KEY)? {
            Some(data) if !data.is_empty() => data,
            _ => return Ok(stage),
        };

        let mut reader = Checksum::new(Cursor::new(data));
        let header = StageHeader::deserialize(Cursor::new(reader.read(HEADER_SIZE)?))?;
        header.validate()?;

        for _ in 0..(header.additions as u64 + header.removals as u64) {
            let fixed = reader.read(ENTRY_FIXED_SIZE)?;
            let name_length =
                byteorder::NetworkEndian::read_u16(&fixed[ENTRY_FIXED_SIZE - 2..]) as usize;
            let name = reader.read(name_length)?;

            let entry = StageEntry::deserialize(Cursor::new([fixed, name].concat()))?;
            match entry.kind {
                EntryKind::Addition => stage.additions.insert(entry.name, entry.oid),
                EntryKind::Removal => stage.removals.insert(entry.name, entry.oid),
            };
        }

        reader.verify()?;

        if stage.additions.len() != header.additions as usize
            || stage.removals.len() != header.removals as usize
        {
            anyhow::bail!("Stage entry counts do not match its header");
        }

        Ok(stage)
    }

    pub fn save(&self, state: &dyn StateStore) -> anyhow::Result<()> {
        let mut writer = Checksum::new(Vec::new());

        let header = StageHeader::for_counts(self.additions.len(), self.removals.len())?;
        writer.write(&header.serialize()?)?;

        let additions = self.additions.iter().map(|entry| (EntryKind::Addition, entry));
        let removals = self.removals.iter().map(|entry| (EntryKind::Removal, entry));

        for (kind, (name, oid)) in additions.chain(removals) {
            let entry = StageEntry::new(kind, name.clone(), oid.clone());
            writer.write(&entry.serialize()?)?;
        }

        writer.write_checksum()?;
        state.write(STAGE_KEY, &writer.into_inner())
    }

    pub fn additions(&self) -> &BlobMap {
        &self.additions
    }

    pub fn removals(&self) -> &BlobMap {
        &self.removals
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    pub fn is_staged_for_addition(&self, name: &str) -> bool {
        self.additions.contains_key(name)
    }

    pub fn is_staged_for_removal(&self, name: &str) -> bool {
        self.removals.contains_key(name)
    }

    /// Stage `name` with the blob the working copy hashes to
    ///
    /// A pending removal of `name` is always cancelled. When the content
    /// matches what HEAD already tracks, any pending addition is dropped
    /// instead. Returns whether the blob is now staged, i.e. whether it needs
    /// to be stored.
    pub fn add(&mut self, name: &str, oid: ObjectId, tracked: Option<&ObjectId>) -> bool {
        self.removals.remove(name);

        if tracked == Some(&oid) {
            self.additions.remove(name);
            false
        } else {
            self.additions.insert(name.to_string(), oid);
            true
        }
    }

    /// Unstage `name` and, if HEAD tracks it, stage its removal
    ///
    /// Returns whether the working copy should be deleted. Fails without
    /// touching the stage when `name` is neither staged nor tracked.
    pub fn remove(&mut self, name: &str, tracked: Option<&ObjectId>) -> anyhow::Result<bool> {
        let was_staged = self.additions.remove(name).is_some();

        match tracked {
            Some(oid) => {
                self.removals.insert(name.to_string(), oid.clone());
                Ok(true)
            }
            None if was_staged => Ok(false),
            None => Err(UserError::NothingToRemove.into()),
        }
    }

    /// Stage an addition unconditionally
    pub fn stage_addition(&mut self, name: &str, oid: ObjectId) {
        self.removals.remove(name);
        self.additions.insert(name.to_string(), oid);
    }

    /// Stage a removal unconditionally
    pub fn stage_removal(&mut self, name: &str, oid: ObjectId) {
        self.additions.remove(name);
        self.removals.insert(name.to_string(), oid);
    }

    /// The blob map a commit on top of `head` would record
    pub fn fold(&self, head: &BlobMap) -> BlobMap {
        let mut blobs = head.clone();

        for (name, oid) in &self.additions {
            blobs.insert(name.clone(), oid.clone());
        }
        for name in self.removals.keys() {
            blobs.remove(name);
        }

        blobs
    }

    pub fn clear(&mut self) {
        self.additions.clear();
        self.removals.clear();
    }
}
