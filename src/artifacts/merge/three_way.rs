use crate::areas::repository::Repository;
use crate::areas::stage::Stage;
use crate::artifacts::merge::resolution::{Resolution, conflict_content, resolve};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::snapshot::BlobMap;
use bytes::Bytes;
use std::collections::BTreeSet;

/// Applies the resolution table to every file the three snapshots track
pub struct ThreeWayMerge<'r> {
    repository: &'r Repository,
    base: &'r BlobMap,
    head: &'r BlobMap,
    other: &'r BlobMap,
}

impl<'r> ThreeWayMerge<'r> {
    pub fn new(
        repository: &'r Repository,
        base: &'r BlobMap,
        head: &'r BlobMap,
        other: &'r BlobMap,
    ) -> Self {
        Self {
            repository,
            base,
            head,
            other,
        }
    }

    /// Every file needing action, in name order
    pub fn plan(&self) -> Vec<(String, Resolution)> {
        let names = self
            .base
            .keys()
            .chain(self.head.keys())
            .chain(self.other.keys())
            .collect::<BTreeSet<_>>();

        names
            .into_iter()
            .map(|name| {
                let resolution = resolve(
                    self.base.get(name),
                    self.head.get(name),
                    self.other.get(name),
                );
                (name.clone(), resolution)
            })
            .filter(|(_, resolution)| resolution != &Resolution::Unchanged)
            .collect()
    }

    /// Update working files and `stage`; returns the conflicted file names
    pub fn apply(&self, stage: &mut Stage) -> anyhow::Result<Vec<String>> {
        let mut conflicts = Vec::new();

        // removals first: a path may switch between file and directory
        let (removals, updates): (Vec<_>, Vec<_>) = self
            .plan()
            .into_iter()
            .partition(|(_, resolution)| matches!(resolution, Resolution::Remove(_)));

        for (name, resolution) in removals.into_iter().chain(updates) {
            tracing::debug!(file = %name, ?resolution, "merging file");

            match resolution {
                Resolution::Unchanged => {}
                Resolution::TakeOther(oid) => {
                    let content = self.load_content(Some(&oid))?;
                    self.repository.workspace().write_file(&name, &content)?;
                    stage.stage_addition(&name, oid);
                }
                Resolution::Remove(oid) => {
                    self.repository.workspace().remove_file(&name)?;
                    stage.stage_removal(&name, oid);
                }
                Resolution::Conflict { head, other } => {
                    let content = conflict_content(
                        &self.load_content(head.as_ref())?,
                        &self.load_content(other.as_ref())?,
                    );
                    let blob = Blob::new(content);
                    let oid = self.repository.database().store(&blob)?;

                    self.repository
                        .workspace()
                        .write_file(&name, blob.content())?;
                    stage.stage_addition(&name, oid);
                    conflicts.push(name);
                }
            }
        }

        Ok(conflicts)
    }

    fn load_content(&self, oid: Option<&ObjectId>) -> anyhow::Result<Bytes> {
        match oid {
            Some(oid) => Ok(self.repository.database().load_blob(oid)?.into_content()),
            None => Ok(Bytes::new()),
        }
    }
}
