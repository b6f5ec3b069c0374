use crate::areas::refs::Refs;
use crate::areas::repository::Repository;
use crate::areas::stage::Stage;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::snapshot::{Snapshot, SnapshotKind};
use crate::errors::UserError;
use std::io::Write;

impl Repository {
    pub fn commit(&mut self, message: &str) -> anyhow::Result<ObjectId> {
        let mut refs = self.refs()?;
        let mut stage = self.stage()?;

        if stage.is_empty() {
            return Err(UserError::NothingToCommit.into());
        }
        if message.is_empty() {
            return Err(UserError::EmptyMessage.into());
        }

        let head = self.head_snapshot(&refs)?;
        let snapshot = Snapshot::new(
            SnapshotKind::Normal {
                parent: refs.head().clone(),
            },
            message.to_string(),
            Snapshot::timestamp_from_env(),
            stage.fold(head.blobs()),
        );
        let commit_oid = self.write_commit(&snapshot, &mut refs, &mut stage)?;

        writeln!(
            self.writer(),
            "[{} {}] {}",
            refs.current(),
            commit_oid.to_short_oid(),
            message.lines().next().unwrap_or_default()
        )?;

        Ok(commit_oid)
    }

    /// Store `snapshot`, advance the current branch to it and empty the stage
    pub(crate) fn write_commit(
        &self,
        snapshot: &Snapshot,
        refs: &mut Refs,
        stage: &mut Stage,
    ) -> anyhow::Result<ObjectId> {
        let commit_oid = self.database().store(snapshot)?;

        refs.set_head(commit_oid.clone());
        stage.clear();

        self.save_refs(refs)?;
        self.save_stage(stage)?;

        tracing::debug!(
            branch = %refs.current(),
            oid = %commit_oid.to_short_oid(),
            files = snapshot.blobs().len(),
            "wrote commit"
        );

        Ok(commit_oid)
    }
}
