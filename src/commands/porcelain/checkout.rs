use crate::areas::repository::Repository;
use crate::areas::workspace::normalize_name;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::UserError;

impl Repository {
    /// Restore `file` as HEAD records it
    pub fn checkout_file(&mut self, file: &str) -> anyhow::Result<()> {
        let refs = self.refs()?;
        self.restore_file(refs.head(), file)
    }

    /// Restore `file` as the snapshot `commit` (full id or prefix) records it
    pub fn checkout_file_from(&mut self, commit: &str, file: &str) -> anyhow::Result<()> {
        self.refs()?;
        let snapshot_oid = self.resolve_snapshot_id(commit)?;
        self.restore_file(&snapshot_oid, file)
    }

    /// Make `branch` current and replace the tracked files with its tip's
    pub fn checkout_branch(&mut self, branch: &str) -> anyhow::Result<()> {
        let mut refs = self.refs()?;
        let name =
            BranchName::try_parse(branch.to_string()).map_err(|_| UserError::NoSuchBranch)?;

        let target_oid = refs.branch(&name).cloned().ok_or(UserError::NoSuchBranch)?;
        if refs.is_current_branch(&name) {
            return Err(UserError::AlreadyOnBranch.into());
        }

        let mut stage = self.stage()?;
        let current = self.head_snapshot(&refs)?;
        let target = self.database().load_snapshot(&target_oid)?;

        Migration::new(self, current.blobs(), target.blobs()).apply_changes()?;

        refs.switch_branch(&name)?;
        stage.clear();
        self.save_refs(&refs)?;
        self.save_stage(&stage)?;

        tracing::debug!(branch = %name, head = %target_oid.to_short_oid(), "switched branch");
        Ok(())
    }

    // The stage is left alone: a restored file simply stops differing from
    // whatever it was compared against.
    fn restore_file(&self, snapshot_oid: &ObjectId, file: &str) -> anyhow::Result<()> {
        let name = normalize_name(file)?;
        let snapshot = self.database().load_snapshot(snapshot_oid)?;
        let blob_oid = snapshot.blob_oid(&name).ok_or(UserError::FileNotInCommit)?;
        let blob = self.database().load_blob(blob_oid)?;

        self.workspace().write_file(&name, blob.content())?;
        tracing::debug!(file = %name, from = %snapshot_oid.to_short_oid(), "restored file");

        Ok(())
    }
}
