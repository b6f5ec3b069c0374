use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;

impl Repository {
    /// Check out every file of the snapshot `commit` and move the current
    /// branch there
    ///
    /// Any other branch whose tip was the old HEAD moves along with it.
    pub fn reset(&mut self, commit: &str) -> anyhow::Result<()> {
        let mut refs = self.refs()?;
        let target_oid = self.resolve_snapshot_id(commit)?;

        let mut stage = self.stage()?;
        let current = self.head_snapshot(&refs)?;
        let target = self.database().load_snapshot(&target_oid)?;

        Migration::new(self, current.blobs(), target.blobs()).apply_changes()?;

        let previous_head = refs.head().clone();
        let carried = refs
            .branches()
            .iter()
            .filter(|(_, tip)| **tip == previous_head)
            .map(|(name, _)| name.clone())
            .collect::<Vec<_>>();
        for name in &carried {
            refs.move_branch(name, target_oid.clone())?;
        }

        stage.clear();
        self.save_refs(&refs)?;
        self.save_stage(&stage)?;

        tracing::debug!(
            from = %previous_head.to_short_oid(),
            to = %target_oid.to_short_oid(),
            branches = ?carried,
            "reset branches"
        );
        Ok(())
    }
}
