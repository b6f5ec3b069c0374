use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::{Migration, untracked_collisions};
use crate::artifacts::merge::merge_base::HistoryGraph;
use crate::artifacts::merge::three_way::ThreeWayMerge;
use crate::artifacts::objects::snapshot::{Snapshot, SnapshotKind};
use crate::errors::UserError;
use anyhow::Context;
use std::io::Write;

const FAST_FORWARD_NOTICE: &str = "Current branch fast-forwarded.";
const CONFLICT_NOTICE: &str = "Encountered a merge conflict.";

impl Repository {
    /// Merge the tip of `branch` into the current branch
    ///
    /// Conflicts do not stop the merge: each conflicted file is written with
    /// both sides and staged, and the merge snapshot is committed regardless.
    pub fn merge(&mut self, branch: &str) -> anyhow::Result<()> {
        let mut refs = self.refs()?;
        let mut stage = self.stage()?;

        let name =
            BranchName::try_parse(branch.to_string()).map_err(|_| UserError::UnknownBranch)?;
        if refs.is_current_branch(&name) {
            return Err(UserError::SelfMerge.into());
        }
        let other_oid = refs.branch(&name).cloned().ok_or(UserError::UnknownBranch)?;
        if !stage.is_empty() {
            return Err(UserError::UncommittedChanges.into());
        }

        let head_oid = refs.head().clone();
        let graph = HistoryGraph::new(|oid| {
            let snapshot = self.database().load_snapshot(oid)?;
            Ok(snapshot.parents().into_iter().cloned().collect())
        });
        let base_oid = graph
            .merge_base(&head_oid, &other_oid)?
            .with_context(|| format!("{head_oid} and {other_oid} share no history"))?;

        if base_oid == other_oid {
            return Err(UserError::AncestorMerge.into());
        }

        let head = self.database().load_snapshot(&head_oid)?;
        let other = self.database().load_snapshot(&other_oid)?;

        if base_oid == head_oid {
            Migration::new(self, head.blobs(), other.blobs()).apply_changes()?;

            refs.set_head(other_oid.clone());
            self.save_refs(&refs)?;

            tracing::debug!(branch = %refs.current(), to = %other_oid.to_short_oid(), "fast-forwarded");
            writeln!(self.writer(), "{FAST_FORWARD_NOTICE}")?;
            return Ok(());
        }

        if !untracked_collisions(self.workspace(), head.blobs(), other.blobs())?.is_empty() {
            return Err(UserError::UntrackedFileInTheWay.into());
        }

        let base = self.database().load_snapshot(&base_oid)?;
        let conflicts =
            ThreeWayMerge::new(self, base.blobs(), head.blobs(), other.blobs()).apply(&mut stage)?;
        for _ in &conflicts {
            writeln!(self.writer(), "{CONFLICT_NOTICE}")?;
        }

        let snapshot = Snapshot::new(
            SnapshotKind::Merge {
                parent: head_oid,
                merge_parent: other_oid,
            },
            format!("Merged {name} into {}.", refs.current()),
            Snapshot::timestamp_from_env(),
            stage.fold(head.blobs()),
        );
        let merge_oid = self.write_commit(&snapshot, &mut refs, &mut stage)?;

        tracing::debug!(
            oid = %merge_oid.to_short_oid(),
            base = %base_oid.to_short_oid(),
            conflicts = ?conflicts,
            "merged branch"
        );
        Ok(())
    }
}
