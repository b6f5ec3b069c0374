use crate::areas::refs::Refs;
use crate::areas::repository::Repository;
use crate::areas::stage::Stage;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::snapshot::Snapshot;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use crate::artifacts::status::inspector::Inspector;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};

pub type ChangeSet = BTreeMap<String, WorkspaceChangeType>;
pub type FileSet = BTreeSet<String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub branches: Vec<BranchName>,
    pub current: BranchName,
    pub staged: FileSet,
    pub removed: FileSet,
    pub unstaged: ChangeSet,
    pub untracked: FileSet,
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl<'r> Status<'r> {
    pub fn initialize(&self, refs: &Refs, stage: &Stage) -> anyhow::Result<StatusInfo> {
        let head = self.repository.head_snapshot(refs)?;
        let inspector = Inspector::new(self.repository);
        let files = self
            .repository
            .workspace()
            .list_files()?
            .into_iter()
            .collect::<FileSet>();

        let unstaged = self.check_tracked_files(&head, stage, &inspector)?;
        let untracked = files
            .into_iter()
            .filter(|name| {
                (!head.tracks(name) && !stage.is_staged_for_addition(name))
                    || stage.is_staged_for_removal(name)
            })
            .collect();

        Ok(StatusInfo {
            branches: refs.branches().keys().cloned().collect(),
            current: refs.current().clone(),
            staged: stage.additions().keys().cloned().collect(),
            removed: stage.removals().keys().cloned().collect(),
            unstaged,
            untracked,
        })
    }

    // Staged files are compared with their staged blob, everything else
    // HEAD tracks with its committed blob.
    fn check_tracked_files(
        &self,
        head: &Snapshot,
        stage: &Stage,
        inspector: &Inspector,
    ) -> anyhow::Result<ChangeSet> {
        let mut changes = ChangeSet::new();

        for (name, oid) in stage.additions() {
            if let Some(change) = inspector.check_workspace_against(name, oid)? {
                changes.insert(name.clone(), change);
            }
        }

        for (name, oid) in head.blobs() {
            if stage.is_staged_for_addition(name) || stage.is_staged_for_removal(name) {
                continue;
            }

            if let Some(change) = inspector.check_workspace_against(name, oid)? {
                changes.insert(name.clone(), change);
            }
        }

        Ok(changes)
    }
}
