use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::snapshot::BlobMap;
use crate::errors::UserError;
use anyhow::Context;
use std::collections::HashMap;

/// Type of file system action required for checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    /// Create or overwrite a file from a blob
    Write,
    /// Delete a file the target no longer tracks
    Delete,
}

/// Set of planned actions grouped by type
pub type ActionsSet = HashMap<ActionType, Vec<(String, Option<ObjectId>)>>;

/// Working files that are untracked in `tracked` but that writing `incoming`
/// would clobber
///
/// Besides an exact name match, an untracked file is in the way when it sits
/// inside a directory that `incoming` needs as a file, or when it stands
/// where `incoming` needs a directory.
pub fn untracked_collisions(
    workspace: &dyn Workspace,
    tracked: &BlobMap,
    incoming: &BlobMap,
) -> anyhow::Result<Vec<String>> {
    Ok(workspace
        .list_files()?
        .into_iter()
        .filter(|name| !tracked.contains_key(name) && blocks(name, incoming))
        .collect())
}

fn blocks(name: &str, incoming: &BlobMap) -> bool {
    let inside_incoming_file = name
        .match_indices('/')
        .any(|(index, _)| incoming.contains_key(&name[..index]));
    let dir_prefix = format!("{name}/");
    let where_incoming_dir = incoming.keys().any(|other| other.starts_with(&dir_prefix));

    incoming.contains_key(name) || inside_incoming_file || where_incoming_dir
}

/// Plans and executes the move from one snapshot's files to another's
pub struct Migration<'r> {
    repository: &'r Repository,
    current: &'r BlobMap,
    target: &'r BlobMap,
    actions: ActionsSet,
}

impl<'r> Migration<'r> {
    pub fn new(repository: &'r Repository, current: &'r BlobMap, target: &'r BlobMap) -> Self {
        let actions = HashMap::from([
            (ActionType::Write, Vec::new()),
            (ActionType::Delete, Vec::new()),
        ]);

        Self {
            repository,
            current,
            target,
            actions,
        }
    }

    pub fn apply_changes(&mut self) -> anyhow::Result<()> {
        self.plan_changes()?;
        self.update_workspace()?;

        Ok(())
    }

    fn plan_changes(&mut self) -> anyhow::Result<()> {
        let collisions =
            untracked_collisions(self.repository.workspace(), self.current, self.target)?;

        if !collisions.is_empty() {
            tracing::debug!(files = ?collisions, "untracked files block checkout");
            return Err(UserError::UntrackedFileInTheWay.into());
        }

        for (name, oid) in self.target {
            self.record_change(ActionType::Write, name, Some(oid));
        }

        for name in self.current.keys() {
            if !self.target.contains_key(name) {
                self.record_change(ActionType::Delete, name, None);
            }
        }

        Ok(())
    }

    fn record_change(&mut self, action: ActionType, name: &str, oid: Option<&ObjectId>) {
        self.actions
            .entry(action)
            .or_default()
            .push((name.to_string(), oid.cloned()));
    }

    // Deletions run before writes: a path may switch between file and directory
    fn update_workspace(&self) -> anyhow::Result<()> {
        let workspace = self.repository.workspace();

        for (name, _) in self.planned(ActionType::Delete) {
            workspace.remove_file(name)?;
        }

        for (name, oid) in self.planned(ActionType::Write) {
            let oid = oid
                .as_ref()
                .with_context(|| format!("no blob planned for {name}"))?;
            let blob = self.repository.database().load_blob(oid)?;

            workspace.write_file(name, blob.content())?;
        }

        tracing::debug!(
            written = self.planned(ActionType::Write).len(),
            deleted = self.planned(ActionType::Delete).len(),
            "migrated working files"
        );

        Ok(())
    }

    fn planned(&self, action: ActionType) -> &[(String, Option<ObjectId>)] {
        self.actions.get(&action).map(Vec::as_slice).unwrap_or_default()
    }
}
