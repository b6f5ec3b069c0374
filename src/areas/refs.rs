//! Branches and HEAD
//!
//! The ref table maps branch names to snapshot ids and records which branch
//! is current. HEAD is always attached: the head snapshot is whatever the
//! current branch points at.
//!
//! ## Storage
//!
//! - `HEAD` holds `ref: refs/heads/<current branch>`
//! - `refs/heads/<name>` holds the 40-character tip id of each branch
//!
//! The table is loaded whole, mutated in memory and saved whole, so commands
//! can validate every precondition before anything is written.

use crate::areas::state::StateStore;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::UserError;
use anyhow::Context;
use std::collections::BTreeMap;

/// Regex pattern for parsing the attached HEAD
const SYMREF_REGEX: &str = r"^ref: refs/heads/(.+)$";

/// Key of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Key prefix shared by all branch references
pub const HEADS_PREFIX: &str = "refs/heads";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refs {
    current: BranchName,
    branches: BTreeMap<BranchName, ObjectId>,
}

impl Refs {
    /// A table with a single branch, made current
    pub fn new(current: BranchName, head: ObjectId) -> Self {
        Refs {
            branches: BTreeMap::from([(current.clone(), head)]),
            current,
        }
    }

    pub fn load(state: &dyn StateStore) -> anyhow::Result<Self> {
        let head = state
            .read(HEAD_REF_NAME)?
            .ok_or(UserError::NotInitialized)?;
        let head = String::from_utf8(head.to_vec()).context("HEAD is not valid UTF-8")?;

        let symref_match = regex::Regex::new(SYMREF_REGEX)?
            .captures(head.trim())
            .with_context(|| format!("HEAD is not attached to a branch: {}", head.trim()))?;
        let current = BranchName::try_parse(symref_match[1].to_string())?;

        let mut branches = BTreeMap::new();
        for key in state.keys(HEADS_PREFIX)? {
            let name = key
                .strip_prefix(HEADS_PREFIX)
                .and_then(|name| name.strip_prefix('/'))
                .with_context(|| format!("unexpected ref key {key}"))?;
            let content = state
                .read(&key)?
                .with_context(|| format!("ref {key} vanished while loading"))?;
            let oid = String::from_utf8(content.to_vec())
                .with_context(|| format!("ref {key} is not valid UTF-8"))?;

            branches.insert(
                BranchName::try_parse(name.to_string())?,
                ObjectId::try_parse(oid.trim().to_string())?,
            );
        }

        if !branches.contains_key(&current) {
            anyhow::bail!("HEAD points at missing branch {current}");
        }

        Ok(Refs { current, branches })
    }

    pub fn save(&self, state: &dyn StateStore) -> anyhow::Result<()> {
        for key in state.keys(HEADS_PREFIX)? {
            let stale = key
                .strip_prefix(HEADS_PREFIX)
                .and_then(|name| name.strip_prefix('/'))
                .is_none_or(|name| !self.branches.keys().any(|branch| branch.as_ref() == name));
            if stale {
                state.remove(&key)?;
            }
        }

        for (name, oid) in &self.branches {
            state.write(&Self::branch_key(name), oid.as_ref().as_bytes())?;
        }

        state.write(
            HEAD_REF_NAME,
            format!("ref: {}\n", Self::branch_key(&self.current)).as_bytes(),
        )
    }

    pub fn current(&self) -> &BranchName {
        &self.current
    }

    /// Tip of the current branch
    pub fn head(&self) -> &ObjectId {
        // the current branch is always present in the table
        &self.branches[&self.current]
    }

    pub fn branches(&self) -> &BTreeMap<BranchName, ObjectId> {
        &self.branches
    }

    pub fn branch(&self, name: &BranchName) -> Option<&ObjectId> {
        self.branches.get(name)
    }

    pub fn is_current_branch(&self, name: &BranchName) -> bool {
        &self.current == name
    }

    /// Point the current branch at `oid`
    pub fn set_head(&mut self, oid: ObjectId) {
        self.branches.insert(self.current.clone(), oid);
    }

    pub fn create_branch(&mut self, name: BranchName, oid: ObjectId) -> anyhow::Result<()> {
        if self.branches.contains_key(&name) {
            return Err(UserError::BranchExists.into());
        }
        // refs/heads/a and refs/heads/a/b cannot both exist on disk
        if let Some(existing) = self.branches.keys().find(|existing| {
            Self::is_path_prefix(existing.as_ref(), name.as_ref())
                || Self::is_path_prefix(name.as_ref(), existing.as_ref())
        }) {
            return Err(UserError::BranchPathConflict(existing.to_string()).into());
        }

        self.branches.insert(name, oid);
        Ok(())
    }

    pub fn delete_branch(&mut self, name: &BranchName) -> anyhow::Result<ObjectId> {
        if self.is_current_branch(name) {
            return Err(UserError::CannotRemoveCurrentBranch.into());
        }

        self.branches
            .remove(name)
            .ok_or_else(|| UserError::UnknownBranch.into())
    }

    pub fn move_branch(&mut self, name: &BranchName, oid: ObjectId) -> anyhow::Result<()> {
        let tip = self
            .branches
            .get_mut(name)
            .ok_or(UserError::UnknownBranch)?;
        *tip = oid;

        Ok(())
    }

    /// Make `name` the current branch
    pub fn switch_branch(&mut self, name: &BranchName) -> anyhow::Result<()> {
        if !self.branches.contains_key(name) {
            return Err(UserError::NoSuchBranch.into());
        }

        self.current = name.clone();
        Ok(())
    }

    fn is_path_prefix(parent: &str, name: &str) -> bool {
        name.strip_prefix(parent)
            .is_some_and(|rest| rest.starts_with('/'))
    }

    fn branch_key(name: &BranchName) -> String {
        format!("{HEADS_PREFIX}/{name}")
    }
}
