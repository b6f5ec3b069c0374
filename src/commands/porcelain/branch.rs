use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::UserError;

impl Repository {
    /// Create `name` pointing at HEAD; the current branch does not change
    pub fn branch(&mut self, name: &str) -> anyhow::Result<()> {
        let mut refs = self.refs()?;
        let name = BranchName::try_parse(name.to_string())?;
        let head = refs.head().clone();

        refs.create_branch(name.clone(), head)?;
        self.save_refs(&refs)?;

        tracing::debug!(branch = %name, "created branch");
        Ok(())
    }

    /// Delete the branch pointer only; its snapshots stay in the store
    pub fn rm_branch(&mut self, name: &str) -> anyhow::Result<()> {
        let mut refs = self.refs()?;
        let name = BranchName::try_parse(name.to_string()).map_err(|_| UserError::UnknownBranch)?;

        let tip = refs.delete_branch(&name)?;
        self.save_refs(&refs)?;

        tracing::debug!(branch = %name, tip = %tip.to_short_oid(), "deleted branch");
        Ok(())
    }
}
