use crate::areas::refs::Refs;
use crate::areas::repository::Repository;
use crate::areas::stage::Stage;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::snapshot::Snapshot;
use crate::errors::UserError;
use std::io::Write;

impl Repository {
    pub fn init(&mut self) -> anyhow::Result<()> {
        if self.is_initialized()? {
            return Err(UserError::AlreadyInitialized.into());
        }

        self.state().bootstrap()?;
        self.database().bootstrap()?;

        let root_oid = self.database().store(&Snapshot::root())?;
        let refs = Refs::new(BranchName::default_branch(), root_oid);

        self.save_stage(&Stage::default())?;
        self.save_refs(&refs)?;

        tracing::debug!(path = %self.path().display(), head = %refs.head(), "initialized repository");
        writeln!(
            self.writer(),
            "Initialized empty sprig repository in {}",
            self.path().display()
        )?;

        Ok(())
    }
}
