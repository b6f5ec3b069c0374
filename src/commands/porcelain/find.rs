use crate::areas::repository::Repository;
use crate::errors::UserError;
use std::io::Write;

impl Repository {
    /// Print the id of every snapshot whose message is exactly `message`
    pub fn find(&mut self, message: &str) -> anyhow::Result<()> {
        self.refs()?;

        let mut matches = Vec::new();
        for oid in self.database().snapshot_ids()? {
            if self.database().load_snapshot(&oid)?.message() == message {
                matches.push(oid);
            }
        }

        if matches.is_empty() {
            return Err(UserError::NoCommitWithMessage.into());
        }

        let mut writer = self.writer();
        for oid in matches {
            writeln!(writer, "{oid}")?;
        }

        Ok(())
    }
}
