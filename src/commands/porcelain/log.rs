use crate::areas::repository::Repository;
use crate::artifacts::log::format_entry;
use crate::artifacts::log::rev_list::RevList;
use std::io::Write;

impl Repository {
    /// History of the current branch, newest first, along first parents
    pub fn log(&mut self) -> anyhow::Result<()> {
        let refs = self.refs()?;

        for entry in RevList::new(self.database(), refs.head().clone()) {
            let (oid, snapshot) = entry?;
            write!(self.writer(), "{}", format_entry(&oid, &snapshot))?;
        }

        Ok(())
    }

    /// Every snapshot ever stored, in id order
    pub fn global_log(&mut self) -> anyhow::Result<()> {
        self.refs()?;

        for oid in self.database().snapshot_ids()? {
            let snapshot = self.database().load_snapshot(&oid)?;
            write!(self.writer(), "{}", format_entry(&oid, &snapshot))?;
        }

        Ok(())
    }
}
