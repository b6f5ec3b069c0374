use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::{Status, StatusInfo};
use colored::Colorize;
use std::io::Write;

impl Repository {
    pub fn status(&mut self) -> anyhow::Result<()> {
        let refs = self.refs()?;
        let stage = self.stage()?;

        let status_info = Status::new(self).initialize(&refs, &stage)?;
        self.print_status(&status_info)
    }

    fn print_status(&self, status_info: &StatusInfo) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "=== Branches ===")?;
        for branch in &status_info.branches {
            if branch == &status_info.current {
                writeln!(writer, "{}", format!("*{branch}").green())?;
            } else {
                writeln!(writer, "{branch}")?;
            }
        }
        writeln!(writer)?;

        writeln!(writer, "=== Staged Files ===")?;
        for name in &status_info.staged {
            writeln!(writer, "{}", name.green())?;
        }
        writeln!(writer)?;

        writeln!(writer, "=== Removed Files ===")?;
        for name in &status_info.removed {
            writeln!(writer, "{}", name.red())?;
        }
        writeln!(writer)?;

        writeln!(writer, "=== Modifications Not Staged For Commit ===")?;
        for (name, change) in &status_info.unstaged {
            writeln!(writer, "{}", format!("{name} ({change})").red())?;
        }
        writeln!(writer)?;

        writeln!(writer, "=== Untracked Files ===")?;
        for name in &status_info.untracked {
            writeln!(writer, "{}", name.red())?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
