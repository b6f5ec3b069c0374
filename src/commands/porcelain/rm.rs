use crate::areas::repository::Repository;
use crate::areas::workspace::normalize_name;

impl Repository {
    pub fn rm(&mut self, file: &str) -> anyhow::Result<()> {
        let refs = self.refs()?;
        let name = normalize_name(file)?;

        let mut stage = self.stage()?;
        let head = self.head_snapshot(&refs)?;

        if stage.remove(&name, head.blob_oid(&name))? {
            self.workspace().remove_file(&name)?;
            tracing::debug!(file = %name, "staged removal");
        }

        self.save_stage(&stage)
    }
}
