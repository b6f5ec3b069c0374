use crate::areas::repository::Repository;
use crate::areas::workspace::normalize_name;
use crate::artifacts::objects::object::Object;
use crate::artifacts::status::inspector::Inspector;
use crate::errors::UserError;

impl Repository {
    pub fn add(&mut self, file: &str) -> anyhow::Result<()> {
        let refs = self.refs()?;
        let name = normalize_name(file)?;

        if !self.workspace().exists(&name) {
            return Err(UserError::MissingFile.into());
        }

        let mut stage = self.stage()?;
        let head = self.head_snapshot(&refs)?;

        let blob = Inspector::new(self).parse_blob(&name)?;
        let oid = blob.object_id()?;

        // content identical to HEAD's is never stored again
        if stage.add(&name, oid.clone(), head.blob_oid(&name)) {
            self.database().store(&blob)?;
        }
        tracing::debug!(file = %name, oid = %oid.to_short_oid(), "staged file");

        self.save_stage(&stage)
    }
}
