use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use derive_new::new;

#[derive(new)]
pub struct Inspector<'r> {
    repository: &'r Repository,
}

impl<'r> Inspector<'r> {
    /// Blob a working file would be stored as
    pub fn parse_blob(&self, name: &str) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.repository.workspace().read_file(name)?))
    }

    /// Compare the working copy of `name` with the blob `expected`
    pub fn check_workspace_against(
        &self,
        name: &str,
        expected: &ObjectId,
    ) -> anyhow::Result<Option<WorkspaceChangeType>> {
        if !self.repository.workspace().exists(name) {
            return Ok(Some(WorkspaceChangeType::Deleted));
        }

        if &self.parse_blob(name)?.object_id()? != expected {
            Ok(Some(WorkspaceChangeType::Modified))
        } else {
            Ok(None)
        }
    }
}
