use crate::areas::database::Database;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::snapshot::Snapshot;
use derive_new::new;

/// First-parent history, newest first
///
/// Merge parents are never followed, so a merged branch's own commits do not
/// show up.
#[derive(Clone, new)]
pub struct RevList<'r> {
    database: &'r Database,
    start: ObjectId,
}

impl<'r> IntoIterator for RevList<'r> {
    type Item = anyhow::Result<(ObjectId, Snapshot)>;
    type IntoIter = RevListIntoIter<'r>;

    fn into_iter(self) -> Self::IntoIter {
        RevListIntoIter {
            database: self.database,
            current_oid: Some(self.start),
        }
    }
}

#[derive(Clone)]
pub struct RevListIntoIter<'r> {
    database: &'r Database,
    current_oid: Option<ObjectId>,
}

impl Iterator for RevListIntoIter<'_> {
    type Item = anyhow::Result<(ObjectId, Snapshot)>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = self.current_oid.take()?;

        match self.database.load_snapshot(&oid) {
            Ok(snapshot) => {
                // Move to the first parent for the next iteration
                self.current_oid = snapshot.parent().cloned();
                Some(Ok((oid, snapshot)))
            }
            // a broken link ends the walk after reporting it
            Err(error) => Some(Err(error)),
        }
    }
}
