use crate::areas::database::{Database, FsObjectStore, MemoryObjectStore, ObjectStore};
use crate::areas::refs::{HEAD_REF_NAME, Refs};
use crate::areas::stage::Stage;
use crate::areas::state::{FsStateStore, MemoryStateStore, StateStore};
use crate::areas::workspace::{FsWorkspace, MemoryWorkspace, REPOSITORY_DIR, Workspace};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::snapshot::Snapshot;
use crate::errors::UserError;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::Path;

/// A repository: object store, refs, stage and working files
///
/// Every backend is injected, so the same commands run against the
/// filesystem or entirely in memory.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    workspace: Box<dyn Workspace>,
    state: Box<dyn StateStore>,
}

impl Repository {
    /// Open (or prepare to `init`) the repository rooted at `path`
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path);

        if !path.exists() {
            std::fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory {}", path.display()))?;
        }
        let path = path.canonicalize()?;

        let database = Database::new(Box::new(FsObjectStore::new(
            path.join(REPOSITORY_DIR).join("objects").into_boxed_path(),
        )));
        let workspace = Box::new(FsWorkspace::new(path.clone().into_boxed_path()));
        let state = Box::new(FsStateStore::new(
            path.join(REPOSITORY_DIR).into_boxed_path(),
        ));

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            database,
            workspace,
            state,
        })
    }

    /// A repository living entirely in process memory
    pub fn in_memory(writer: Box<dyn std::io::Write>) -> Self {
        Self::with_backends(
            Path::new("."),
            writer,
            Box::new(MemoryObjectStore::new()),
            Box::new(MemoryWorkspace::new()),
            Box::new(MemoryStateStore::new()),
        )
    }

    pub fn with_backends(
        path: &Path,
        writer: Box<dyn std::io::Write>,
        store: Box<dyn ObjectStore>,
        workspace: Box<dyn Workspace>,
        state: Box<dyn StateStore>,
    ) -> Self {
        Repository {
            path: path.to_path_buf().into_boxed_path(),
            writer: RefCell::new(writer),
            database: Database::new(store),
            workspace,
            state,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &dyn Workspace {
        self.workspace.as_ref()
    }

    pub fn state(&self) -> &dyn StateStore {
        self.state.as_ref()
    }

    pub fn is_initialized(&self) -> anyhow::Result<bool> {
        Ok(self.state.read(HEAD_REF_NAME)?.is_some())
    }

    pub fn refs(&self) -> anyhow::Result<Refs> {
        Refs::load(self.state())
    }

    pub fn save_refs(&self, refs: &Refs) -> anyhow::Result<()> {
        tracing::debug!(branch = %refs.current(), head = %refs.head(), "saving refs");
        refs.save(self.state())
    }

    pub fn stage(&self) -> anyhow::Result<Stage> {
        Stage::load(self.state())
    }

    pub fn save_stage(&self, stage: &Stage) -> anyhow::Result<()> {
        tracing::trace!(
            additions = stage.additions().len(),
            removals = stage.removals().len(),
            "saving stage"
        );
        stage.save(self.state())
    }

    pub fn head_snapshot(&self, refs: &Refs) -> anyhow::Result<Snapshot> {
        self.database.load_snapshot(refs.head())
    }

    /// Resolve a full or abbreviated snapshot id
    ///
    /// Only snapshots are candidates, so a blob sharing the prefix never makes
    /// it ambiguous.
    pub fn resolve_snapshot_id(&self, prefix: &str) -> anyhow::Result<ObjectId> {
        let mut candidates = self.database.find_snapshots_by_prefix(prefix)?;

        match candidates.len() {
            0 => Err(UserError::UnknownCommit.into()),
            1 => Ok(candidates.remove(0)),
            _ => {
                tracing::debug!(
                    prefix,
                    candidates = ?candidates.iter().map(ObjectId::to_short_oid).collect::<Vec<_>>(),
                    "ambiguous snapshot prefix"
                );
                Err(UserError::AmbiguousCommit(prefix.to_string()).into())
            }
        }
    }
}
