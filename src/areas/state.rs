//! Small mutable repository state (refs and the stage)
//!
//! A [`StateStore`] is a flat key -> bytes map. Keys use `/` separators, so
//! `refs/heads/feature/x` maps to nested directories on disk.

use anyhow::Context;
use bytes::Bytes;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub trait StateStore {
    /// Prepare the backing storage; called once by `init`
    fn bootstrap(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn read(&self, key: &str) -> anyhow::Result<Option<Bytes>>;

    fn write(&self, key: &str, data: &[u8]) -> anyhow::Result<()>;

    /// Remove `key`; absent keys are not an error
    fn remove(&self, key: &str) -> anyhow::Result<()>;

    /// Every key under `prefix/`, sorted
    fn keys(&self, prefix: &str) -> anyhow::Result<Vec<String>>;
}

/// State files under the `.sprig` directory
#[derive(Debug)]
pub struct FsStateStore {
    path: Box<Path>,
}

impl FsStateStore {
    pub fn new(path: Box<Path>) -> Self {
        FsStateStore { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn key_path(&self, key: &str) -> PathBuf {
        key.split('/')
            .fold(self.path.to_path_buf(), |path, part| path.join(part))
    }

    // Drop directories left empty by a removal, stopping at the store root
    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        let mut current = path.parent();

        while let Some(dir) = current {
            if dir == self.path.as_ref() || !dir.starts_with(&self.path) {
                break;
            }

            let is_empty = std::fs::read_dir(dir)
                .with_context(|| format!("failed to read directory at {:?}", dir))?
                .next()
                .is_none();
            if !is_empty {
                break;
            }

            std::fs::remove_dir(dir)
                .with_context(|| format!("failed to remove empty directory at {:?}", dir))?;
            current = dir.parent();
        }

        Ok(())
    }
}

impl StateStore for FsStateStore {
    fn bootstrap(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.path)
            .with_context(|| format!("failed to create state directory at {:?}", self.path))
    }

    fn read(&self, key: &str) -> anyhow::Result<Option<Bytes>> {
        let path = self.key_path(key);
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read(&path)
            .with_context(|| format!("failed to read state file at {:?}", path))?;

        Ok(Some(content.into()))
    }

    fn write(&self, key: &str, data: &[u8]) -> anyhow::Result<()> {
        let path = self.key_path(key);

        // create all the parent directories if they don't exist
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for state file at {:?}",
                path
            )
        })?)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("failed to open state file at {:?}", path))?;
        file.write_all(data)
            .with_context(|| format!("failed to write state file at {:?}", path))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(());
        }

        std::fs::remove_file(&path)
            .with_context(|| format!("failed to remove state file at {:?}", path))?;

        self.prune_empty_parent_dirs(&path)
    }

    fn keys(&self, prefix: &str) -> anyhow::Result<Vec<String>> {
        let root = self.key_path(prefix);
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in WalkDir::new(&root) {
            let entry = entry.with_context(|| format!("failed to walk {:?}", root))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(&self.path)?;
            let key = relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            keys.push(key);
        }

        keys.sort();
        Ok(keys)
    }
}

/// State kept in process memory
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    entries: RefCell<BTreeMap<String, Bytes>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn read(&self, key: &str) -> anyhow::Result<Option<Bytes>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, data: &[u8]) -> anyhow::Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), Bytes::copy_from_slice(data));
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self, prefix: &str) -> anyhow::Result<Vec<String>> {
        let prefix = format!("{}/", prefix.trim_end_matches('/'));

        Ok(self
            .entries
            .borrow()
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect())
    }
}
