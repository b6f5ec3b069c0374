use anyhow::Context;
use bytes::Bytes;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Directory holding repository metadata, never listed as a working file
pub const REPOSITORY_DIR: &str = ".sprig";

const IGNORED_PATHS: [&str; 3] = [REPOSITORY_DIR, ".", ".."];

/// The user's working files, addressed by `/`-separated relative names
pub trait Workspace {
    /// Every regular file, sorted by name
    fn list_files(&self) -> anyhow::Result<Vec<String>>;

    fn exists(&self, name: &str) -> bool;

    fn read_file(&self, name: &str) -> anyhow::Result<Bytes>;

    /// Create or overwrite `name`, creating parent directories as needed
    fn write_file(&self, name: &str, data: &[u8]) -> anyhow::Result<()>;

    /// Delete `name`; absent files are not an error
    fn remove_file(&self, name: &str) -> anyhow::Result<()>;
}

/// Normalize a user-supplied path into a workspace name
///
/// `./a//b.txt` and `a/b.txt` name the same file. Paths escaping the
/// workspace or pointing into the repository directory are rejected, and so
/// are names containing a newline, which snapshot records cannot hold.
pub fn normalize_name(name: &str) -> anyhow::Result<String> {
    if name.contains('\n') {
        anyhow::bail!("file name {name:?} contains a newline");
    }

    let mut parts = Vec::new();

    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => anyhow::bail!("path {name} is outside the working directory"),
        }
    }

    if parts.is_empty() {
        anyhow::bail!("empty file name");
    }
    if IGNORED_PATHS.contains(&parts[0].as_str()) {
        anyhow::bail!("path {name} is inside the repository directory");
    }

    Ok(parts.join("/"))
}

#[derive(Debug)]
pub struct FsWorkspace {
    path: Box<Path>,
}

impl FsWorkspace {
    pub fn new(path: Box<Path>) -> Self {
        FsWorkspace { path }
    }

    fn file_path(&self, name: &str) -> PathBuf {
        name.split('/')
            .fold(self.path.to_path_buf(), |path, part| path.join(part))
    }

    fn is_ignored(path: &Path) -> bool {
        path.components().any(|component| {
            if let Component::Normal(name) = component {
                let name_str = name.to_string_lossy();
                IGNORED_PATHS.contains(&name_str.as_ref())
            } else {
                false
            }
        })
    }

    fn check_if_not_ignored_file_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(self.path.as_ref()).ok()?;

        if path.is_file() && !Self::is_ignored(relative) {
            Some(
                relative
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/"),
            )
        } else {
            None
        }
    }

    // Remove directories emptied by a deletion, never the workspace root
    fn remove_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        let mut current = path.parent();

        while let Some(dir) = current {
            if dir == self.path.as_ref() || !dir.starts_with(&self.path) {
                break;
            }

            let is_empty = std::fs::read_dir(dir)
                .with_context(|| format!("Failed to read directory: {:?}", dir))?
                .next()
                .is_none();
            if !is_empty {
                break;
            }

            std::fs::remove_dir(dir)
                .with_context(|| format!("Failed to remove directory: {:?}", dir))?;
            current = dir.parent();
        }

        Ok(())
    }
}

impl Workspace for FsWorkspace {
    fn list_files(&self) -> anyhow::Result<Vec<String>> {
        let mut files = WalkDir::new(&self.path)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !IGNORED_PATHS.contains(&entry.file_name().to_string_lossy().as_ref())
            })
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| self.check_if_not_ignored_file_path(entry.path()))
            .collect::<Vec<_>>();

        files.sort();
        Ok(files)
    }

    fn exists(&self, name: &str) -> bool {
        self.file_path(name).is_file()
    }

    fn read_file(&self, name: &str) -> anyhow::Result<Bytes> {
        let file_path = self.file_path(name);

        let content = std::fs::read(&file_path)
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(content.into())
    }

    fn write_file(&self, name: &str, data: &[u8]) -> anyhow::Result<()> {
        let file_path = self.file_path(name);

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        if file_path.is_dir() {
            anyhow::bail!("Cannot write file over existing directory: {:?}", name);
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&file_path)
            .with_context(|| format!("Failed to open file: {:?}", name))?;

        file.write_all(data)
            .with_context(|| format!("Failed to write to file: {:?}", name))?;

        Ok(())
    }

    fn remove_file(&self, name: &str) -> anyhow::Result<()> {
        let file_path = self.file_path(name);
        if !file_path.is_file() {
            return Ok(());
        }

        std::fs::remove_file(&file_path)
            .with_context(|| format!("Failed to remove file: {:?}", name))?;

        self.remove_empty_parent_dirs(&file_path)
    }
}

/// Working files kept in process memory
#[derive(Debug, Default)]
pub struct MemoryWorkspace {
    files: RefCell<BTreeMap<String, Bytes>>,
}

impl MemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Workspace for MemoryWorkspace {
    fn list_files(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.files.borrow().keys().cloned().collect())
    }

    fn exists(&self, name: &str) -> bool {
        self.files.borrow().contains_key(name)
    }

    fn read_file(&self, name: &str) -> anyhow::Result<Bytes> {
        self.files
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Failed to read file: {name:?}"))
    }

    fn write_file(&self, name: &str, data: &[u8]) -> anyhow::Result<()> {
        let mut files = self.files.borrow_mut();

        let dir_prefix = format!("{name}/");
        if files.keys().any(|other| other.starts_with(&dir_prefix)) {
            anyhow::bail!("Cannot write file over existing directory: {:?}", name);
        }
        if let Some((index, _)) = name
            .match_indices('/')
            .find(|(index, _)| files.contains_key(&name[..*index]))
        {
            anyhow::bail!("Failed to create directory: {:?}", &name[..index]);
        }

        files.insert(name.to_string(), Bytes::copy_from_slice(data));
        Ok(())
    }

    fn remove_file(&self, name: &str) -> anyhow::Result<()> {
        self.files.borrow_mut().remove(name);
        Ok(())
    }
}
