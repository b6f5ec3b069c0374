//! Object store
//!
//! An [`ObjectStore`] maps framed record bytes to their SHA-1 id. Writes are
//! idempotent: storing bytes that are already present is a no-op returning
//! the existing id. [`Database`] sits on top and speaks in typed records.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::snapshot::Snapshot;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

/// Content-addressed byte storage
pub trait ObjectStore {
    /// Prepare the backing storage; called once by `init`
    fn bootstrap(&self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Store framed record bytes and return their id
    fn put(&self, data: Bytes) -> anyhow::Result<ObjectId>;

    fn get(&self, object_id: &ObjectId) -> anyhow::Result<Bytes>;

    fn contains(&self, object_id: &ObjectId) -> anyhow::Result<bool>;

    /// Every stored id, in id order
    fn object_ids(&self) -> anyhow::Result<Vec<ObjectId>>;
}

/// Records as zlib-compressed files under `.sprig/objects/xx/yyyy...`
#[derive(Debug)]
pub struct FsObjectStore {
    path: Box<Path>,
}

impl FsObjectStore {
    pub fn new(path: Box<Path>) -> Self {
        FsObjectStore { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        std::fs::create_dir_all(object_dir).context(format!(
            "Unable to create object directory {}",
            object_dir.display()
        ))?;

        let temp_object_path = object_dir.join(Self::generate_temp_name());
        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}

impl ObjectStore for FsObjectStore {
    fn bootstrap(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.path).context(format!(
            "Unable to create objects directory {}",
            self.path.display()
        ))
    }

    fn put(&self, data: Bytes) -> anyhow::Result<ObjectId> {
        let object_id = ObjectId::from_content(&data);
        let object_path = self.path.join(object_id.to_path());

        // write the object to disk unless it already exists
        if !object_path.exists() {
            self.write_object(object_path, data)?;
        }

        Ok(object_id)
    }

    fn get(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        self.read_object(self.path.join(object_id.to_path()))
    }

    fn contains(&self, object_id: &ObjectId) -> anyhow::Result<bool> {
        Ok(self.path.join(object_id.to_path()).is_file())
    }

    fn object_ids(&self) -> anyhow::Result<Vec<ObjectId>> {
        let mut object_ids = Vec::new();

        for i in 0..=255 {
            let dir_name = format!("{:02x}", i);
            let dir_path = self.path.join(&dir_name);

            if !dir_path.is_dir() {
                continue;
            }

            for entry in std::fs::read_dir(&dir_path)? {
                let entry = entry?;
                let file_name = entry.file_name();
                let full_oid = format!("{}{}", dir_name, file_name.to_string_lossy());

                // leftover temp files are not objects
                if let Ok(oid) = ObjectId::try_parse(full_oid) {
                    object_ids.push(oid);
                }
            }
        }

        object_ids.sort();
        Ok(object_ids)
    }
}

/// Records kept in process memory, for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RefCell<BTreeMap<ObjectId, Bytes>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn put(&self, data: Bytes) -> anyhow::Result<ObjectId> {
        let object_id = ObjectId::from_content(&data);
        self.objects
            .borrow_mut()
            .entry(object_id.clone())
            .or_insert(data);

        Ok(object_id)
    }

    fn get(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        self.objects
            .borrow()
            .get(object_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("object {object_id} not found"))
    }

    fn contains(&self, object_id: &ObjectId) -> anyhow::Result<bool> {
        Ok(self.objects.borrow().contains_key(object_id))
    }

    fn object_ids(&self) -> anyhow::Result<Vec<ObjectId>> {
        Ok(self.objects.borrow().keys().cloned().collect())
    }
}

/// Typed access to an [`ObjectStore`]
pub struct Database {
    store: Box<dyn ObjectStore>,
}

impl Database {
    pub fn new(store: Box<dyn ObjectStore>) -> Self {
        Database { store }
    }

    pub fn bootstrap(&self) -> anyhow::Result<()> {
        self.store.bootstrap()
    }

    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = self.store.put(object.serialize()?)?;
        tracing::trace!(oid = %object_id, kind = %object.object_type(), "stored object");

        Ok(object_id)
    }

    pub fn contains(&self, object_id: &ObjectId) -> anyhow::Result<bool> {
        self.store.contains(object_id)
    }

    pub fn load_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Blob::deserialize(object_reader),
            other => anyhow::bail!("object {object_id} is a {other}, not a blob"),
        }
    }

    pub fn load_snapshot(&self, object_id: &ObjectId) -> anyhow::Result<Snapshot> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Snapshot => Snapshot::deserialize(object_reader),
            other => anyhow::bail!("object {object_id} is a {other}, not a snapshot"),
        }
    }

    pub fn object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.parse_object_as_bytes(object_id)?;
        Ok(object_type)
    }

    /// Ids of every stored snapshot, in id order
    pub fn snapshot_ids(&self) -> anyhow::Result<Vec<ObjectId>> {
        self.store
            .object_ids()?
            .into_iter()
            .filter_map(|oid| match self.object_type(&oid) {
                Ok(ObjectType::Snapshot) => Some(Ok(oid)),
                Ok(_) => None,
                Err(error) => Some(Err(error)),
            })
            .collect()
    }

    /// Snapshot ids that begin with `prefix`
    ///
    /// More than one match means the prefix is ambiguous.
    pub fn find_snapshots_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        if !ObjectId::is_valid_prefix(prefix) {
            return Ok(Vec::new());
        }

        Ok(self
            .snapshot_ids()?
            .into_iter()
            .filter(|oid| oid.starts_with(prefix))
            .collect())
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, Cursor<Bytes>)> {
        let object_content = self.store.get(object_id)?;
        let mut object_reader = Cursor::new(object_content);

        let object_type = ObjectType::parse_object_type(&mut object_reader)?;

        Ok((object_type, object_reader))
    }
}
