//! Content-addressable object store
//!
//! Objects live under `objects/<first 2 hex chars>/<remaining 38 hex chars>`,
//! one object per file, written verbatim. A lookup for a hash that is not on
//! disk yields `None` rather than an error: callers decide whether a miss is a
//! history boundary (log) or a fatal hole (push).

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable, hash_raw};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Store raw bytes under the SHA-1 of the bytes themselves
    pub fn put(&self, content: &[u8]) -> anyhow::Result<ObjectId> {
        let object_id = hash_raw(content);
        self.put_as(&object_id, content)?;

        Ok(object_id)
    }

    /// Store an object under the identifier its kind's hash scheme produces
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        self.put_as(&object_id, &object.serialize()?)?;

        Ok(object_id)
    }

    /// Store bytes under a caller-declared identifier
    ///
    /// Writing an identifier that is already present is a no-op.
    pub fn put_as(&self, object_id: &ObjectId, content: &[u8]) -> anyhow::Result<()> {
        let object_path = self.path.join(object_id.to_path());

        // write the object to disk unless it already exists
        if !object_path.exists() {
            std::fs::create_dir_all(
                object_path
                    .parent()
                    .context(format!("Invalid object path {}", object_path.display()))?,
            )
            .context(format!(
                "Unable to create object directory {}",
                object_path.display()
            ))?;

            self.write_object(object_path, content)?;
            tracing::trace!(oid = %object_id, "object written");
        }

        Ok(())
    }

    pub fn get(&self, object_id: &ObjectId) -> anyhow::Result<Option<Bytes>> {
        let object_path = self.path.join(object_id.to_path());

        match std::fs::read(&object_path) {
            Ok(content) => Ok(Some(Bytes::from(content))),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error).context(format!(
                "Unable to read object file {}",
                object_path.display()
            )),
        }
    }

    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    pub fn load_blob(&self, object_id: &ObjectId) -> anyhow::Result<Option<Blob>> {
        self.load(object_id)
    }

    pub fn load_tree(&self, object_id: &ObjectId) -> anyhow::Result<Option<Tree>> {
        self.load(object_id)
    }

    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        self.load(object_id)
    }

    fn load<T: Unpackable>(&self, object_id: &ObjectId) -> anyhow::Result<Option<T>> {
        self.get(object_id)?
            .map(|content| {
                T::deserialize(content).context(format!("Unable to parse object {object_id}"))
            })
            .transpose()
    }

    fn write_object(&self, object_path: PathBuf, content: &[u8]) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(content).context(format!(
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

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
