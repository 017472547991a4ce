use crate::areas::repository::Repository;
use crate::artifacts::objects::object::hash_raw;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use std::io::Write;

impl Repository {
    pub async fn hash_object(&self, object_path: &str, write: bool) -> anyhow::Result<ObjectId> {
        let path = self.context().resolve(object_path);
        let content = std::fs::read(&path)
            .with_context(|| format!("could not open '{object_path}' for reading"))?;

        let object_id = if write {
            self.database().put(&content)?
        } else {
            hash_raw(&content)
        };

        writeln!(self.writer(), "{object_id}")?;

        Ok(object_id)
    }
}
