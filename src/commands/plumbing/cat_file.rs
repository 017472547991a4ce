use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use std::io::Write;

impl Repository {
    /// Print an object's stored bytes
    pub async fn cat_file(&self, object_id: &str) -> anyhow::Result<()> {
        let oid = ObjectId::try_parse(object_id.to_string())
            .with_context(|| format!("Not a valid object name {object_id}"))?;
        let content = self
            .database()
            .get(&oid)?
            .with_context(|| format!("Not a valid object name {object_id}"))?;

        self.writer().write_all(&content)?;

        Ok(())
    }
}
