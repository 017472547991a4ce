//! Index entry representation
//!
//! Each entry tracks the staged blob for one file together with the size and
//! modification time observed when the file was read, which status uses to
//! detect changes.

use crate::artifacts::objects::REGULAR_FILE_MODE;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::fs::Metadata;
use std::time::UNIX_EPOCH;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct IndexEntry {
    /// Hash of the staged blob
    pub hash: ObjectId,
    /// Always "100644"
    pub mode: String,
    /// Byte length of the content
    pub size: u64,
    /// Modification time in milliseconds since the Unix epoch
    pub mtime: i64,
}

impl IndexEntry {
    pub fn from_metadata(hash: ObjectId, metadata: &Metadata) -> Self {
        IndexEntry::new(
            hash,
            REGULAR_FILE_MODE.to_string(),
            metadata.len(),
            mtime_millis(metadata),
        )
    }

    /// True when both the content hash and the modification time still match
    pub fn matches(&self, hash: &ObjectId, mtime: i64) -> bool {
        &self.hash == hash && self.mtime == mtime
    }
}

pub fn mtime_millis(metadata: &Metadata) -> i64 {
    metadata
        .modified()
        .ok()
        .and_then(|modified| modified.duration_since(UNIX_EPOCH).ok())
        .map(|duration| duration.as_millis() as i64)
        .unwrap_or_default()
}
