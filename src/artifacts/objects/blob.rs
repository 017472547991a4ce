//! Blob object
//!
//! Blobs store file content. They contain only the raw file bytes,
//! without any metadata like filename or mode (those live in trees and the index).

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(self.content.clone())
    }
}

impl Unpackable for Blob {
    fn deserialize(content: Bytes) -> anyhow::Result<Self> {
        Ok(Self::new(content))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }
}
