use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::{HashScheme, ObjectType};
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};

pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    fn deserialize(content: Bytes) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn object_id(&self) -> Result<ObjectId> {
        let content = self.serialize()?;
        let object_type = self.object_type();

        Ok(match object_type.hash_scheme() {
            HashScheme::Raw => hash_raw(&content),
            HashScheme::LengthPrefixed => hash_with_header(object_type, &content),
        })
    }
}

/// Hash used for blobs and trees: SHA-1 over the content bytes alone.
pub fn hash_raw(content: &[u8]) -> ObjectId {
    let mut hasher = Sha1::new();
    hasher.update(content);

    ObjectId::from_digest(&hasher.finalize())
}

/// Hash used for commits: SHA-1 over `<type> <byte length>\0<content>`.
pub fn hash_with_header(object_type: ObjectType, content: &[u8]) -> ObjectId {
    let mut hasher = Sha1::new();
    hasher.update(format!("{} {}\0", object_type.as_str(), content.len()).as_bytes());
    hasher.update(content);

    ObjectId::from_digest(&hasher.finalize())
}
