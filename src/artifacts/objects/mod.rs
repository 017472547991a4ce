//! Object types stored in the object database
//!
//! Three kinds of objects are stored, each identified by a SHA-1 hash:
//!
//! - **Blob**: File content (raw bytes)
//! - **Tree**: Sorted manifest of `(mode, kind, hash, path)` lines, one per file
//! - **Commit**: Snapshot with metadata (tree, optional parent, author, committer, message)
//!
//! Objects are stored verbatim; no type header and no compression is written to disk.
//! Blobs and trees are identified by the hash of their raw bytes, commits by the hash
//! of `commit <size>\0<content>`. See [`object::hash_raw`] and [`object::hash_with_header`].

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// The only file mode recorded by the index and trees
pub const REGULAR_FILE_MODE: &str = "100644";
