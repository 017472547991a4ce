//! Index (staging area) data structures
//!
//! The index file is a single JSON object mapping root-relative paths to
//! [`index_entry::IndexEntry`] values:
//!
//! ```text
//! {"a.txt": {"hash": "...", "mode": "100644", "size": 5, "mtime": 1700000000000}}
//! ```
//!
//! It is always rewritten as a whole; there are no partial or append writes.

pub mod index_entry;
