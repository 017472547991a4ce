//! Plumbing commands (low-level object access)
//!
//! - `cat_file`: Print a stored object
//! - `hash_object`: Hash a file, optionally storing it as a blob

pub mod cat_file;
pub mod hash_object;
