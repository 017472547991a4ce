//! Command implementations
//!
//! - `plumbing`: Low-level object access (cat-file, hash-object)
//! - `porcelain`: User-facing workflows (add, commit, log, clone, push, pull, ...)
//!
//! Each command is an async method on `Repository` writing its user-facing
//! output to the repository's writer.

pub mod plumbing;
pub mod porcelain;
