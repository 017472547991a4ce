//! Core repository components
//!
//! This module contains the fundamental building blocks of a repository:
//!
//! - `config`: Local and global configuration files, including remotes
//! - `context`: Explicit process context (directories and environment)
//! - `database`: Content-addressable object store for blobs, trees, and commits
//! - `index`: Staging area for tracking file changes
//! - `refs`: Reference management (HEAD, branches, remote-tracking refs)
//! - `remote`: HTTP client for the remote repository service
//! - `repository`: High-level repository operations and coordination
//! - `workspace`: Working directory file system operations

pub mod config;
pub mod context;
pub mod database;
pub mod index;
pub mod refs;
pub mod remote;
pub mod repository;
pub mod workspace;
