//! Porcelain commands (user-facing operations)
//!
//! ## Local commands
//!
//! - `init`: Create the `.gith` skeleton
//! - `add`: Stage files
//! - `commit`: Turn the index into a commit on the current branch
//! - `status`: Compare the index with the working tree
//! - `log`: Show the current branch's history
//! - `config`: Read and write configuration keys
//! - `remote`: Manage remote records
//!
//! ## Synchronization
//!
//! - `clone`: Build a repository from a remote snapshot
//! - `push`: Send local-only commits
//! - `pull`: Fast-forward to the remote's commits and reconcile the working tree

pub mod add;
pub mod clone;
pub mod commit;
pub mod config;
pub mod init;
pub mod log;
pub mod pull;
pub mod push;
pub mod remote;
pub mod status;
