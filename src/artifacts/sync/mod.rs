//! Synchronization with a remote repository service
//!
//! - `transfer`: JSON payloads exchanged with the remote (camelCase on the wire)
//! - `collector`: walks local history into the batch a push transmits
//! - `replay`: persists received commits, checks fast-forwards and
//!   reconciles the working tree with a commit's file set
//!
//! Every step runs sequentially in history order. Commits are persisted
//! parent-before-child, and refs only move once a commit and its ancestry are
//! on disk.

pub mod collector;
pub mod replay;
pub mod transfer;

/// Action attached to every file sent or received
pub const ADDED_ACTION: &str = "added";
