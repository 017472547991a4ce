//! gith: a minimal distributed version-control client
//!
//! - `areas`: on-disk stores (objects, index, refs, config) and the remote client
//! - `artifacts`: data structures and algorithms working over those stores
//! - `commands`: the operations exposed on the command line
//! - `errors`: matchable error types

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
