//! Version-control data structures and algorithms
//!
//! - `branch`: Branch names
//! - `index`: Staging area entries
//! - `log`: Commit history traversal
//! - `objects`: Object types (blob, tree, commit) and their hashing
//! - `status`: Working tree status inspection
//! - `sync`: Wire payloads, push collection and replay of remote history

pub mod branch;
pub mod index;
pub mod log;
pub mod objects;
pub mod status;
pub mod sync;
