//! Working tree status inspection
//!
//! Status compares the staging index against the working tree. Every path
//! lands in exactly one of four states, which are displayed in three buckets:
//!
//! - "Changes to be committed": staged
//! - "Changes not staged for commit": modified and deleted
//! - "Untracked files": untracked
//!
//! ## Components
//!
//! - `file_change`: the per-path state and its labels
//! - `inspector`: classification of a single path
//! - `status_info`: the aggregated, ordered result

pub mod file_change;
pub mod inspector;
pub mod status_info;
