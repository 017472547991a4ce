//! Commit history traversal
//!
//! `rev_list` follows first-parent links from a starting commit towards the
//! root. The walk is iterative and keeps a visited set, so a corrupted parent
//! pointer that loops back ends the walk instead of repeating commits.
//!
//! Two miss policies are supported:
//! - lenient (`log`): a commit missing from the object store is treated as the
//!   edge of locally known history and ends the walk
//! - strict (`push`): a missing commit is a hole in required history and fails
//!   with `ObjectNotFound`

pub mod rev_list;
