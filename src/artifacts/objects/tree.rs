//! Tree object
//!
//! A tree is the flat manifest of every file in one commit. There are no nested
//! trees: each entry carries the full root-relative path with `/` separators.
//!
//! ## Format
//!
//! One entry per line, lines joined with `\n`:
//!
//! ```text
//! <mode> blob <blob-sha>\t<path>
//! ```

use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeEntry {
    pub mode: String,
    pub oid: ObjectId,
    pub path: String,
}

impl TreeEntry {
    fn line(&self) -> String {
        format!(
            "{} {} {}\t{}",
            self.mode,
            ObjectType::Blob,
            self.oid,
            self.path
        )
    }

    fn parse_line(line: &str) -> anyhow::Result<Self> {
        let (header, path) = line
            .split_once('\t')
            .context(format!("Invalid tree entry: missing path in '{line}'"))?;

        let mut fields = header.split(' ');
        let mode = fields.next().context("Invalid tree entry: missing mode")?;
        let kind = fields.next().context("Invalid tree entry: missing kind")?;
        let oid = fields.next().context("Invalid tree entry: missing hash")?;

        if ObjectType::try_from(kind)? != ObjectType::Blob {
            anyhow::bail!("Invalid tree entry: unsupported kind '{kind}'");
        }

        Ok(TreeEntry::new(
            mode.to_string(),
            ObjectId::try_parse(oid.to_string())?,
            path.to_string(),
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// Build a tree from staged index entries
    ///
    /// Entries are ordered by their serialized line before hashing.
    pub fn from_index<'e>(entries: impl IntoIterator<Item = (&'e String, &'e IndexEntry)>) -> Self {
        let mut entries = entries
            .into_iter()
            .map(|(path, entry)| TreeEntry::new(entry.mode.clone(), entry.hash.clone(), path.clone()))
            .collect::<Vec<_>>();
        entries.sort_by_key(|entry| entry.line());

        Tree { entries }
    }

    /// Build a tree from a file list received from a remote
    ///
    /// Entries are ordered by path.
    pub fn from_files(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        Tree { entries }
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let content = self
            .entries
            .iter()
            .map(TreeEntry::line)
            .collect::<Vec<_>>()
            .join("\n");

        Ok(Bytes::from(content))
    }
}

impl Unpackable for Tree {
    fn deserialize(content: Bytes) -> anyhow::Result<Self> {
        let content = std::str::from_utf8(&content).context("Invalid tree object: not UTF-8")?;

        let entries = content
            .lines()
            .filter(|line| !line.is_empty())
            .map(TreeEntry::parse_line)
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::REGULAR_FILE_MODE;
    use crate::artifacts::objects::object::hash_raw;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn entry(content: &str) -> IndexEntry {
        IndexEntry::new(
            hash_raw(content.as_bytes()),
            REGULAR_FILE_MODE.to_string(),
            content.len() as u64,
            0,
        )
    }

    #[test]
    fn tree_from_index_is_sorted_by_serialized_line() {
        let mut staged = BTreeMap::new();
        staged.insert("b.txt".to_string(), entry("hello"));
        staged.insert("a.txt".to_string(), entry("world"));

        let tree = Tree::from_index(&staged);
        let lines = String::from_utf8(tree.serialize().unwrap().to_vec()).unwrap();
        let mut sorted = lines.lines().map(str::to_string).collect::<Vec<_>>();
        sorted.sort();

        assert_eq!(lines.lines().collect::<Vec<_>>(), sorted);
    }

    #[test]
    fn tree_from_files_is_sorted_by_path() {
        let tree = Tree::from_files(vec![
            TreeEntry::new("100644".into(), hash_raw(b"1"), "z/last.txt".into()),
            TreeEntry::new("100644".into(), hash_raw(b"2"), "a.txt".into()),
        ]);

        let paths = tree.entries().iter().map(|e| e.path.as_str()).collect::<Vec<_>>();
        assert_eq!(paths, vec!["a.txt", "z/last.txt"]);
    }

    #[test]
    fn serialized_tree_parses_back_with_nested_paths() {
        let tree = Tree::from_files(vec![
            TreeEntry::new("100644".into(), hash_raw(b"x"), "dir/with space.txt".into()),
            TreeEntry::new("100644".into(), hash_raw(b"y"), "top.txt".into()),
        ]);

        let parsed = Tree::deserialize(tree.serialize().unwrap()).unwrap();

        assert_eq!(parsed, tree);
        assert_eq!(parsed.object_id().unwrap(), tree.object_id().unwrap());
    }

    #[test]
    fn tree_hash_is_sha1_of_serialized_text() {
        let tree = Tree::from_files(vec![TreeEntry::new(
            "100644".into(),
            hash_raw(b"hello"),
            "a.txt".into(),
        )]);

        let expected = hash_raw(
            b"100644 blob aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d\ta.txt",
        );
        assert_eq!(tree.object_id().unwrap(), expected);
    }

    #[test]
    fn non_blob_entries_are_rejected() {
        let content = Bytes::from_static(
            b"040000 tree aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d\tdir",
        );

        assert!(Tree::deserialize(content).is_err());
    }
}
