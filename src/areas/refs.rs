//! References (HEAD, branches, remote-tracking refs)
//!
//! - HEAD: symbolic reference to the current branch (`ref: refs/heads/<name>`)
//! - Branches: `refs/heads/<name>` holding the tip commit hash
//! - Remote-tracking refs: `refs/remotes/<remote>/<name>` holding the last head
//!   exchanged with that remote
//!
//! A branch whose ref file is absent (or empty) has no commits yet.
//! Access is single-process and sequential; ref files are written under an
//! exclusive file lock but nothing coordinates concurrent writers.

use crate::artifacts::branch::branch_name::{BranchName, REF_PREFIX};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.gith`)
    path: Box<Path>,
}

impl Refs {
    /// Name of the branch HEAD points at
    ///
    /// Falls back to the default branch when HEAD is absent or malformed.
    pub fn current_branch(&self) -> anyhow::Result<BranchName> {
        let head_path = self.head_path();
        if !head_path.exists() {
            return Ok(BranchName::default());
        }

        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read HEAD at {:?}", head_path))?;
        let symref = regex::Regex::new(SYMREF_REGEX)?
            .captures(content.trim())
            .map(|captures| captures[1].to_string());

        let branch = symref
            .as_deref()
            .map(|target| target.strip_prefix(REF_PREFIX).unwrap_or(target))
            .and_then(|target| target.rsplit('/').next())
            .and_then(|name| BranchName::try_parse(name.to_string()).ok());

        Ok(branch.unwrap_or_default())
    }

    pub fn set_head(&self, branch_name: &BranchName) -> anyhow::Result<()> {
        self.update_ref_file(
            &self.head_path(),
            format!("ref: {}\n", branch_name.to_ref_path()),
        )
    }

    /// Tip commit of a branch, `None` if the branch has no commits
    pub fn tip(&self, branch_name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        self.read_ref_file(&self.heads_path().join(branch_name.as_ref()))
    }

    /// Point a branch at a new commit, creating the ref file if needed
    pub fn advance(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        tracing::debug!(branch = %branch_name, oid = %oid, "advancing branch");
        self.update_ref_file(
            &self.heads_path().join(branch_name.as_ref()),
            format!("{oid}\n"),
        )
    }

    pub fn remote_tip(
        &self,
        remote: &str,
        branch_name: &BranchName,
    ) -> anyhow::Result<Option<ObjectId>> {
        self.read_ref_file(&self.remotes_path().join(remote).join(branch_name.as_ref()))
    }

    pub fn advance_remote(
        &self,
        remote: &str,
        branch_name: &BranchName,
        oid: &ObjectId,
    ) -> anyhow::Result<()> {
        self.update_ref_file(
            &self.remotes_path().join(remote).join(branch_name.as_ref()),
            format!("{oid}\n"),
        )
    }

    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();

        WalkDir::new(&heads_path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| {
                let relative_path = entry
                    .path()
                    .strip_prefix(&heads_path)
                    .with_context(|| format!("invalid branch path {:?}", entry.path()))?;
                BranchName::try_parse(relative_path.to_string_lossy().replace('\\', "/"))
            })
            .collect()
    }

    fn read_ref_file(&self, path: &Path) -> anyhow::Result<Option<ObjectId>> {
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ref file at {:?}", path))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        ObjectId::try_parse(content.to_string())
            .map(Some)
            .with_context(|| format!("invalid ref file at {:?}", path))
    }

    fn update_ref_file(&self, path: &Path, raw_ref: String) -> anyhow::Result<()> {
        // create all the parent directories if they don't exist
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join("HEAD").into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }

    pub fn tags_path(&self) -> Box<Path> {
        self.refs_path().join("tags").into_boxed_path()
    }

    pub fn remotes_path(&self) -> Box<Path> {
        self.refs_path().join("remotes").into_boxed_path()
    }
}
