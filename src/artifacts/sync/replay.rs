use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object::Packable;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Tree, TreeEntry};
use crate::artifacts::sync::collector::commit_files;
use crate::artifacts::sync::transfer::{RemoteCommit, RemoteFile};
use crate::errors::RepositoryError;
use std::collections::BTreeSet;
use std::path::{Component, Path};

/// Persist one received commit with its blobs and tree
///
/// Every object is stored under the identifier the remote declared for it, so
/// later exchanges refer to the same hashes. Callers replay commits oldest
/// first, which keeps parents on disk before their children.
pub fn persist_commit(database: &Database, commit: &RemoteCommit) -> anyhow::Result<()> {
    let mut entries = Vec::with_capacity(commit.files.len());

    for file in &commit.files {
        if !file.content_matches_hash() {
            tracing::warn!(
                path = %file.path,
                hash = %file.hash,
                "received content does not match its declared hash, storing it under the declared hash"
            );
        }
        database.put_as(&file.hash, file.content.as_bytes())?;
        entries.push(TreeEntry::new(
            file.mode.clone(),
            file.hash.clone(),
            file.path.clone(),
        ));
    }

    let tree = Tree::from_files(entries);
    database.put_as(&commit.tree_hash, &tree.serialize()?)?;
    database.put_as(&commit.sha, &commit.to_commit().serialize()?)?;

    tracing::debug!(sha = %commit.sha, files = commit.files.len(), "replayed commit");
    Ok(())
}

/// Refuse to move `branch` from `local` unless the received chain extends it
///
/// The chain extends the local tip when it contains that tip or starts right
/// after it. Anything else means the histories diverged.
pub fn ensure_fast_forward(
    branch: &str,
    local: Option<&ObjectId>,
    commits: &[RemoteCommit],
    remote_head: &ObjectId,
) -> Result<(), RepositoryError> {
    let Some(local) = local else {
        return Ok(());
    };

    let contains_local = commits.iter().any(|commit| &commit.sha == local);
    let extends_local = commits
        .first()
        .is_none_or(|first| first.parent_sha.as_ref() == Some(local));

    if local == remote_head || contains_local || extends_local {
        Ok(())
    } else {
        Err(RepositoryError::Diverged {
            branch: branch.to_string(),
            local: local.to_string(),
            remote: remote_head.to_string(),
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub written: Vec<String>,
    pub removed: Vec<String>,
}

/// Make the working tree hold exactly the files of commit `head`
pub fn checkout(
    database: &Database,
    workspace: &Workspace,
    head: &ObjectId,
) -> anyhow::Result<Reconciliation> {
    let files = commit_files(database, head)?;
    reconcile(workspace, &files)
}

/// Write every file in `files` and delete every other working tree file
///
/// Ignored directories are neither written nor scanned.
pub fn reconcile(workspace: &Workspace, files: &[RemoteFile]) -> anyhow::Result<Reconciliation> {
    let mut reconciliation = Reconciliation::default();
    let mut wanted = BTreeSet::new();

    for file in files {
        if !is_plain_relative(&file.path) || Workspace::is_ignored(&file.path) {
            tracing::warn!(path = %file.path, "skipping file outside the working tree");
            continue;
        }

        workspace.write_file(&file.path, file.content.as_bytes())?;
        wanted.insert(file.path.as_str());
        reconciliation.written.push(file.path.clone());
    }

    for path in workspace.list_files()? {
        if !wanted.contains(path.as_str()) {
            workspace.remove_file(&path)?;
            reconciliation.removed.push(path);
        }
    }

    tracing::debug!(
        written = reconciliation.written.len(),
        removed = reconciliation.removed.len(),
        "working tree reconciled"
    );
    Ok(reconciliation)
}

fn is_plain_relative(path: &str) -> bool {
    !path.is_empty()
        && Path::new(path)
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}
