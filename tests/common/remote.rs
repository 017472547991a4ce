use chrono::DateTime;
use gith::artifacts::objects::REGULAR_FILE_MODE;
use gith::artifacts::objects::commit::{Author, Commit};
use gith::artifacts::objects::object::{Object, hash_raw};
use gith::artifacts::objects::tree::{Tree, TreeEntry};
use gith::artifacts::sync::transfer::{RemoteCommit, RemoteFile};
use serde_json::{Value, json};

pub const REPOSITORY_ID: &str = "repo-1";

/// A commit as the remote service would send it, with consistent hashes
pub fn remote_commit(parent: Option<&RemoteCommit>, files: &[(&str, &str)], message: &str) -> RemoteCommit {
    let remote_files = files
        .iter()
        .map(|(path, content)| {
            RemoteFile::added(
                path.to_string(),
                content.to_string(),
                hash_raw(content.as_bytes()),
                REGULAR_FILE_MODE.to_string(),
            )
        })
        .collect::<Vec<_>>();
    let tree = Tree::from_files(
        remote_files
            .iter()
            .map(|file| TreeEntry::new(file.mode.clone(), file.hash.clone(), file.path.clone()))
            .collect(),
    );

    let timestamp = DateTime::parse_from_rfc3339("2024-01-01T12:00:00+00:00").expect("valid timestamp");
    let author = Author::new_with_timestamp(
        "Remote User".to_string(),
        "remote@example.com".to_string(),
        timestamp,
    );
    let commit = Commit::new(
        parent.map(|parent| parent.sha.clone()),
        tree.object_id().expect("tree hash"),
        author,
        message.to_string(),
    );

    RemoteCommit::from_commit(commit.object_id().expect("commit hash"), &commit, remote_files)
}

pub fn clone_response(commits: &[RemoteCommit]) -> Value {
    let head = commits.last().map(|commit| commit.sha.to_string());

    json!({
        "repository": {"id": REPOSITORY_ID, "name": "demo"},
        "branches": [{"name": "main", "headCommit": head}],
        "commits": commits,
        "defaultBranch": "main",
        "headCommit": head,
    })
}

pub fn pull_response(commits: &[RemoteCommit]) -> Value {
    json!({
        "hasNewCommits": !commits.is_empty(),
        "newCommitsCount": commits.len(),
        "commits": commits,
        "headCommit": commits.last().map(|commit| commit.sha.to_string()),
    })
}

pub fn clone_path() -> String {
    format!("/api/repositories/{REPOSITORY_ID}/clone")
}

pub fn pull_path() -> String {
    format!("/api/repositories/{REPOSITORY_ID}/pull")
}

pub fn push_path() -> String {
    format!("/api/repositories/{REPOSITORY_ID}/push")
}
