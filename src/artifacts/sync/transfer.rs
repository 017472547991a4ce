use crate::artifacts::objects::REGULAR_FILE_MODE;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object::hash_raw;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::sync::ADDED_ACTION;
use chrono::{DateTime, FixedOffset};
use derive_new::new;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct RemoteUser {
    pub name: String,
    pub email: String,
}

impl From<&Author> for RemoteUser {
    fn from(author: &Author) -> Self {
        RemoteUser::new(author.name().to_string(), author.email().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    pub path: String,
    pub content: String,
    pub hash: ObjectId,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_action")]
    pub action: String,
}

impl RemoteFile {
    pub fn added(path: String, content: String, hash: ObjectId, mode: String) -> Self {
        RemoteFile {
            path,
            content,
            hash,
            mode,
            action: ADDED_ACTION.to_string(),
        }
    }

    /// Whether the content hashes to the declared blob id
    pub fn content_matches_hash(&self) -> bool {
        hash_raw(self.content.as_bytes()) == self.hash
    }
}

fn default_mode() -> String {
    REGULAR_FILE_MODE.to_string()
}

fn default_action() -> String {
    ADDED_ACTION.to_string()
}

/// One commit together with its complete file list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCommit {
    pub sha: ObjectId,
    pub message: String,
    pub author: RemoteUser,
    pub committer: RemoteUser,
    pub timestamp: DateTime<FixedOffset>,
    pub tree_hash: ObjectId,
    #[serde(default)]
    pub parent_sha: Option<ObjectId>,
    #[serde(default)]
    pub files: Vec<RemoteFile>,
}

impl RemoteCommit {
    pub fn from_commit(sha: ObjectId, commit: &Commit, files: Vec<RemoteFile>) -> Self {
        RemoteCommit {
            sha,
            message: commit.message().to_string(),
            author: commit.author().into(),
            committer: commit.committer().into(),
            timestamp: commit.timestamp(),
            tree_hash: commit.tree_oid().clone(),
            parent_sha: commit.parent().cloned(),
            files,
        }
    }

    /// Rebuild the commit object this payload describes
    pub fn to_commit(&self) -> Commit {
        let author = Author::new_with_timestamp(
            self.author.name.clone(),
            self.author.email.clone(),
            self.timestamp,
        );
        let committer = Author::new_with_timestamp(
            self.committer.name.clone(),
            self.committer.email.clone(),
            self.timestamp,
        );

        Commit::new(
            self.parent_sha.clone(),
            self.tree_hash.clone(),
            author,
            self.message.clone(),
        )
        .with_committer(committer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteBranch {
    pub name: String,
    #[serde(default)]
    pub head_commit: Option<ObjectId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemoteRepository {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Full repository snapshot returned for a clone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneResponse {
    #[serde(default)]
    pub repository: RemoteRepository,
    #[serde(default)]
    pub branches: Vec<RemoteBranch>,
    /// Oldest first
    #[serde(default)]
    pub commits: Vec<RemoteCommit>,
    pub default_branch: String,
    #[serde(default)]
    pub head_commit: Option<ObjectId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct PushRequest {
    /// Oldest first
    pub commits: Vec<RemoteCommit>,
    pub branch: String,
    pub user: RemoteUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushResponse {
    #[serde(default)]
    pub commits_created: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub branch: String,
    pub current_commit: Option<ObjectId>,
    pub user_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullResponse {
    pub has_new_commits: bool,
    #[serde(default)]
    pub new_commits_count: u64,
    /// Oldest first
    #[serde(default)]
    pub commits: Vec<RemoteCommit>,
    #[serde(default)]
    pub head_commit: Option<ObjectId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const SHA: &str = "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d";

    #[test]
    fn pull_request_uses_camel_case_and_null_for_first_pull() {
        let request = PullRequest::new("main".to_string(), None, "jane@example.com".to_string());

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"branch": "main", "currentCommit": null, "userEmail": "jane@example.com"})
        );
    }

    #[test]
    fn commit_payload_accepts_missing_optional_fields() {
        let payload = json!({
            "sha": SHA,
            "message": "Initial",
            "author": {"name": "Jane", "email": "jane@example.com"},
            "committer": {"name": "Jane", "email": "jane@example.com"},
            "timestamp": "2024-01-01T00:00:00.000Z",
            "treeHash": SHA,
            "files": [{"path": "a.txt", "content": "hello", "hash": SHA}]
        });

        let commit: RemoteCommit = serde_json::from_value(payload).unwrap();

        assert_eq!(commit.parent_sha, None);
        assert_eq!(commit.files[0].mode, "100644");
        assert_eq!(commit.files[0].action, "added");
    }

    #[test]
    fn content_hash_mismatch_is_detected() {
        let mut file = RemoteFile::added(
            "a.txt".to_string(),
            "hello".to_string(),
            hash_raw(b"hello"),
            REGULAR_FILE_MODE.to_string(),
        );
        assert!(file.content_matches_hash());

        file.content = "tampered".to_string();
        assert!(!file.content_matches_hash());
    }

    #[test]
    fn rebuilt_commit_keeps_payload_metadata() {
        let payload = json!({
            "sha": SHA,
            "message": "Second",
            "author": {"name": "Jane", "email": "jane@example.com"},
            "committer": {"name": "Bot", "email": "bot@example.com"},
            "timestamp": "2024-01-01T10:00:00+02:00",
            "treeHash": SHA,
            "parentSha": SHA
        });
        let remote: RemoteCommit = serde_json::from_value(payload).unwrap();

        let commit = remote.to_commit();

        assert_eq!(commit.parent().map(|p| p.as_ref()), Some(SHA));
        assert_eq!(commit.author().display_name(), "Jane <jane@example.com>");
        assert_eq!(commit.committer().display_name(), "Bot <bot@example.com>");
        assert_eq!(commit.timestamp(), remote.timestamp);
    }
}
