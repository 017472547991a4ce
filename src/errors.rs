//! Error taxonomy
//!
//! Two families of errors are surfaced to callers that need to match on them:
//!
//! - [`RepositoryError`]: user errors and local integrity errors
//! - [`RemoteError`]: failures talking to the remote service, classified by
//!   how far the request got
//!
//! Everything else travels as `anyhow::Error` with context attached.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("not a gith repository (or any of the parent directories): .gith")]
    NotARepository,

    #[error("no commit message given, aborting commit")]
    NoCommitMessage,

    #[error("nothing to commit (use \"gith add\" to stage files)")]
    NoStagedChanges,

    #[error("pathspec '{0}' did not match any files")]
    PathspecNotFound(String),

    #[error("key does not contain a section: {0}")]
    InvalidConfigKey(String),

    #[error("unknown config key: {0}")]
    UnknownConfigKey(String),

    #[error("no such remote '{0}'")]
    RemoteNotFound(String),

    #[error("remote {0} already exists")]
    RemoteExists(String),

    #[error("destination path '{0}' already exists")]
    DestinationExists(String),

    #[error("remote default branch '{0}' is nested and cannot be checked out")]
    NestedDefaultBranch(String),

    #[error("src refspec {0} does not match any commits")]
    NoCommits(String),

    #[error("commit object {0} not found")]
    ObjectNotFound(String),

    #[error(
        "local branch '{branch}' at {local} has diverged from the remote head {remote}; refusing to overwrite"
    )]
    Diverged {
        branch: String,
        local: String,
        remote: String,
    },
}

#[derive(Debug, Error)]
pub enum RemoteError {
    /// The server answered with a non-success status
    #[error("remote responded with {status}: {message}\nhint: {hint}")]
    Status {
        status: u16,
        message: String,
        hint: String,
    },

    /// The request went out but no response came back
    #[error("unable to reach remote at {url}: {reason}\nhint: check the remote URL and your network connection")]
    Unreachable { url: String, reason: String },

    /// The request could not be built
    #[error("{0}")]
    Request(String),
}

impl RemoteError {
    pub fn from_status(status: u16, message: String) -> Self {
        let hint = match status {
            401 | 403 => "check your authentication (user.email or GITH_TOKEN)",
            404 => "check that the repository exists on the remote",
            500..=599 => "the remote service failed, try again later",
            _ => "the remote rejected the request",
        };

        RemoteError::Status {
            status,
            message,
            hint: hint.to_string(),
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_builder() {
            return RemoteError::Request(error.to_string());
        }

        match error.url() {
            Some(url) if error.is_connect() || error.is_timeout() || error.is_request() => {
                RemoteError::Unreachable {
                    url: url.to_string(),
                    reason: error.to_string(),
                }
            }
            _ => RemoteError::Request(error.to_string()),
        }
    }
}
