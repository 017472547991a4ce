use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::sync::replay::{checkout, ensure_fast_forward, persist_commit};
use crate::artifacts::sync::transfer::PullRequest;
use crate::commands::porcelain::remote::ORIGIN;
use crate::errors::RepositoryError;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullOutcome {
    UpToDate,
    FastForwarded {
        from: Option<ObjectId>,
        to: ObjectId,
        commits: usize,
    },
}

impl Repository {
    /// Fetch the remote's new commits for `branch` and fast-forward to them
    ///
    /// When `branch` is checked out, the working tree is made to match the new
    /// head exactly: files missing from the head are deleted.
    pub async fn pull(&self, remote: Option<&str>, branch: Option<&str>) -> anyhow::Result<PullOutcome> {
        let remote = self.remote_config(remote.unwrap_or(ORIGIN))?;
        let current = self.refs().current_branch()?;
        let branch = match branch {
            Some(name) => BranchName::try_parse(name.to_string())?,
            None => current.clone(),
        };

        let local = self.refs().tip(&branch)?;
        let (_, email) = self.config()?.identity();
        let request = PullRequest::new(branch.to_string(), local.clone(), email);

        tracing::debug!(remote = %remote.name, branch = %branch, "pull: querying");
        let response = self.remote_client(&remote)?.pull(&request).await?;

        let head = response
            .head_commit
            .clone()
            .or_else(|| response.commits.last().map(|commit| commit.sha.clone()));
        let head = match head {
            Some(head) if response.has_new_commits && !response.commits.is_empty() => head,
            _ => {
                writeln!(self.writer(), "Already up to date.")?;
                return Ok(PullOutcome::UpToDate);
            }
        };

        ensure_fast_forward(branch.as_ref(), local.as_ref(), &response.commits, &head)?;

        tracing::debug!(commits = response.commits.len(), "pull: applying");
        for commit in &response.commits {
            persist_commit(self.database(), commit)?;
        }
        if !self.database().exists(&head) {
            return Err(RepositoryError::ObjectNotFound(head.to_string()).into());
        }

        self.refs().advance(&branch, &head)?;
        self.refs().advance_remote(&remote.name, &branch, &head)?;

        let from = local
            .as_ref()
            .map(ObjectId::to_short_oid)
            .unwrap_or_else(|| "0000000".to_string());
        writeln!(self.writer(), "Updating {from}..{}", head.to_short_oid())?;
        writeln!(self.writer(), "Fast-forward")?;

        if branch == current {
            let reconciliation = checkout(self.database(), self.workspace(), &head)?;
            writeln!(
                self.writer(),
                " {} file(s) written, {} file(s) removed",
                reconciliation.written.len(),
                reconciliation.removed.len()
            )?;
        }

        Ok(PullOutcome::FastForwarded {
            from: local,
            to: head,
            commits: response.commits.len(),
        })
    }
}
