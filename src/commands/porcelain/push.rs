use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::sync::collector::Collector;
use crate::artifacts::sync::transfer::{PushRequest, RemoteUser};
use crate::commands::porcelain::remote::ORIGIN;
use crate::errors::RepositoryError;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    UpToDate,
    Pushed { sent: usize, created: u64 },
}

impl Repository {
    /// Send the commits of `branch` the remote has not seen yet
    ///
    /// The whole batch is collected before any request is made, so a hole in
    /// local history fails without contacting the remote.
    pub async fn push(&self, remote: Option<&str>, branch: Option<&str>) -> anyhow::Result<PushOutcome> {
        let remote = self.remote_config(remote.unwrap_or(ORIGIN))?;
        let branch = match branch {
            Some(name) => BranchName::try_parse(name.to_string())?,
            None => self.refs().current_branch()?,
        };

        tracing::debug!(remote = %remote.name, branch = %branch, "push: collecting");
        let tip = self
            .refs()
            .tip(&branch)?
            .ok_or_else(|| RepositoryError::NoCommits(branch.to_string()))?;
        let known = self.refs().remote_tip(&remote.name, &branch)?;

        let commits = Collector::new(self.database(), self.workspace()).collect(&tip, known)?;
        if commits.is_empty() {
            writeln!(self.writer(), "Everything up-to-date")?;
            return Ok(PushOutcome::UpToDate);
        }

        let (name, email) = self.config()?.identity();
        let sent = commits.len();
        let request = PushRequest::new(commits, branch.to_string(), RemoteUser::new(name, email));

        tracing::debug!(remote = %remote.name, commits = sent, "push: transmitting");
        let response = self.remote_client(&remote)?.push(&request).await?;
        self.refs().advance_remote(&remote.name, &branch, &tip)?;

        writeln!(self.writer(), "To {}", remote.url)?;
        if response.commits_created == 0 {
            writeln!(self.writer(), "Everything up-to-date")?;
        } else {
            writeln!(
                self.writer(),
                "   {} -> {} ({} commit(s) created)",
                tip.to_short_oid(),
                branch,
                response.commits_created
            )?;
        }

        Ok(PushOutcome::Pushed {
            sent,
            created: response.commits_created,
        })
    }
}
