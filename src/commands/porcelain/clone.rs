use crate::areas::config::RemoteConfig;
use crate::areas::context::{TOKEN_ENV, WorkingContext};
use crate::areas::remote::RemoteClient;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::sync::replay::{checkout, persist_commit};
use crate::artifacts::sync::transfer::CloneResponse;
use crate::commands::porcelain::remote::ORIGIN;
use crate::errors::RepositoryError;
use std::io::Write;

#[derive(Debug, Clone)]
pub struct CloneOptions {
    pub url: String,
    pub repository_id: String,
    /// Target directory, defaults to the repository id
    pub directory: Option<String>,
}

/// Create a new repository from a full remote snapshot
///
/// The target directory must not exist. Nothing is created locally until the
/// snapshot has been received. A failure while materializing leaves the
/// partially created directory in place.
pub async fn clone(
    context: WorkingContext,
    mut writer: Box<dyn Write>,
    opts: &CloneOptions,
) -> anyhow::Result<Repository> {
    let directory = opts.directory.as_deref().unwrap_or(&opts.repository_id);
    let target = context.resolve(directory);
    if target.exists() {
        return Err(RepositoryError::DestinationExists(directory.to_string()).into());
    }

    writeln!(writer, "Cloning into '{directory}'...")?;

    tracing::debug!(url = %opts.url, repository = %opts.repository_id, "clone: fetching");
    let token = context.var(TOKEN_ENV).map(str::to_string);
    let snapshot = RemoteClient::new(&opts.url, &opts.repository_id, token)?
        .fetch_snapshot()
        .await?;
    // HEAD resolves to the last path segment, so a nested default branch never finds its tip
    if snapshot.default_branch.contains('/') {
        return Err(RepositoryError::NestedDefaultBranch(snapshot.default_branch).into());
    }

    tracing::debug!(commits = snapshot.commits.len(), "clone: materializing");
    let repository = Repository::new(&target, context, writer)?;
    repository.materialize_snapshot(
        &RemoteConfig {
            name: ORIGIN.to_string(),
            url: opts.url.clone(),
            repository_id: opts.repository_id.clone(),
        },
        &snapshot,
    )?;

    Ok(repository)
}

impl Repository {
    fn materialize_snapshot(&self, remote: &RemoteConfig, snapshot: &CloneResponse) -> anyhow::Result<()> {
        self.create_skeleton()?;
        let default_branch = BranchName::try_parse(snapshot.default_branch.clone())?;
        self.refs().set_head(&default_branch)?;

        for commit in &snapshot.commits {
            persist_commit(self.database(), commit)?;
        }

        for branch in &snapshot.branches {
            let Some(head) = &branch.head_commit else {
                continue;
            };
            if !self.database().exists(head) {
                return Err(RepositoryError::ObjectNotFound(head.to_string()).into());
            }

            let name = BranchName::try_parse(branch.name.clone())?;
            self.refs().advance(&name, head)?;
            self.refs().advance_remote(&remote.name, &name, head)?;
        }

        let mut config = self.config()?;
        config.local_mut().set_remote(remote);
        config.local_mut().save()?;

        let default_head = snapshot
            .branches
            .iter()
            .find(|branch| branch.name == snapshot.default_branch)
            .and_then(|branch| branch.head_commit.clone())
            .or_else(|| snapshot.head_commit.clone());

        match default_head {
            Some(head) => {
                if self.refs().tip(&default_branch)?.is_none() {
                    self.refs().advance(&default_branch, &head)?;
                    self.refs().advance_remote(&remote.name, &default_branch, &head)?;
                }
                let reconciliation = checkout(self.database(), self.workspace(), &head)?;
                tracing::debug!(files = reconciliation.written.len(), "clone: checked out default branch");
            }
            None => {
                writeln!(self.writer(), "warning: You appear to have cloned an empty repository.")?;
            }
        }

        Ok(())
    }
}
