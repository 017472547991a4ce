use crate::areas::config::RemoteConfig;
use crate::areas::context::TOKEN_ENV;
use crate::areas::remote::RemoteClient;
use crate::areas::repository::Repository;
use crate::errors::RepositoryError;
use std::io::Write;

/// Name given to the remote a repository was cloned from
pub const ORIGIN: &str = "origin";

impl Repository {
    pub async fn remote_add(&self, name: &str, url: &str, repository_id: &str) -> anyhow::Result<()> {
        let mut config = self.config()?;
        if config.local().remote(name).is_some() {
            return Err(RepositoryError::RemoteExists(name.to_string()).into());
        }

        config.local_mut().set_remote(&RemoteConfig {
            name: name.to_string(),
            url: url.to_string(),
            repository_id: repository_id.to_string(),
        });
        config.local_mut().save()
    }

    pub async fn remote_set_url(&self, name: &str, url: &str) -> anyhow::Result<()> {
        let mut config = self.config()?;
        let mut remote = self.remote_config(name)?;

        remote.url = url.to_string();
        config.local_mut().set_remote(&remote);
        config.local_mut().save()
    }

    pub async fn remote_list(&self, verbose: bool) -> anyhow::Result<()> {
        for remote in self.config()?.local().remotes() {
            if verbose {
                writeln!(
                    self.writer(),
                    "{}\t{} ({})",
                    remote.name,
                    remote.url,
                    remote.repository_id
                )?;
            } else {
                writeln!(self.writer(), "{}", remote.name)?;
            }
        }

        Ok(())
    }

    pub(crate) fn remote_config(&self, name: &str) -> anyhow::Result<RemoteConfig> {
        self.config()?
            .local()
            .remote(name)
            .ok_or_else(|| RepositoryError::RemoteNotFound(name.to_string()).into())
    }

    pub(crate) fn remote_client(&self, remote: &RemoteConfig) -> anyhow::Result<RemoteClient> {
        let token = self.context().var(TOKEN_ENV).map(str::to_string);

        Ok(RemoteClient::new(&remote.url, &remote.repository_id, token)?)
    }
}
