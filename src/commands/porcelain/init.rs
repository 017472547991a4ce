use crate::areas::config::ConfigKey;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use anyhow::Context;
use std::fs;
use std::io::Write;

const DESCRIPTION: &str = "Unnamed repository; edit this file 'description' to name the repository.\n";
const CORE_SETTINGS: [(&str, &str); 3] = [
    ("core.repositoryformatversion", "0"),
    ("core.filemode", "false"),
    ("core.bare", "false"),
];

impl Repository {
    pub async fn init(&self) -> anyhow::Result<()> {
        let reinitialized = self.create_skeleton()?;

        let verb = if reinitialized {
            "Reinitialized existing"
        } else {
            "Initialized empty"
        };
        writeln!(
            self.writer(),
            "{verb} Gith repository in {}",
            self.metadata_path().display()
        )?;

        Ok(())
    }

    /// Create the metadata directory layout, keeping anything already there
    ///
    /// Returns whether a repository already existed at this location.
    pub(crate) fn create_skeleton(&self) -> anyhow::Result<bool> {
        let head_path = self.refs().head_path();
        let reinitialized = head_path.exists();

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .gith/objects directory")?;
        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .gith/refs/heads directory")?;
        fs::create_dir_all(self.refs().tags_path())
            .context("Failed to create .gith/refs/tags directory")?;

        if !reinitialized {
            self.refs()
                .set_head(&BranchName::default())
                .context("Failed to create initial HEAD reference")?;
        }

        let description_path = self.metadata_path().join("description");
        if !description_path.exists() {
            fs::write(&description_path, DESCRIPTION)
                .context("Failed to create .gith/description")?;
        }

        let mut config = self.config()?;
        let local = config.local_mut();
        for (key, value) in CORE_SETTINGS {
            let key = ConfigKey::try_parse(key)?;
            if local.get(&key).is_none() {
                local.set(&key, value);
            }
        }
        local.save()?;

        tracing::debug!(path = %self.path().display(), reinitialized, "repository skeleton ready");
        Ok(reinitialized)
    }
}
