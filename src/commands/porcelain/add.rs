use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::errors::RepositoryError;
use std::collections::BTreeSet;

/// Pathspec expanding to the whole working tree
const ALL_FILES: &str = ".";

impl Repository {
    pub async fn add(&self, paths: &[String]) -> anyhow::Result<()> {
        // resolve every pathspec before touching the store or the index
        let files = self.expand_pathspecs(paths)?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        for path in files {
            let content = self.workspace().read_file(&path)?;
            let metadata = self.workspace().stat_file(&path)?;

            let hash = self.database().put(&content)?;
            tracing::debug!(path = %path, hash = %hash, "staging file");
            index.add(path, IndexEntry::from_metadata(hash, &metadata));
        }

        index.write_updates()?;

        Ok(())
    }

    fn expand_pathspecs(&self, paths: &[String]) -> anyhow::Result<BTreeSet<String>> {
        let mut files = BTreeSet::new();

        for path in paths {
            if path == ALL_FILES {
                files.extend(self.workspace().list_files()?);
                continue;
            }

            let absolute = self.context().resolve(path);
            let absolute = absolute
                .canonicalize()
                .map_err(|_| RepositoryError::PathspecNotFound(path.clone()))?;
            let relative = self
                .workspace()
                .relative_path(&absolute)
                .ok_or_else(|| RepositoryError::PathspecNotFound(path.clone()))?;

            if !absolute.is_file() {
                tracing::warn!(path = %path, "not a regular file, skipping");
                continue;
            }
            if Workspace::is_ignored(&relative) {
                tracing::warn!(path = %path, "path is inside an ignored directory, skipping");
                continue;
            }

            files.insert(relative);
        }

        Ok(files)
    }
}
