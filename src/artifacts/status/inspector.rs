use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::index::index_entry::mtime_millis;
use crate::artifacts::objects::object::hash_raw;
use crate::artifacts::status::file_change::FileChange;
use derive_new::new;

#[derive(new)]
pub struct Inspector<'w> {
    workspace: &'w Workspace,
}

impl Inspector<'_> {
    /// Classify a path present on disk
    pub fn check_workspace_file(&self, path: &str, index: &Index) -> anyhow::Result<FileChange> {
        let Some(entry) = index.entry_by_path(path) else {
            return Ok(FileChange::Untracked);
        };

        let metadata = self.workspace.stat_file(path)?;
        let hash = hash_raw(&self.workspace.read_file(path)?);

        if entry.matches(&hash, mtime_millis(&metadata)) {
            Ok(FileChange::Staged)
        } else {
            Ok(FileChange::Modified)
        }
    }
}
