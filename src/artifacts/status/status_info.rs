use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::status::file_change::FileChange;
use crate::artifacts::status::inspector::Inspector;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusInfo {
    changes: BTreeMap<String, FileChange>,
}

impl StatusInfo {
    pub fn collect(workspace: &Workspace, index: &Index) -> anyhow::Result<Self> {
        let inspector = Inspector::new(workspace);
        let files = workspace.list_files()?;
        let on_disk = files.iter().cloned().collect::<BTreeSet<_>>();

        let mut changes = BTreeMap::new();
        for path in files {
            let change = inspector.check_workspace_file(&path, index)?;
            changes.insert(path, change);
        }

        for path in index.entries().keys() {
            if !on_disk.contains(path) {
                changes.insert(path.clone(), FileChange::Deleted);
            }
        }

        Ok(StatusInfo { changes })
    }

    pub fn changes(&self) -> &BTreeMap<String, FileChange> {
        &self.changes
    }

    pub fn staged(&self) -> impl Iterator<Item = (&String, &FileChange)> {
        self.changes
            .iter()
            .filter(|(_, change)| **change == FileChange::Staged)
    }

    pub fn unstaged(&self) -> impl Iterator<Item = (&String, &FileChange)> {
        self.changes
            .iter()
            .filter(|(_, change)| matches!(change, FileChange::Modified | FileChange::Deleted))
    }

    pub fn untracked(&self) -> impl Iterator<Item = (&String, &FileChange)> {
        self.changes
            .iter()
            .filter(|(_, change)| **change == FileChange::Untracked)
    }

    pub fn is_clean(&self) -> bool {
        self.changes.is_empty()
    }
}
