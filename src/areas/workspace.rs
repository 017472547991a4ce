use anyhow::Context;
use bytes::Bytes;
use std::fs::Metadata;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Directories never scanned, staged or touched by reconciliation
pub const IGNORED_PATHS: [&str; 4] = [".gith", ".git", "node_modules", "target"];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every regular file in the working tree as a `/`-separated root-relative path, sorted
    ///
    /// Fails on the first entry that cannot be read.
    pub fn list_files(&self) -> anyhow::Result<Vec<String>> {
        let mut files = Vec::new();
        let walker = WalkDir::new(&self.path)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored_name(entry.file_name().to_string_lossy().as_ref()));

        for entry in walker {
            let entry = entry.with_context(|| format!("failed to scan working tree at {:?}", self.path))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(path) = self.relative_path(entry.path()) {
                files.push(path);
            }
        }
        files.sort();

        Ok(files)
    }

    pub fn is_ignored(path: &str) -> bool {
        path.split('/').any(Self::is_ignored_name)
    }

    fn is_ignored_name(name: &str) -> bool {
        IGNORED_PATHS.contains(&name)
    }

    /// Convert an absolute path inside the working tree to its `/`-separated relative form
    pub fn relative_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(self.path.as_ref()).ok()?;
        let components = relative
            .components()
            .map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?;

        if components.is_empty() {
            None
        } else {
            Some(components.join("/"))
        }
    }

    pub fn absolute_path(&self, file_path: &str) -> PathBuf {
        self.path.join(file_path)
    }

    pub fn read_file(&self, file_path: &str) -> anyhow::Result<Bytes> {
        let path = self.absolute_path(file_path);
        let content = std::fs::read(&path).with_context(|| format!("Failed to read file: {:?}", path))?;

        Ok(Bytes::from(content))
    }

    pub fn stat_file(&self, file_path: &str) -> anyhow::Result<Metadata> {
        let path = self.absolute_path(file_path);

        std::fs::metadata(&path).with_context(|| format!("Failed to get metadata for file: {:?}", path))
    }

    /// Create or overwrite a file, creating parent directories as needed
    ///
    /// A directory standing where the file should go is replaced.
    pub fn write_file(&self, file_path: &str, content: &[u8]) -> anyhow::Result<()> {
        let path = self.absolute_path(file_path);

        if let Some(parent) = path.parent() {
            self.make_directory(parent)?;
        }
        if path.is_dir() {
            std::fs::remove_dir_all(&path)
                .with_context(|| format!("Failed to remove existing directory: {:?}", file_path))?;
        }

        std::fs::write(&path, content).with_context(|| format!("Failed to write to file: {:?}", file_path))
    }

    /// Delete a file and prune any parent directories it leaves empty
    pub fn remove_file(&self, file_path: &str) -> anyhow::Result<()> {
        let path = self.absolute_path(file_path);

        std::fs::remove_file(&path).with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        self.prune_empty_parent_dirs(&path)
    }

    fn make_directory(&self, dir_path: &Path) -> anyhow::Result<()> {
        // a file standing in for one of the directories is removed first
        let mut current = self.path.to_path_buf();
        if let Ok(relative) = dir_path.strip_prefix(self.path.as_ref()) {
            for component in relative.components() {
                current.push(component);
                if current.is_file() {
                    std::fs::remove_file(&current)?;
                }
            }
        }

        std::fs::create_dir_all(dir_path).with_context(|| format!("Failed to create directory: {:?}", dir_path))
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        let mut parent = path.parent();

        while let Some(dir) = parent
            && dir != self.path.as_ref()
            && dir.starts_with(self.path.as_ref())
            && dir.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(dir)
                .with_context(|| format!("failed to remove empty directory at {:?}", dir))?;
            parent = dir.parent();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;

    fn workspace(dir: &TempDir) -> Workspace {
        Workspace::new(dir.path().to_path_buf().into_boxed_path())
    }

    #[test]
    fn list_files_skips_metadata_and_build_directories() {
        let dir = TempDir::new().unwrap();
        dir.child("a.txt").write_str("a").unwrap();
        dir.child("nested/b.txt").write_str("b").unwrap();
        dir.child(".gith/HEAD").write_str("ref").unwrap();
        dir.child("node_modules/pkg/index.js").write_str("x").unwrap();
        dir.child("target/debug/out").write_str("x").unwrap();

        assert_eq!(
            workspace(&dir).list_files().unwrap(),
            vec!["a.txt".to_string(), "nested/b.txt".to_string()]
        );
    }

    #[test]
    fn list_files_reports_scan_errors() {
        let dir = TempDir::new().unwrap();
        let missing = Workspace::new(dir.path().join("gone").into_boxed_path());

        let error = missing.list_files().unwrap_err();

        assert!(error.to_string().contains("failed to scan working tree"));
    }

    #[test]
    fn write_file_creates_missing_parents() {
        let dir = TempDir::new().unwrap();

        workspace(&dir).write_file("x/y/z.txt", b"deep").unwrap();

        dir.child("x/y/z.txt").assert("deep");
    }

    #[test]
    fn remove_file_prunes_empty_parent_directories() {
        let dir = TempDir::new().unwrap();
        dir.child("keep.txt").write_str("k").unwrap();
        dir.child("x/y/z.txt").write_str("z").unwrap();

        workspace(&dir).remove_file("x/y/z.txt").unwrap();

        assert!(!dir.child("x").path().exists());
        assert!(dir.child("keep.txt").path().exists());
    }
}
