use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::log::rev_list::{MissPolicy, RevList};
use crate::artifacts::objects::REGULAR_FILE_MODE;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Unpackable, hash_raw};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::sync::transfer::{RemoteCommit, RemoteFile};
use crate::errors::RepositoryError;
use derive_new::new;

/// Gathers the commits a push has to transmit
#[derive(new)]
pub struct Collector<'r> {
    database: &'r Database,
    workspace: &'r Workspace,
}

impl Collector<'_> {
    /// Commits reachable from `tip` and not behind `known`, oldest first
    ///
    /// Any commit, tree or blob missing from the object store fails the whole
    /// collection before anything is sent.
    pub fn collect(
        &self,
        tip: &ObjectId,
        known: Option<ObjectId>,
    ) -> anyhow::Result<Vec<RemoteCommit>> {
        let mut batch = Vec::new();

        for item in RevList::new(self.database, Some(tip.clone()), MissPolicy::Fail).until(known) {
            let (oid, commit) = item?;
            let files = self.files_or_workspace(&oid, &commit)?;
            batch.push(RemoteCommit::from_commit(oid, &commit, files));
        }
        batch.reverse();

        tracing::debug!(commits = batch.len(), "collected push batch");
        Ok(batch)
    }

    fn files_or_workspace(&self, oid: &ObjectId, commit: &Commit) -> anyhow::Result<Vec<RemoteFile>> {
        let raw_tree = self
            .database
            .get(commit.tree_oid())?
            .ok_or_else(|| RepositoryError::ObjectNotFound(oid.to_string()))?;

        match Tree::deserialize(raw_tree) {
            Ok(tree) => tree_files(self.database, &tree),
            Err(error) => {
                tracing::warn!(
                    commit = %oid,
                    "unable to parse tree ({error:#}), sending working directory files instead"
                );
                self.workspace_files()
            }
        }
    }

    fn workspace_files(&self) -> anyhow::Result<Vec<RemoteFile>> {
        self.workspace
            .list_files()?
            .into_iter()
            .map(|path| {
                let content = self.workspace.read_file(&path)?;
                let hash = hash_raw(&content);
                let text = transfer_text(&path, &content);

                Ok(RemoteFile::added(
                    path,
                    text,
                    hash,
                    REGULAR_FILE_MODE.to_string(),
                ))
            })
            .collect()
    }
}

/// Complete file list of a commit, resolved from the object store
pub fn commit_files(database: &Database, oid: &ObjectId) -> anyhow::Result<Vec<RemoteFile>> {
    let commit = database
        .load_commit(oid)?
        .ok_or_else(|| RepositoryError::ObjectNotFound(oid.to_string()))?;
    let tree = database
        .load_tree(commit.tree_oid())?
        .ok_or_else(|| RepositoryError::ObjectNotFound(oid.to_string()))?;

    tree_files(database, &tree)
}

fn tree_files(database: &Database, tree: &Tree) -> anyhow::Result<Vec<RemoteFile>> {
    tree.entries()
        .iter()
        .map(|entry| {
            let blob = database
                .load_blob(&entry.oid)?
                .ok_or_else(|| RepositoryError::ObjectNotFound(entry.oid.to_string()))?;

            Ok(RemoteFile::added(
                entry.path.clone(),
                transfer_text(&entry.path, blob.content()),
                entry.oid.clone(),
                entry.mode.clone(),
            ))
        })
        .collect()
}

/// File content as sent on the wire, which carries text only
fn transfer_text(path: &str, content: &[u8]) -> String {
    match std::str::from_utf8(content) {
        Ok(text) => text.to_string(),
        Err(_) => {
            tracing::warn!(
                path,
                "file is not valid UTF-8, invalid bytes are replaced and the remote copy will not match its hash"
            );
            String::from_utf8_lossy(content).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::areas::index::Index;
    use crate::artifacts::index::index_entry::IndexEntry;
    use crate::artifacts::objects::commit::Author;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;

    struct Fixture {
        dir: TempDir,
        database: Database,
        workspace: Workspace,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let database = Database::new(dir.path().join(".gith/objects").into_boxed_path());
            let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());
            Fixture { dir, database, workspace }
        }

        fn commit(&self, parent: Option<ObjectId>, files: &[(&str, &str)], message: &str) -> ObjectId {
            let mut index = Index::new(self.dir.path().join(".gith/index").into_boxed_path());
            for (path, content) in files {
                self.dir.child(path).write_str(content).unwrap();
                let hash = self.database.put(content.as_bytes()).unwrap();
                let metadata = self.workspace.stat_file(path).unwrap();
                index.add(path.to_string(), IndexEntry::from_metadata(hash, &metadata));
            }
            let tree = self.database.store(&Tree::from_index(index.entries())).unwrap();
            let author = Author::new("Jane".to_string(), "jane@example.com".to_string());

            self.database
                .store(&Commit::new(parent, tree, author, message.to_string()))
                .unwrap()
        }
    }

    #[test]
    fn batch_is_oldest_first_with_full_file_lists() {
        let fixture = Fixture::new();
        let first = fixture.commit(None, &[("a.txt", "hello")], "first");
        let second = fixture.commit(Some(first.clone()), &[("a.txt", "hello"), ("b.txt", "world")], "second");

        let batch = Collector::new(&fixture.database, &fixture.workspace)
            .collect(&second, None)
            .unwrap();

        assert_eq!(
            batch.iter().map(|c| c.sha.clone()).collect::<Vec<_>>(),
            vec![first.clone(), second]
        );
        assert_eq!(batch[1].parent_sha, Some(first));
        assert_eq!(
            batch[1].files.iter().map(|f| f.path.as_str()).collect::<Vec<_>>(),
            vec!["a.txt", "b.txt"]
        );
        assert_eq!(batch[0].files[0].content, "hello");
        assert_eq!(batch[0].files[0].action, "added");
    }

    #[test]
    fn collection_stops_at_known_remote_head() {
        let fixture = Fixture::new();
        let first = fixture.commit(None, &[("a.txt", "one")], "first");
        let second = fixture.commit(Some(first.clone()), &[("a.txt", "two")], "second");

        let batch = Collector::new(&fixture.database, &fixture.workspace)
            .collect(&second, Some(first))
            .unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].sha, second);
    }

    #[test]
    fn missing_tree_fails_with_commit_hash() {
        let fixture = Fixture::new();
        let missing_tree = ObjectId::try_parse("2".repeat(40)).unwrap();
        let author = Author::new("Jane".to_string(), "jane@example.com".to_string());
        let oid = fixture
            .database
            .store(&Commit::new(None, missing_tree, author, "broken".to_string()))
            .unwrap();

        let error = Collector::new(&fixture.database, &fixture.workspace)
            .collect(&oid, None)
            .unwrap_err();

        assert_eq!(error.to_string(), format!("commit object {oid} not found"));
    }

    #[test]
    fn unparseable_tree_falls_back_to_working_directory() {
        let fixture = Fixture::new();
        fixture.dir.child("on-disk.txt").write_str("fallback").unwrap();
        let garbage_tree = fixture.database.put(b"not a tree line").unwrap();
        let author = Author::new("Jane".to_string(), "jane@example.com".to_string());
        let oid = fixture
            .database
            .store(&Commit::new(None, garbage_tree, author, "odd".to_string()))
            .unwrap();

        let batch = Collector::new(&fixture.database, &fixture.workspace)
            .collect(&oid, None)
            .unwrap();

        assert_eq!(batch[0].files.len(), 1);
        assert_eq!(batch[0].files[0].path, "on-disk.txt");
        assert_eq!(batch[0].files[0].content, "fallback");
    }

    #[test]
    fn non_utf8_content_is_sent_lossily() {
        assert_eq!(transfer_text("a.txt", b"plain"), "plain");
        assert_eq!(transfer_text("b.bin", &[0x61, 0xff, 0x62]), "a\u{fffd}b");
    }
}
