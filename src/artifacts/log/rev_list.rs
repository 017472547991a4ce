use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissPolicy {
    /// End the walk quietly
    Truncate,
    /// Fail with `ObjectNotFound`
    Fail,
}

pub struct RevList<'d> {
    database: &'d Database,
    pending: Vec<ObjectId>,
    visited: HashSet<ObjectId>,
    boundary: Option<ObjectId>,
    policy: MissPolicy,
}

impl<'d> RevList<'d> {
    pub fn new(database: &'d Database, start: Option<ObjectId>, policy: MissPolicy) -> Self {
        RevList {
            database,
            pending: start.into_iter().collect(),
            visited: HashSet::new(),
            boundary: None,
            policy,
        }
    }

    /// Stop before reaching `boundary` (exclusive)
    pub fn until(mut self, boundary: Option<ObjectId>) -> Self {
        self.boundary = boundary;
        self
    }
}

impl Iterator for RevList<'_> {
    type Item = anyhow::Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(oid) = self.pending.pop() {
            if self.boundary.as_ref() == Some(&oid) || !self.visited.insert(oid.clone()) {
                continue;
            }

            return match self.database.load_commit(&oid) {
                Ok(Some(commit)) => {
                    self.pending.extend(commit.parent().cloned());
                    Some(Ok((oid, commit)))
                }
                Ok(None) => match self.policy {
                    MissPolicy::Truncate => {
                        tracing::debug!(oid = %oid, "history truncated at missing commit");
                        None
                    }
                    MissPolicy::Fail => {
                        Some(Err(RepositoryError::ObjectNotFound(oid.to_string()).into()))
                    }
                },
                Err(error) => Some(Err(error)),
            };
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::commit::Author;
    use crate::artifacts::objects::object::Packable;
    use assert_fs::TempDir;
    use chrono::{DateTime, FixedOffset};
    use pretty_assertions::assert_eq;

    fn author() -> Author {
        let timestamp = DateTime::<FixedOffset>::parse_from_rfc3339("2024-01-01T00:00:00+00:00").unwrap();
        Author::new_with_timestamp("Jane".to_string(), "jane@example.com".to_string(), timestamp)
    }

    fn tree_oid(database: &Database) -> ObjectId {
        database.put(b"").unwrap()
    }

    fn commit_chain(database: &Database, length: usize) -> Vec<ObjectId> {
        let tree = tree_oid(database);
        let mut parent = None;
        let mut oids = Vec::new();

        for i in 0..length {
            let commit = Commit::new(parent.clone(), tree.clone(), author(), format!("commit {i}"));
            let oid = database.store(&commit).unwrap();
            parent = Some(oid.clone());
            oids.push(oid);
        }

        oids
    }

    fn walk(database: &Database, start: &ObjectId, policy: MissPolicy) -> Vec<ObjectId> {
        RevList::new(database, Some(start.clone()), policy)
            .map(|item| item.unwrap().0)
            .collect()
    }

    #[test]
    fn walk_visits_every_commit_newest_first() {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().to_path_buf().into_boxed_path());
        let chain = commit_chain(&database, 3);

        let visited = walk(&database, &chain[2], MissPolicy::Truncate);

        assert_eq!(visited, chain.iter().rev().cloned().collect::<Vec<_>>());
    }

    #[test]
    fn walk_stops_before_boundary() {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().to_path_buf().into_boxed_path());
        let chain = commit_chain(&database, 3);

        let visited = RevList::new(&database, Some(chain[2].clone()), MissPolicy::Fail)
            .until(Some(chain[0].clone()))
            .map(|item| item.unwrap().0)
            .collect::<Vec<_>>();

        assert_eq!(visited, vec![chain[2].clone(), chain[1].clone()]);
    }

    #[test]
    fn lenient_walk_ends_at_missing_parent() {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().to_path_buf().into_boxed_path());
        let missing = ObjectId::try_parse("1".repeat(40)).unwrap();
        let commit = Commit::new(Some(missing), tree_oid(&database), author(), "orphan".to_string());
        let oid = database.store(&commit).unwrap();

        let visited = walk(&database, &oid, MissPolicy::Truncate);

        assert_eq!(visited, vec![oid]);
    }

    #[test]
    fn strict_walk_reports_missing_parent() {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().to_path_buf().into_boxed_path());
        let missing = ObjectId::try_parse("1".repeat(40)).unwrap();
        let commit = Commit::new(Some(missing), tree_oid(&database), author(), "orphan".to_string());
        let oid = database.store(&commit).unwrap();

        let results = RevList::new(&database, Some(oid), MissPolicy::Fail).collect::<Vec<_>>();

        assert_eq!(results.len(), 2);
        let error = results[1].as_ref().unwrap_err();
        assert_eq!(
            error.to_string(),
            format!("commit object {} not found", "1".repeat(40))
        );
    }

    #[test]
    fn walk_terminates_on_parent_cycle() {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().to_path_buf().into_boxed_path());
        let tree = tree_oid(&database);
        let first = ObjectId::try_parse("a".repeat(40)).unwrap();
        let second = ObjectId::try_parse("b".repeat(40)).unwrap();
        // two commits stored under declared ids pointing at each other
        let a = Commit::new(Some(second.clone()), tree.clone(), author(), "a".to_string());
        let b = Commit::new(Some(first.clone()), tree, author(), "b".to_string());
        database.put_as(&first, &a.serialize().unwrap()).unwrap();
        database.put_as(&second, &b.serialize().unwrap()).unwrap();

        let visited = walk(&database, &first, MissPolicy::Truncate);

        assert_eq!(visited, vec![first, second]);
    }
}
