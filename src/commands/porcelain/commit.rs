use crate::areas::context::AUTHOR_DATE_ENV;
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::errors::RepositoryError;
use anyhow::Context;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use std::io::Write;

impl Repository {
    pub async fn commit(&self, message: Option<&str>) -> anyhow::Result<ObjectId> {
        let message = message
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .ok_or(RepositoryError::NoCommitMessage)?
            .to_string();

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        if index.is_empty() {
            return Err(RepositoryError::NoStagedChanges.into());
        }

        let tree_oid = self.database().store(&Tree::from_index(index.entries()))?;

        let branch = self.refs().current_branch()?;
        let parent = self.refs().tip(&branch)?;
        let is_root = if parent.is_some() { "" } else { " (root-commit)" };

        let author = self.commit_author()?;
        let commit = Commit::new(parent, tree_oid, author, message);
        let commit_oid = self.database().store(&commit)?;
        self.refs().advance(&branch, &commit_oid)?;

        index.clear();
        index.write_updates()?;

        writeln!(
            self.writer(),
            "[{branch}{is_root} {}] {}",
            commit_oid.to_short_oid(),
            commit.short_message()
        )?;

        Ok(commit_oid)
    }

    fn commit_author(&self) -> anyhow::Result<Author> {
        let (name, email) = self.config()?.identity();

        match self.context().var(AUTHOR_DATE_ENV) {
            Some(date) => Ok(Author::new_with_timestamp(name, email, parse_author_date(date)?)),
            None => Ok(Author::new(name, email)),
        }
    }
}

/// Accepts RFC 3339 or `<unix seconds> <+hhmm>`
fn parse_author_date(date: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(date) {
        return Ok(timestamp);
    }

    let (seconds, offset) = date.split_once(' ').unwrap_or((date, "+0000"));
    let seconds = seconds
        .parse::<i64>()
        .with_context(|| format!("invalid {AUTHOR_DATE_ENV} value '{date}'"))?;
    let offset = DateTime::parse_from_str(&format!("1970-01-01 00:00:00 {offset}"), "%Y-%m-%d %H:%M:%S %z")
        .with_context(|| format!("invalid timezone in {AUTHOR_DATE_ENV} value '{date}'"))?
        .offset()
        .to_owned();

    Utc.timestamp_opt(seconds, 0)
        .single()
        .map(|timestamp| timestamp.with_timezone(&offset))
        .with_context(|| format!("timestamp out of range in {AUTHOR_DATE_ENV} value '{date}'"))
}
