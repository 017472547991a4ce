use crate::areas::repository::Repository;
use crate::artifacts::log::rev_list::{MissPolicy, RevList};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use std::io::Write;

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub max_count: Option<usize>,
    pub oneline: bool,
}

impl Repository {
    /// Print the current branch's history, newest first
    ///
    /// Returns the hashes in the order they were printed.
    pub async fn log(&self, opts: &LogOptions) -> anyhow::Result<Vec<ObjectId>> {
        let branch = self.refs().current_branch()?;
        let Some(tip) = self.refs().tip(&branch)? else {
            anyhow::bail!("your current branch '{branch}' does not have any commits yet");
        };

        let history = RevList::new(self.database(), Some(tip), MissPolicy::Truncate)
            .take(opts.max_count.unwrap_or(usize::MAX));

        let mut printed = Vec::new();
        for item in history {
            let (oid, commit) = item?;
            if opts.oneline {
                self.show_commit_oneline(&oid, &commit)?;
            } else {
                self.show_commit_medium(&oid, &commit)?;
            }
            printed.push(oid);
        }

        Ok(printed)
    }

    fn show_commit_medium(&self, oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        writeln!(self.writer(), "{}", format!("commit {oid}").yellow())?;
        writeln!(self.writer(), "Author: {}", commit.author().display_name())?;
        writeln!(
            self.writer(),
            "Date:   {}",
            commit.author().readable_timestamp()
        )?;
        writeln!(self.writer())?;
        for message_line in commit.message().lines() {
            writeln!(self.writer(), "    {}", message_line)?;
        }
        writeln!(self.writer())?;

        Ok(())
    }

    fn show_commit_oneline(&self, oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        writeln!(
            self.writer(),
            "{} {}",
            oid.to_short_oid().yellow(),
            commit.short_message()
        )?;

        Ok(())
    }
}
