use crate::areas::repository::Repository;
use crate::artifacts::status::file_change::FileChange;
use crate::artifacts::status::status_info::StatusInfo;
use std::io::Write;

impl Repository {
    pub async fn status(&self, porcelain: bool) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let status = StatusInfo::collect(self.workspace(), &index)?;

        if porcelain {
            self.print_porcelain_format(&status)
        } else {
            self.print_long_format(&status)
        }
    }

    fn print_porcelain_format(&self, status: &StatusInfo) -> anyhow::Result<()> {
        // staged first, then unstaged, then untracked, each sorted by path
        let lines = status
            .staged()
            .chain(status.unstaged())
            .chain(status.untracked());

        for (path, change) in lines {
            writeln!(self.writer(), "{} {path}", change.porcelain_code())?;
        }

        Ok(())
    }

    fn print_long_format(&self, status: &StatusInfo) -> anyhow::Result<()> {
        writeln!(self.writer(), "On branch {}", self.refs().current_branch()?)?;

        if status.is_clean() {
            writeln!(self.writer(), "nothing to commit, working tree clean")?;
            return Ok(());
        }

        self.print_bucket("Changes to be committed:", status.staged())?;
        self.print_bucket("Changes not staged for commit:", status.unstaged())?;
        self.print_bucket("Untracked files:", status.untracked())?;

        if status.staged().next().is_none() {
            writeln!(
                self.writer(),
                "nothing added to commit but untracked files present (use \"gith add\" to track)"
            )?;
        }

        Ok(())
    }

    fn print_bucket<'s>(
        &self,
        title: &str,
        changes: impl Iterator<Item = (&'s String, &'s FileChange)>,
    ) -> anyhow::Result<()> {
        let mut changes = changes.peekable();
        if changes.peek().is_none() {
            return Ok(());
        }

        writeln!(self.writer(), "{title}")?;
        for (path, change) in changes {
            writeln!(self.writer(), "{}", change.long_format(path))?;
        }
        writeln!(self.writer())?;

        Ok(())
    }
}
