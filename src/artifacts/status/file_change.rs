use colored::{ColoredString, Colorize};

const LABEL_WIDTH: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileChange {
    /// Indexed, and hash and mtime still match the working tree
    Staged,
    /// Indexed, but the working tree copy differs
    Modified,
    /// Indexed, but gone from the working tree
    Deleted,
    /// On disk, absent from the index
    Untracked,
}

impl FileChange {
    pub fn porcelain_code(&self) -> &'static str {
        match self {
            FileChange::Staged => "A ",
            FileChange::Modified => " M",
            FileChange::Deleted => " D",
            FileChange::Untracked => "??",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileChange::Staged => "new file:",
            FileChange::Modified => "modified:",
            FileChange::Deleted => "deleted:",
            FileChange::Untracked => "",
        }
    }

    /// Human-readable line for the long status format
    pub fn long_format(&self, path: &str) -> ColoredString {
        let line = match self {
            FileChange::Untracked => format!("\t{path}"),
            _ => format!("\t{:<width$}{path}", self.label(), width = LABEL_WIDTH),
        };

        match self {
            FileChange::Staged => line.green(),
            _ => line.red(),
        }
    }
}
