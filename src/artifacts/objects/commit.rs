//! Commit object
//!
//! Commits represent snapshots of the repository at specific points in time.
//! They contain:
//! - A tree object ID (file manifest)
//! - At most one parent commit ID
//! - Author and committer information
//! - Commit message
//!
//! ## Format
//!
//! On disk (the `commit <size>\0` header only takes part in hashing):
//! ```text
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};

pub const DEFAULT_AUTHOR_NAME: &str = "Unknown User";
pub const DEFAULT_AUTHOR_EMAIL: &str = "unknown@example.com";

/// Author or committer information
///
/// Contains name, email, and timestamp with timezone information.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: DateTime<FixedOffset>,
}

impl Author {
    /// Create a new author stamped with the current local time
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(name: String, email: String, timestamp: DateTime<FixedOffset>) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// "Name <email@example.com>"
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// "Name <email> timestamp timezone"
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    /// Format timestamp like "Mon Jan 1 12:34:56 2024 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Format: "name <email> timestamp timezone"
        // Split from right to get timezone and timestamp first
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(anyhow::anyhow!("Invalid author format"));
        }

        let timezone = parts[0];
        let timestamp = parts[1]
            .parse::<i64>()
            .map_err(|_| anyhow::anyhow!("Invalid timestamp"))?;
        let name_email_part = parts[2];

        let email_start = name_email_part
            .find('<')
            .ok_or_else(|| anyhow::anyhow!("Invalid author format: missing '<'"))?;
        let email_end = name_email_part
            .rfind('>')
            .ok_or_else(|| anyhow::anyhow!("Invalid author format: missing '>'"))?;

        let name = name_email_part[..email_start].trim().to_string();
        let email = name_email_part[email_start + 1..email_end].to_string();

        let offset = DateTime::parse_from_str(&format!("1970-01-01 00:00:00 {timezone}"), "%Y-%m-%d %H:%M:%S %z")
            .map_err(|_| anyhow::anyhow!("Invalid timezone"))?
            .offset()
            .to_owned();
        let datetime = DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| anyhow::anyhow!("Invalid timestamp"))?
            .with_timezone(&offset);

        Ok(Author {
            name,
            email,
            timestamp: datetime,
        })
    }
}

/// Commit object
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    parent: Option<ObjectId>,
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    /// Create a new commit where the author is also the committer
    pub fn new(parent: Option<ObjectId>, tree_oid: ObjectId, author: Author, message: String) -> Self {
        Commit {
            parent,
            tree_oid,
            author: author.clone(),
            committer: author,
            message,
        }
    }

    pub fn with_committer(mut self, committer: Author) -> Self {
        self.committer = committer;
        self
    }

    /// First line of the commit message
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn committer(&self) -> &Author {
        &self.committer
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.author.timestamp()
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut lines = vec![];

        lines.push(format!("tree {}", self.tree_oid));
        if let Some(parent) = &self.parent {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines.push(String::new());
        lines.push(self.message.to_string());

        Ok(Bytes::from(lines.join("\n")))
    }
}

impl Unpackable for Commit {
    fn deserialize(content: Bytes) -> anyhow::Result<Self> {
        let content = String::from_utf8(content.to_vec()).context("Invalid commit object: not UTF-8")?;
        let mut lines = content.split('\n');

        let tree_oid = lines
            .next()
            .context("Invalid commit object: missing tree line")?
            .strip_prefix("tree ")
            .context("Invalid commit object: invalid tree line")?;
        let tree_oid = ObjectId::try_parse(tree_oid.to_string())?;

        let mut next_line = lines
            .next()
            .context("Invalid commit object: missing author line")?;

        let parent = match next_line.strip_prefix("parent ") {
            Some(parent_oid) => {
                let parent = ObjectId::try_parse(parent_oid.to_string())?;
                next_line = lines
                    .next()
                    .context("Invalid commit object: missing author line")?;
                Some(parent)
            }
            None => None,
        };

        let author = next_line
            .strip_prefix("author ")
            .context("Invalid commit object: invalid author line")?;
        let author = Author::try_from(author)?;

        let committer = lines
            .next()
            .context("Invalid commit object: missing committer line")?
            .strip_prefix("committer ")
            .context("Invalid commit object: invalid committer line")?;
        let committer = Author::try_from(committer)?;

        // skip the empty line
        lines.next();

        let message = lines.collect::<Vec<&str>>().join("\n");
        Ok(Self::new(parent, tree_oid, author, message).with_committer(committer))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
