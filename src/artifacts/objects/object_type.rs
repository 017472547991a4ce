#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

/// How an object kind derives its identifier from its serialized bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashScheme {
    /// SHA-1 of the serialized content as-is
    Raw,
    /// SHA-1 of `<type> <size>\0<content>`
    LengthPrefixed,
}

impl ObjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }

    pub fn hash_scheme(&self) -> HashScheme {
        match self {
            ObjectType::Blob | ObjectType::Tree => HashScheme::Raw,
            ObjectType::Commit => HashScheme::LengthPrefixed,
        }
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            _ => Err(anyhow::anyhow!("Invalid object type: {value}")),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
