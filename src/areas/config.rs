//! Configuration files
//!
//! Configuration is stored in an INI-like format:
//!
//! ```text
//! [user]
//! 	name = Jane Doe
//! 	email = jane@example.com
//! [remote "origin"]
//! 	url = https://example.com
//! 	repositoryId = 42
//! ```
//!
//! Keys are addressed as `section.name` or `section.subsection.name`
//! (e.g. `remote.origin.url`). Two files are consulted: the repository's
//! `.gith/config` and the global `~/.githconfig`; local values win per key.
//! A file that fails to parse is read as empty and refuses to be saved.

use crate::artifacts::objects::commit::{DEFAULT_AUTHOR_EMAIL, DEFAULT_AUTHOR_NAME};
use crate::errors::RepositoryError;
use anyhow::Context;
use regex::Regex;
use std::path::Path;

const SECTION_REGEX: &str = r#"^\[([A-Za-z0-9.-]+)(?:\s+"([^"]*)")?\]$"#;
const ENTRY_REGEX: &str = r"^([A-Za-z][A-Za-z0-9-]*)(?:\s*=\s*(.*))?$";
const IMPLICIT_VALUE: &str = "true";

pub const REMOTE_SECTION: &str = "remote";
pub const URL_KEY: &str = "url";
pub const REPOSITORY_ID_KEY: &str = "repositoryId";

/// Parsed `section[.subsection].name` key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigKey {
    section: String,
    subsection: Option<String>,
    name: String,
}

impl ConfigKey {
    pub fn try_parse(key: &str) -> Result<Self, RepositoryError> {
        let (section, rest) = key
            .split_once('.')
            .ok_or_else(|| RepositoryError::InvalidConfigKey(key.to_string()))?;
        let (subsection, name) = match rest.rsplit_once('.') {
            Some((subsection, name)) => (Some(subsection.to_string()), name),
            None => (None, rest),
        };

        if section.is_empty() || name.is_empty() {
            return Err(RepositoryError::InvalidConfigKey(key.to_string()));
        }

        Ok(ConfigKey {
            section: section.to_string(),
            subsection,
            name: name.to_string(),
        })
    }

    fn for_remote(remote: &str, name: &str) -> Self {
        ConfigKey {
            section: REMOTE_SECTION.to_string(),
            subsection: Some(remote.to_string()),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ConfigSection {
    name: String,
    subsection: Option<String>,
    entries: Vec<(String, String)>,
}

impl ConfigSection {
    fn matches(&self, name: &str, subsection: Option<&str>) -> bool {
        self.name.eq_ignore_ascii_case(name) && self.subsection.as_deref() == subsection
    }

    fn header(&self) -> String {
        match &self.subsection {
            Some(subsection) => format!("[{} \"{}\"]", self.name, subsection),
            None => format!("[{}]", self.name),
        }
    }
}

/// Remote record stored under `[remote "<name>"]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub name: String,
    pub url: String,
    pub repository_id: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    path: Box<Path>,
    sections: Vec<ConfigSection>,
    malformed: bool,
}

impl Config {
    /// Load a config file; a missing or unparseable file yields an empty config
    pub fn load(path: Box<Path>) -> anyhow::Result<Self> {
        let (sections, malformed) = match std::fs::read_to_string(&path) {
            Ok(content) => match Self::parse(&content) {
                Ok(sections) => (sections, false),
                Err(error) => {
                    tracing::warn!(path = ?path, %error, "ignoring unparseable config file");
                    (Vec::new(), true)
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => (Vec::new(), false),
            Err(error) => {
                return Err(error).with_context(|| format!("failed to read config file at {:?}", path));
            }
        };

        Ok(Config {
            path,
            sections,
            malformed,
        })
    }

    fn parse(content: &str) -> anyhow::Result<Vec<ConfigSection>> {
        let section_re = Regex::new(SECTION_REGEX)?;
        let entry_re = Regex::new(ENTRY_REGEX)?;
        let mut sections: Vec<ConfigSection> = Vec::new();

        for (line_number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(captures) = section_re.captures(line) {
                sections.push(ConfigSection {
                    name: captures[1].to_string(),
                    subsection: captures.get(2).map(|m| m.as_str().to_string()),
                    entries: Vec::new(),
                });
            } else if let Some(captures) = entry_re.captures(line) {
                let section = sections
                    .last_mut()
                    .with_context(|| format!("entry outside of a section at line {}", line_number + 1))?;
                let value = captures
                    .get(2)
                    .map_or(IMPLICIT_VALUE, |value| value.as_str().trim());
                section.entries.push((captures[1].to_string(), value.to_string()));
            } else {
                anyhow::bail!("invalid config line {}: {}", line_number + 1, line);
            }
        }

        Ok(sections)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &ConfigKey) -> Option<&str> {
        self.sections
            .iter()
            .filter(|section| section.matches(&key.section, key.subsection.as_deref()))
            .flat_map(|section| section.entries.iter())
            .filter(|(name, _)| name.eq_ignore_ascii_case(&key.name))
            .map(|(_, value)| value.as_str())
            .last()
    }

    pub fn set(&mut self, key: &ConfigKey, value: &str) {
        let position = match self
            .sections
            .iter()
            .position(|section| section.matches(&key.section, key.subsection.as_deref()))
        {
            Some(position) => position,
            None => {
                self.sections.push(ConfigSection {
                    name: key.section.clone(),
                    subsection: key.subsection.clone(),
                    entries: Vec::new(),
                });
                self.sections.len() - 1
            }
        };
        let section = &mut self.sections[position];

        match section
            .entries
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(&key.name))
        {
            Some((_, existing)) => *existing = value.to_string(),
            None => section.entries.push((key.name.clone(), value.to_string())),
        }
    }

    pub fn remotes(&self) -> Vec<RemoteConfig> {
        self.sections
            .iter()
            .filter(|section| section.name.eq_ignore_ascii_case(REMOTE_SECTION))
            .filter_map(|section| section.subsection.as_deref())
            .filter_map(|name| self.remote(name))
            .collect()
    }

    pub fn remote(&self, name: &str) -> Option<RemoteConfig> {
        let url = self.get(&ConfigKey::for_remote(name, URL_KEY))?;
        let repository_id = self
            .get(&ConfigKey::for_remote(name, REPOSITORY_ID_KEY))
            .unwrap_or_default();

        Some(RemoteConfig {
            name: name.to_string(),
            url: url.to_string(),
            repository_id: repository_id.to_string(),
        })
    }

    pub fn set_remote(&mut self, remote: &RemoteConfig) {
        self.set(&ConfigKey::for_remote(&remote.name, URL_KEY), &remote.url);
        self.set(
            &ConfigKey::for_remote(&remote.name, REPOSITORY_ID_KEY),
            &remote.repository_id,
        );
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if self.malformed {
            anyhow::bail!(
                "config file at {:?} is malformed; fix it by hand before changing settings",
                self.path
            );
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&self.path, self.to_string())
            .with_context(|| format!("failed to write config file at {:?}", self.path))
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for section in &self.sections {
            writeln!(f, "{}", section.header())?;
            for (name, value) in &section.entries {
                writeln!(f, "\t{name} = {value}")?;
            }
        }

        Ok(())
    }
}

/// Local configuration layered over the global one
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    local: Config,
    global: Config,
}

impl LayeredConfig {
    pub fn new(local: Config, global: Config) -> Self {
        LayeredConfig { local, global }
    }

    pub fn local(&self) -> &Config {
        &self.local
    }

    pub fn local_mut(&mut self) -> &mut Config {
        &mut self.local
    }

    pub fn get(&self, key: &ConfigKey) -> Option<&str> {
        self.local.get(key).or_else(|| self.global.get(key))
    }

    /// `(name, email)` of the configured user, defaults filled in per key
    pub fn identity(&self) -> (String, String) {
        let name = ConfigKey::try_parse("user.name")
            .ok()
            .and_then(|key| self.get(&key).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_AUTHOR_NAME.to_string());
        let email = ConfigKey::try_parse("user.email")
            .ok()
            .and_then(|key| self.get(&key).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_AUTHOR_EMAIL.to_string());

        (name, email)
    }
}
