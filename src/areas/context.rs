//! Explicit process context
//!
//! Commands never read the current directory, the home directory or the
//! environment directly; they receive a [`WorkingContext`] instead, so tests can
//! run against temporary directories without touching process state.

use derive_new::new;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Name of the repository metadata directory
pub const METADATA_DIR: &str = ".gith";

/// Name of the global config file inside the home directory
pub const GLOBAL_CONFIG_FILE: &str = ".githconfig";

/// Environment variable holding an optional bearer token for the remote
pub const TOKEN_ENV: &str = "GITH_TOKEN";

/// Environment variable overriding the author timestamp of new commits
pub const AUTHOR_DATE_ENV: &str = "GITH_AUTHOR_DATE";

#[derive(Debug, Clone, new)]
pub struct WorkingContext {
    /// Directory the command was invoked from
    pub current_dir: PathBuf,
    /// Home directory holding the global config
    pub home_dir: PathBuf,
    /// Environment variables visible to the command
    pub env: HashMap<String, String>,
}

impl WorkingContext {
    /// Capture the context of the running process
    pub fn from_process() -> anyhow::Result<Self> {
        let current_dir = std::env::current_dir()?;
        let home_dir = dirs::home_dir().unwrap_or_else(|| current_dir.clone());

        Ok(WorkingContext::new(
            current_dir,
            home_dir,
            std::env::vars().collect(),
        ))
    }

    pub fn var(&self, key: &str) -> Option<&str> {
        self.env
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn global_config_path(&self) -> PathBuf {
        self.home_dir.join(GLOBAL_CONFIG_FILE)
    }

    /// Resolve a user-supplied path against the invocation directory
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.current_dir.join(path)
        }
    }

    /// Closest ancestor of the invocation directory containing a metadata directory
    pub fn discover_root(&self) -> Option<PathBuf> {
        self.current_dir
            .ancestors()
            .find(|dir| dir.join(METADATA_DIR).is_dir())
            .map(Path::to_path_buf)
    }
}
