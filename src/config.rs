//! Runtime configuration.
//!
//! GLEAN_STORAGE_PATH  storage root (default `storage`, relative to the working directory)
//!
//! The default fixture directory is `<storage root>/fixtures`.

use serde::Serialize;
use std::path::{Path, PathBuf};

pub const STORAGE_ENV: &str = "GLEAN_STORAGE_PATH";
pub const DEFAULT_STORAGE: &str = "storage";
pub const FIXTURES_DIR: &str = "fixtures";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub storage_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from(DEFAULT_STORAGE),
        }
    }
}

impl Config {
    /// Read the environment; a blank variable counts as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        lookup(STORAGE_ENV)
            .filter(|s| !s.trim().is_empty())
            .map(|root| Self {
                storage_root: PathBuf::from(root),
            })
            .unwrap_or_default()
    }

    /// `storage_path("x")` -> `<storage root>/x`.
    pub fn storage_path(&self, sub: impl AsRef<Path>) -> PathBuf {
        self.storage_root.join(sub)
    }

    pub fn fixtures_path(&self) -> PathBuf {
        self.storage_path(FIXTURES_DIR)
    }
}
