/*!
Fixture persistence.

`Fixture::save` creates the destination directory when it is missing (one level only,
parents must exist) and writes `<path>/<name>.<format>`, replacing any previous file.
`load` reads a fixture back by extension (php / json / yml / yaml).
*/

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::log_debug;
use crate::serialize::native;

/// A serialized value bound for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub path: PathBuf,
    pub name: String,
    pub format: String,
    pub content: String,
}

impl Fixture {
    pub fn file_name(&self) -> PathBuf {
        self.path.join(format!("{}.{}", self.name, self.format))
    }

    /// Write the fixture and return the file written.
    pub fn save(&self) -> Result<PathBuf> {
        if !self.path.is_dir() {
            log_debug!("creating fixture directory {}", self.path.display());
            fs::create_dir(&self.path).with_context(|| {
                format!("failed to create fixture directory: {}", self.path.display())
            })?;
        }
        let file = self.file_name();
        fs::write(&file, &self.content)
            .with_context(|| format!("failed to write fixture: {}", file.display()))?;
        log_debug!("wrote {} bytes to {}", self.content.len(), file.display());
        Ok(file)
    }
}

/// Read a fixture file back into a value, choosing the decoder by extension.
pub fn load(file: impl AsRef<Path>) -> Result<Value> {
    let file = file.as_ref();
    let raw = fs::read_to_string(file)
        .with_context(|| format!("failed to read fixture: {}", file.display()))?;
    let ext = file
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let value: Value = match ext {
        "php" => native::parse(&raw)
            .with_context(|| format!("failed to parse native literal: {}", file.display()))?,
        "json" => serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse JSON fixture: {}", file.display()))?,
        "yml" | "yaml" => serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse YAML fixture: {}", file.display()))?,
        other => bail!("cannot load fixtures with extension '{other}'"),
    };
    Ok(value)
}
