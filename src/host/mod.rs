/*!
Built-in targets shipped with the `glean` binary.

  Glean\Env          (static)   get(name), all(), cwd()
  Glean\Config       (instance) all(), storagePath(), fixturesPath()
  Glean\Filesystem   (instance) files(dir), stat(path), read(path), json(path), yaml(path)
  Glean\Diagnostics  (static)   echo(args...), fail(message)

Applications embedding the library register their own classes on a fresh
`Registry`/`Container` pair instead.
*/

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::target::{Argument, Container, Registry, required_str};

pub const ENV: &str = "Glean\\Env";
pub const CONFIG: &str = "Glean\\Config";
pub const FILESYSTEM: &str = "Glean\\Filesystem";
pub const DIAGNOSTICS: &str = "Glean\\Diagnostics";

/// Registry and container pre-populated with the built-in targets.
pub fn builtin(config: &Config) -> (Registry, Container) {
    let mut registry = Registry::new();
    let mut container = Container::new();
    register(&mut registry, &mut container, config);
    (registry, container)
}

pub fn register(registry: &mut Registry, container: &mut Container, config: &Config) {
    registry
        .class::<()>(ENV)
        .static_method("get", |args| {
            let name = required_str(args, 0, "name")?;
            Ok(std::env::var(name).ok())
        })
        .static_method("all", |_| {
            Ok(std::env::vars_os()
                .map(|(k, v)| (k.to_string_lossy().into_owned(), v.to_string_lossy().into_owned()))
                .collect::<BTreeMap<String, String>>())
        })
        .static_method("cwd", |_| {
            let cwd = std::env::current_dir().context("failed to read working directory")?;
            Ok(cwd.display().to_string())
        });

    let runtime = config.clone();
    container.bind(CONFIG, move |_| Ok(runtime.clone()));
    registry
        .class::<Config>(CONFIG)
        .method("all", |config, _| Ok(config.clone()))
        .method("storagePath", |config, _| {
            Ok(config.storage_root.display().to_string())
        })
        .method("fixturesPath", |config, _| {
            Ok(config.fixtures_path().display().to_string())
        });

    container.bind(FILESYSTEM, |_| Filesystem::current());
    registry
        .class::<Filesystem>(FILESYSTEM)
        .method("files", |disk, args| disk.files(required_str(args, 0, "directory")?))
        .method("stat", |disk, args| disk.stat(required_str(args, 0, "path")?))
        .method("read", |disk, args| disk.read(required_str(args, 0, "path")?))
        .method("json", |disk, args| disk.json(required_str(args, 0, "path")?))
        .method("yaml", |disk, args| disk.yaml(required_str(args, 0, "path")?));

    registry
        .class::<()>(DIAGNOSTICS)
        .static_method("echo", |args| Ok(args.to_vec()))
        .static_method("fail", |args| -> Result<()> {
            let message = match args.first() {
                Some(Argument::Str(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => "diagnostic failure".to_string(),
            };
            anyhow::bail!(message)
        });
}

/// Read-only view of files relative to a root directory.
#[derive(Debug, Clone)]
pub struct Filesystem {
    root: PathBuf,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Stat {
    pub path: String,
    pub size: u64,
    pub directory: bool,
    pub readonly: bool,
}

impl Filesystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Rooted at the process working directory.
    pub fn current() -> Result<Self> {
        let root = std::env::current_dir().context("failed to read working directory")?;
        Ok(Self::new(root))
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.root.join(p)
        }
    }

    /// Entry names in `dir`, sorted.
    pub fn files(&self, dir: &str) -> Result<Vec<String>> {
        let full = self.resolve(dir);
        let mut names = Vec::new();
        for entry in
            fs::read_dir(&full).with_context(|| format!("failed to list {}", full.display()))?
        {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    pub fn stat(&self, path: &str) -> Result<Stat> {
        let full = self.resolve(path);
        let meta =
            fs::metadata(&full).with_context(|| format!("failed to stat {}", full.display()))?;
        Ok(Stat {
            path: path.to_string(),
            size: meta.len(),
            directory: meta.is_dir(),
            readonly: meta.permissions().readonly(),
        })
    }

    pub fn read(&self, path: &str) -> Result<String> {
        let full = self.resolve(path);
        fs::read_to_string(&full).with_context(|| format!("failed to read {}", full.display()))
    }

    pub fn json(&self, path: &str) -> Result<Value> {
        let raw = self.read(path)?;
        serde_json::from_str(&raw).with_context(|| format!("failed to parse JSON: {path}"))
    }

    pub fn yaml(&self, path: &str) -> Result<Value> {
        let raw = self.read(path)?;
        serde_yaml::from_str(&raw).with_context(|| format!("failed to parse YAML: {path}"))
    }
}
