//! Config discovery and loading.
//!
//! Sources, lowest precedence first: the user file (`~/.aida/aida.json5`),
//! the project file (`<project>/aida.json5`), an explicit file passed on the
//! command line, then environment overrides. Each source is shape-checked on
//! its own so errors name the file they came from, the sources are merged key
//! by key, and the merged document is checked again before decoding.

mod env;
mod merge;
mod schema;


use crate::{AidaConfig, ConfigError};
use directories::UserDirs;
use log::{debug, info};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the project directory and under `~/.aida`.
pub const CONFIG_FILE_NAME: &str = "aida.json5";
const USER_CONFIG_DIR: &str = ".aida";

/// Where a piece of configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    User,
    Project,
    /// File named with `--config`.
    Explicit,
    Environment,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::User => "user",
            Self::Project => "project",
            Self::Explicit => "explicit",
            Self::Environment => "env",
        };
        f.write_str(label)
    }
}

/// A source that contributed to the resolved config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub source: ConfigSource,
    /// `None` for environment overrides.
    pub path: Option<PathBuf>,
}

/// Decoded config plus the sources that produced it, lowest precedence first.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: AidaConfig,
    pub sources: Vec<SourceInfo>,
}

/// Inputs to [`AidaConfig::resolve`].
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub project_dir: PathBuf,
    pub user_file: Option<PathBuf>,
    pub explicit_file: Option<PathBuf>,
    /// Environment snapshot. Only recognised variables have an effect.
    pub env: BTreeMap<String, String>,
}

impl LoadOptions {
    /// Real user file and process environment.
    pub fn discover(project_dir: impl AsRef<Path>) -> Self {
        Self {
            project_dir: project_dir.as_ref().to_path_buf(),
            user_file: UserDirs::new().map(|dirs| {
                dirs.home_dir()
                    .join(USER_CONFIG_DIR)
                    .join(CONFIG_FILE_NAME)
            }),
            explicit_file: None,
            env: env::capture(),
        }
    }

    /// Project file only: no user file and an empty environment.
    pub fn isolated(project_dir: impl AsRef<Path>) -> Self {
        Self {
            project_dir: project_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn with_explicit_file(mut self, path: Option<PathBuf>) -> Self {
        self.explicit_file = path;
        self
    }

    pub fn with_env(mut self, var: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(var.into(), value.into());
        self
    }
}

impl AidaConfig {
    /// Load exactly one file, ignoring every other source.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("loading config from path: {}", path.display());
        let value = read_document(path, &path.display().to_string())?;
        decode(value)
    }

    /// Parse JSON5 contents as a complete config.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let value = parse_document(contents, "inline")?;
        decode(value)
    }

    /// Merge every available source into one validated config.
    ///
    /// Missing user and project files are skipped. A missing explicit file is
    /// an error.
    pub fn resolve(options: LoadOptions) -> Result<ResolvedConfig, ConfigError> {
        info!(
            "resolving config (project_dir={}, explicit={})",
            options.project_dir.display(),
            options.explicit_file.is_some()
        );
        let project_file = options.project_dir.join(CONFIG_FILE_NAME);
        let mut files: Vec<(ConfigSource, PathBuf)> = Vec::new();
        if let Some(path) = options.user_file.filter(|path| path.is_file()) {
            files.push((ConfigSource::User, path));
        }
        if project_file.is_file() {
            files.push((ConfigSource::Project, project_file));
        }
        if let Some(path) = options.explicit_file {
            if !path.is_file() {
                return Err(ConfigError::Io {
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "explicit config file not found",
                    ),
                    path,
                });
            }
            files.push((ConfigSource::Explicit, path));
        }
        dedupe_files(&mut files);

        let mut merged = Value::Object(serde_json::Map::new());
        let mut sources = Vec::with_capacity(files.len() + 1);
        for (source, path) in files {
            let origin = format!("{source}({})", path.display());
            let document = read_document(&path, &origin)?;
            debug!("merging config source {origin}");
            merge::overlay(&mut merged, document);
            sources.push(SourceInfo {
                source,
                path: Some(path),
            });
        }
        if let Some(document) = env::overlay(&options.env)? {
            schema::check_source(&document, "env")?;
            debug!("merging environment overrides");
            merge::overlay(&mut merged, document);
            sources.push(SourceInfo {
                source: ConfigSource::Environment,
                path: None,
            });
        }

        let config = decode(merged)?;
        info!("config resolved (sources={})", sources.len());
        Ok(ResolvedConfig { config, sources })
    }

    /// Check relationships between fields that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let retrieval = &self.retrieval;
        if retrieval.top_k == 0 {
            return Err(ConfigError::Invalid(
                "retrieval.top_k must be at least 1".to_string(),
            ));
        }
        if retrieval.top_k > retrieval.max_top_k {
            return Err(ConfigError::Invalid(format!(
                "retrieval.top_k ({}) exceeds retrieval.max_top_k ({})",
                retrieval.top_k, retrieval.max_top_k
            )));
        }
        if self.embedding.dimensions == Some(0) {
            return Err(ConfigError::Invalid(
                "embedding.dimensions must be at least 1".to_string(),
            ));
        }
        if self.generation.max_tokens == 0 {
            return Err(ConfigError::Invalid(
                "generation.max_tokens must be at least 1".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ConfigError::Invalid(
                "generation.temperature must be between 0 and 2".to_string(),
            ));
        }
        Ok(())
    }
}

fn read_document(path: &Path, origin: &str) -> Result<Value, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&contents, origin)
}

fn parse_document(contents: &str, origin: &str) -> Result<Value, ConfigError> {
    let value: Value = json5::from_str(contents).map_err(|source| ConfigError::Syntax {
        origin: origin.to_string(),
        source,
    })?;
    schema::check_source(&value, origin)?;
    Ok(value)
}

fn decode(value: Value) -> Result<AidaConfig, ConfigError> {
    schema::check_source(&value, "effective")?;
    let config: AidaConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}

/// Drop files that resolve to one already listed, keeping the later entry.
fn dedupe_files(files: &mut Vec<(ConfigSource, PathBuf)>) {
    let canonical = |path: &Path| path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let mut idx = 0;
    while idx < files.len() {
        let current = canonical(&files[idx].1);
        let shadowed = files[idx + 1..]
            .iter()
            .any(|(_, later)| canonical(later) == current);
        if shadowed {
            debug!(
                "skipping {} config already loaded from a later source",
                files[idx].0
            );
            files.remove(idx);
        } else {
            idx += 1;
        }
    }
}
