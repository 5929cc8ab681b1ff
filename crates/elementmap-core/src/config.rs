//! Layered configuration for the resolver, the CLI, and the HTTP server.
//!
//! Resolution order (first hit wins): an explicit `--config` path, the
//! project file `.elementmap/config.toml`, the user file
//! `<config_dir>/elementmap/config.toml`, then built-in defaults.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::normalize::DEFAULT_ROUND_LIMIT;

/// Project-relative location of the config file.
pub const PROJECT_CONFIG_PATH: &str = ".elementmap/config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub traversal: TraversalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file. Relative paths resolve against the project root.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// Prefix prepended to every table name (`craft_` on stock installs).
    #[serde(default)]
    pub table_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            table_prefix: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Locale relations and titles are resolved in.
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Site primary locale; edit links omit the locale segment for it.
    #[serde(default)]
    pub primary_locale: Option<String>,
    /// Control panel URL segment.
    #[serde(default = "default_cp_trigger")]
    pub cp_trigger: String,
    /// Scheme and host prepended to control panel links. Empty keeps links
    /// root-relative.
    #[serde(default)]
    pub base_url: String,
}

impl SiteConfig {
    /// Primary locale, defaulting to the active locale.
    #[must_use]
    pub fn primary_locale(&self) -> &str {
        self.primary_locale.as_deref().unwrap_or(&self.locale)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            primary_locale: None,
            cp_trigger: default_cp_trigger(),
            base_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalConfig {
    /// Upper bound on normalization rounds per direction.
    #[serde(default = "default_round_limit")]
    pub round_limit: usize,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            round_limit: default_round_limit(),
        }
    }
}

impl MapConfig {
    /// Absolute store path, resolving relative paths against `project_root`.
    #[must_use]
    pub fn store_path(&self, project_root: &Path) -> PathBuf {
        if self.store.path.is_absolute() {
            self.store.path.clone()
        } else {
            project_root.join(&self.store.path)
        }
    }
}

/// Parse a config file that must exist.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_config_file(path: &Path) -> Result<MapConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<MapConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the project config, or `None` when the project has no config file.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<Option<MapConfig>> {
    let path = project_root.join(PROJECT_CONFIG_PATH);
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// Load the per-user config, or `None` when it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<Option<MapConfig>> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(None);
    };

    let path = config_dir.join("elementmap/config.toml");
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// Resolve the effective configuration for a run.
///
/// # Errors
///
/// Returns an error if an explicit config path is missing, or if any config
/// file that exists fails to parse.
pub fn resolve_config(project_root: &Path, explicit: Option<&Path>) -> Result<MapConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            bail!("config file {} does not exist", path.display());
        }
        return load_config_file(path);
    }

    if let Some(config) = load_project_config(project_root)? {
        return Ok(config);
    }

    Ok(load_user_config()?.unwrap_or_default())
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".elementmap/content.db")
}

fn default_locale() -> String {
    "en_us".to_string()
}

fn default_cp_trigger() -> String {
    "admin".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    3333
}

const fn default_round_limit() -> usize {
    DEFAULT_ROUND_LIMIT
}
