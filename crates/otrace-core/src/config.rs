//! Configuration types for otrace.
//!
//! [`Config::load`] reads `~/.config/otrace/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist, then applies `OTRACE__*`
//! environment overrides. [`Config::defaults`] returns the same defaults
//! without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[analyzer]
root          = "Logs"
log_extension = "log"
inbound_dir   = "Raw/Inbound"
outbound_dir  = "Raw/Outbound"
maps_dir      = "Raw/Maps"

[server]
bind = "127.0.0.1:8080"
"#;

const ENV_PREFIX: &str = "OTRACE";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/otrace/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// `[analyzer]` section of `config.toml`: where the artifacts live.
///
/// The three raw directories are relative to `root`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_log_extension")]
    pub log_extension: String,
    #[serde(default = "default_inbound_dir")]
    pub inbound_dir: String,
    #[serde(default = "default_outbound_dir")]
    pub outbound_dir: String,
    #[serde(default = "default_maps_dir")]
    pub maps_dir: String,
}

fn default_root() -> PathBuf { PathBuf::from("Logs") }
fn default_log_extension() -> String { "log".to_string() }
fn default_inbound_dir() -> String { "Raw/Inbound".to_string() }
fn default_outbound_dir() -> String { "Raw/Outbound".to_string() }
fn default_maps_dir() -> String { "Raw/Maps".to_string() }

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            log_extension: default_log_extension(),
            inbound_dir: default_inbound_dir(),
            outbound_dir: default_outbound_dir(),
            maps_dir: default_maps_dir(),
        }
    }
}

impl AnalyzerConfig {
    /// Defaults with a different root; the usual shape in tests.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

/// `[server]` section of `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String { "127.0.0.1:8080".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/otrace/config.toml`, layered on top of the built-in
    /// defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::layered(&[path.as_path()])
    }

    /// Like [`Config::load`], with an explicit file layered on top of the
    /// user config. The explicit file must exist.
    pub fn load_from(explicit: &Path) -> anyhow::Result<Self> {
        if !explicit.exists() {
            anyhow::bail!("config file not found: {}", explicit.display());
        }
        let user = config_path();
        Self::layered(&[user.as_path(), explicit])
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    fn layered(files: &[&Path]) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml));
        for file in files {
            builder = builder.add_source(config::File::from(*file).required(false));
        }
        builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("otrace")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
