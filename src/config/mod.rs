//! Configuration management for `schoolfinder.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [source], [cache], [search], [serve]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # config file discovery
//! └── mod.rs         # AppConfig (this file)
//! ```
//!
//! The file is optional: without one every section takes its defaults and
//! the current directory is the project root.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{CacheConfig, SearchConfig, ServeConfig, SourceConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::cli::{Cli, Commands};
use crate::log;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "schoolfinder.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing schoolfinder.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Config file in use, `None` when running on defaults (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Directory relative paths resolve against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Dataset and geocoder endpoints
    #[serde(default)]
    pub source: SourceConfig,

    /// Local dataset cache
    #[serde(default)]
    pub cache: CacheConfig,

    /// Search defaults
    #[serde(default)]
    pub search: SearchConfig,

    /// JSON API server
    #[serde(default)]
    pub serve: ServeConfig,
}

impl AppConfig {
    /// Load configuration for the parsed command line.
    ///
    /// Searches upward from cwd for the config file. A missing default file
    /// is fine; a missing file named with `--config` is an error.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                config.config_path = Some(path);
                config
            }
            None if cli.config != Path::new(DEFAULT_CONFIG) => {
                return Err(ConfigError::Validation(format!(
                    "config file '{}' not found",
                    cli.config.display()
                ))
                .into());
            }
            None => Self {
                root: cwd,
                ..Self::default()
            },
        };

        config.finalize(cli);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Resolve paths against the root and apply command-line overrides.
    fn finalize(&mut self, cli: &Cli) {
        if self.cache.dir.is_relative() {
            self.cache.dir = self.root.join(&self.cache.dir);
        }

        if let Commands::Serve { interface, port } = &cli.command {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate every section, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.source.validate(&mut diag);
        self.cache.validate(&mut diag);
        self.search.validate(&mut diag);

        if !self.cache.enable {
            diag.warn(
                FieldPath::new("cache.enable"),
                "caching is off, every command downloads the dataset",
            );
        }

        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config from TOML text.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> AppConfig {
    let (parsed, ignored) = AppConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_from_str_invalid_toml() {
        let result = AppConfig::parse_with_ignored("[cache\nttl_secs = 1");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert!(config.config_path.is_none());
        assert_eq!(config.search.per_page, 20);
        assert_eq!(config.serve.port, 5290);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[search]\nper_page = 10\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = AppConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.search.per_page, 10);
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let (_, ignored) = AppConfig::parse_with_ignored("[serve]\nport = 1").unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = test_parse_config("[search]\nper_page = 0\n[source]\ntimeout_secs = 0");
        let Err(ConfigError::Diagnostics(diag)) = config.validate() else {
            panic!("expected diagnostics");
        };
        assert_eq!(diag.len(), 2);
    }

    #[test]
    fn test_finalize_resolves_cache_dir_and_serve_flags() {
        let cli = Cli::try_parse_from(["schoolfinder", "serve", "--port", "9000"]).unwrap();
        let mut config = AppConfig {
            root: PathBuf::from("/srv/project"),
            ..AppConfig::default()
        };
        config.finalize(&cli);

        assert_eq!(config.cache.dir, Path::new("/srv/project/.schoolfinder/cache"));
        assert_eq!(config.serve.port, 9000);
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        let cli = Cli::try_parse_from([
            "schoolfinder",
            "--config",
            missing.to_str().unwrap(),
            "updated",
        ])
        .unwrap();
        assert!(AppConfig::load(&cli).is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[cache]\ndir = \"data\"\n[search]\nnearby_km = 2.0").unwrap();

        let cli = Cli::try_parse_from([
            "schoolfinder",
            "-C",
            path.to_str().unwrap(),
            "updated",
        ])
        .unwrap();
        let config = AppConfig::load(&cli).unwrap();

        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.cache.dir, dir.path().join("data"));
        assert_eq!(config.search.nearby_km, 2.0);
    }
}
