//! Configuration management for the taxonomy lookup.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/gaap-lookup/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Taxonomy source settings
    pub taxonomy: TaxonomyConfig,
    /// Lookup and paging settings
    pub lookup: LookupConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML or fail validation
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error here.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `GAAP_TAXONOMY_DIR`: Override the taxonomy root directory
    /// - `GAAP_TAXONOMY_VERSION`: Override the taxonomy version (e.g. `2025`)
    /// - `GAAP_LABEL_LANGUAGE`: Override the label language (e.g. `en-US`)
    /// - `GAAP_MAX_PAGE_LIMIT`: Override the maximum page size
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable source (the process environment in
    /// [`AppConfig::load_with_env`]).
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("GAAP_TAXONOMY_DIR") {
            tracing::debug!("Override taxonomy.root_dir from env: {}", dir);
            self.taxonomy.root_dir = PathBuf::from(dir);
        }

        if let Some(version) = var("GAAP_TAXONOMY_VERSION") {
            tracing::debug!("Override taxonomy.version from env: {}", version);
            self.taxonomy.version = version;
        }

        if let Some(language) = var("GAAP_LABEL_LANGUAGE") {
            tracing::debug!("Override taxonomy.label_language from env: {}", language);
            self.taxonomy.label_language = language;
        }

        if let Some(val) = var("GAAP_MAX_PAGE_LIMIT") {
            if let Ok(limit) = val.parse() {
                self.lookup.max_page_limit = limit;
                tracing::debug!("Override lookup.max_page_limit from env: {}", limit);
            }
        }
    }

    /// Check that the configuration values are usable.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.taxonomy.prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "taxonomy.prefix".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }

        if self.taxonomy.version.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "taxonomy.version".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }

        if self.lookup.max_page_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "lookup.max_page_limit".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.lookup.default_page_limit == 0
            || self.lookup.default_page_limit > self.lookup.max_page_limit
        {
            return Err(ConfigError::InvalidValue {
                field: "lookup.default_page_limit".to_string(),
                reason: format!(
                    "must be 1-{}, got {}",
                    self.lookup.max_page_limit, self.lookup.default_page_limit
                ),
            });
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/gaap-lookup/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("org", "gaap", "gaap-lookup")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Taxonomy source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomyConfig {
    /// Taxonomy root directory (the one containing `elts/`)
    pub root_dir: PathBuf,
    /// Element namespace prefix used in file names and locator fragments
    pub prefix: String,
    /// Taxonomy release year
    pub version: String,
    /// Language of the labels to index
    pub label_language: String,
}

impl TaxonomyConfig {
    /// Path of the schema document, e.g. `elts/us-gaap-2025.xsd`.
    #[must_use]
    pub fn schema_path(&self) -> PathBuf {
        self.elts_dir()
            .join(format!("{}-{}.xsd", self.prefix, self.version))
    }

    /// Path of the label linkbase, e.g. `elts/us-gaap-lab-2025.xml`.
    #[must_use]
    pub fn label_path(&self) -> PathBuf {
        self.elts_dir()
            .join(format!("{}-lab-{}.xml", self.prefix, self.version))
    }

    /// Path of the reference linkbase, e.g. `elts/us-gaap-ref-2025.xml`.
    #[must_use]
    pub fn reference_path(&self) -> PathBuf {
        self.elts_dir()
            .join(format!("{}-ref-{}.xml", self.prefix, self.version))
    }

    /// Path of a disclosure group's presentation linkbase, e.g.
    /// `dis/us-gaap-dis-bc-pre-2025.xml` for code `bc`.
    #[must_use]
    pub fn presentation_path(&self, code: &str) -> PathBuf {
        self.root_dir
            .join("dis")
            .join(format!("{}-dis-{code}-pre-{}.xml", self.prefix, self.version))
    }

    fn elts_dir(&self) -> PathBuf {
        self.root_dir.join("elts")
    }
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("us-gaap-2025"),
            prefix: "us-gaap".to_string(),
            version: "2025".to_string(),
            label_language: "en-US".to_string(),
        }
    }
}

/// Lookup and paging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Page size used when a caller does not ask for one
    pub default_page_limit: usize,
    /// Upper bound applied to every requested page size
    pub max_page_limit: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            default_page_limit: 100,
            max_page_limit: 1000,
        }
    }
}
