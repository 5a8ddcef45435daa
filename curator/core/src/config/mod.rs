//! TOML Configuration File Support
//!
//! Centralized configuration loading for the gallery, supporting a TOML
//! configuration file at `~/.config/cardwall/gallery.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (when applicable)
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [feed]
//! endpoint = "https://script.example.com/macros/s/abc123/exec?out=json"
//! request_timeout_ms = 30000
//! retry_backoff_ms = 1500
//!
//! [gallery]
//! page_size = 10
//! sort = "alphabetical"
//! preloader_grace_ms = 400
//!
//! [art]
//! fallback_image = "https://cdn.example.com/placeholder.png"
//! fallback_link = "https://example.com"
//! overlay_dir = "https://cdn.example.com/overlays"
//! animated_base = "https://cdn.example.com/overlays/anim-"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::card::{Badge, SortMode};

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Feed section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedToml {
    /// Feed endpoint URL
    pub endpoint: Option<String>,

    /// Request timeout in milliseconds
    pub request_timeout_ms: Option<u64>,

    /// Backoff before the single automatic retry, in milliseconds
    pub retry_backoff_ms: Option<u64>,
}

/// Gallery section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryToml {
    /// Cards per page
    pub page_size: Option<usize>,

    /// Sort mode ("sheet" or "alphabetical")
    pub sort: Option<SortMode>,

    /// Grace delay after 100% before hiding the preloader, in milliseconds
    pub preloader_grace_ms: Option<u64>,
}

/// Art section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtToml {
    /// Fallback image URL for blank or broken art
    pub fallback_image: Option<String>,

    /// Fallback destination for cards without a link
    pub fallback_link: Option<String>,

    /// Base path for static overlay art
    pub overlay_dir: Option<String>,

    /// Base path prefix for animated status overlays
    pub animated_base: Option<String>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardwallToml {
    /// Feed configuration section
    pub feed: FeedToml,

    /// Gallery configuration section
    pub gallery: GalleryToml,

    /// Art configuration section
    pub art: ArtToml,
}

// =============================================================================
// Main Configuration Structs
// =============================================================================

/// Feed endpoint configuration
#[derive(Clone, Debug)]
pub struct FeedConfig {
    /// Feed endpoint URL
    pub endpoint: String,

    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,

    /// Backoff before the single automatic retry, in milliseconds
    pub retry_backoff_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            request_timeout_ms: 30_000,
            retry_backoff_ms: 1_500,
        }
    }
}

impl FeedConfig {
    /// Request timeout as a [`Duration`]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Retry backoff as a [`Duration`]
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

/// Fallbacks and overlay art locations
#[derive(Clone, Debug)]
pub struct ArtConfig {
    /// Fallback image URL for blank or broken art
    pub fallback_image: String,

    /// Fallback destination for cards without a link
    pub fallback_link: String,

    /// Base path for static overlay art
    pub overlay_dir: String,

    /// Base path prefix for animated status overlays
    pub animated_base: String,
}

impl Default for ArtConfig {
    fn default() -> Self {
        Self {
            fallback_image: "images/placeholder.png".to_string(),
            fallback_link: "#".to_string(),
            overlay_dir: "images/overlays".to_string(),
            animated_base: "images/overlays/anim-".to_string(),
        }
    }
}

impl ArtConfig {
    /// Static overlay art URL for a badge
    pub fn static_overlay(&self, badge: Badge) -> String {
        format!("{}/{}.png", self.overlay_dir.trim_end_matches('/'), badge.key())
    }

    /// Animated overlay art URL built from the base path + status name
    pub fn animated_overlay(&self, name: &str) -> String {
        format!("{}{}.gif", self.animated_base, name)
    }
}

/// Centralized configuration for the gallery
///
/// Use [`load_config`] to load configuration with proper priority handling.
#[derive(Clone, Debug)]
pub struct GalleryConfig {
    /// Feed endpoint configuration
    pub feed: FeedConfig,

    /// Cards per page
    pub page_size: usize,

    /// Sort mode applied at render time
    pub sort: SortMode,

    /// Grace delay after 100% before hiding the preloader, in milliseconds
    pub preloader_grace_ms: u64,

    /// Fallbacks and overlay art locations
    pub art: ArtConfig,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            page_size: 10,
            sort: SortMode::Sheet,
            preloader_grace_ms: 400,
            art: ArtConfig::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl GalleryConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Preloader grace delay as a [`Duration`]
    pub fn preloader_grace(&self) -> Duration {
        Duration::from_millis(self.preloader_grace_ms)
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] when the endpoint is blank
    /// or the page size is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "feed.endpoint is required (set it in gallery.toml, CARDWALL_ENDPOINT, or --endpoint)"
                    .to_string(),
            ));
        }
        if self.page_size == 0 {
            return Err(ConfigError::ValidationError(
                "gallery.page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/cardwall/gallery.toml` or
/// `~/.config/cardwall/gallery.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("cardwall").join("gallery.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<GalleryConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Arguments
///
/// * `path` - Optional path to the configuration file. If `None`, only
///   defaults and environment variables are used.
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<GalleryConfig, ConfigError> {
    // Start with defaults
    let mut config = GalleryConfig::default();

    // Try to load from file
    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: CardwallToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    // Apply environment variables (overrides file values)
    apply_env_config(&mut config);

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut GalleryConfig, toml: &CardwallToml) {
    // Feed settings
    if let Some(ref endpoint) = toml.feed.endpoint {
        config.feed.endpoint = endpoint.clone();
    }
    if let Some(timeout) = toml.feed.request_timeout_ms {
        config.feed.request_timeout_ms = timeout;
    }
    if let Some(backoff) = toml.feed.retry_backoff_ms {
        config.feed.retry_backoff_ms = backoff;
    }

    // Gallery settings
    if let Some(page_size) = toml.gallery.page_size {
        config.page_size = page_size;
    }
    if let Some(sort) = toml.gallery.sort {
        config.sort = sort;
    }
    if let Some(grace) = toml.gallery.preloader_grace_ms {
        config.preloader_grace_ms = grace;
    }

    // Art settings
    if let Some(ref image) = toml.art.fallback_image {
        config.art.fallback_image = image.clone();
    }
    if let Some(ref link) = toml.art.fallback_link {
        config.art.fallback_link = link.clone();
    }
    if let Some(ref dir) = toml.art.overlay_dir {
        config.art.overlay_dir = dir.clone();
    }
    if let Some(ref base) = toml.art.animated_base {
        config.art.animated_base = base.clone();
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut GalleryConfig) {
    // Feed settings from environment
    if let Ok(endpoint) = std::env::var("CARDWALL_ENDPOINT") {
        config.feed.endpoint = endpoint;
        config.source = ConfigSource::Env;
    }
    if let Ok(timeout) = std::env::var("CARDWALL_TIMEOUT_MS") {
        if let Ok(ms) = timeout.parse::<u64>() {
            config.feed.request_timeout_ms = ms;
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(backoff) = std::env::var("CARDWALL_RETRY_BACKOFF_MS") {
        if let Ok(ms) = backoff.parse::<u64>() {
            config.feed.retry_backoff_ms = ms;
            config.source = ConfigSource::Env;
        }
    }

    // Gallery settings from environment
    if let Ok(size) = std::env::var("CARDWALL_PAGE_SIZE") {
        if let Ok(n) = size.parse::<usize>() {
            config.page_size = n;
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(sort) = std::env::var("CARDWALL_SORT") {
        if let Ok(mode) = sort.parse::<SortMode>() {
            config.sort = mode;
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(grace) = std::env::var("CARDWALL_PRELOADER_GRACE_MS") {
        if let Ok(ms) = grace.parse::<u64>() {
            config.preloader_grace_ms = ms;
            config.source = ConfigSource::Env;
        }
    }

    // Art settings from environment
    if let Ok(image) = std::env::var("CARDWALL_FALLBACK_IMAGE") {
        config.art.fallback_image = image;
        config.source = ConfigSource::Env;
    }
    if let Ok(link) = std::env::var("CARDWALL_FALLBACK_LINK") {
        config.art.fallback_link = link;
        config.source = ConfigSource::Env;
    }
    if let Ok(dir) = std::env::var("CARDWALL_OVERLAY_DIR") {
        config.art.overlay_dir = dir;
        config.source = ConfigSource::Env;
    }
    if let Ok(base) = std::env::var("CARDWALL_ANIMATED_BASE") {
        config.art.animated_base = base;
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Endpoint override
    pub endpoint: Option<String>,

    /// Page size override
    pub page_size: Option<usize>,

    /// Sort mode override
    pub sort: Option<SortMode>,

    /// Fallback image override
    pub fallback_image: Option<String>,

    /// Fallback link override
    pub fallback_link: Option<String>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set endpoint override
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Set page size override
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Set sort mode override
    #[must_use]
    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Set fallback image override
    #[must_use]
    pub fn with_fallback_image(mut self, url: String) -> Self {
        self.fallback_image = Some(url);
        self
    }

    /// Set fallback link override
    #[must_use]
    pub fn with_fallback_link(mut self, url: String) -> Self {
        self.fallback_link = Some(url);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut GalleryConfig) {
        if self.endpoint.is_some()
            || self.page_size.is_some()
            || self.sort.is_some()
            || self.fallback_image.is_some()
            || self.fallback_link.is_some()
        {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref endpoint) = self.endpoint {
            config.feed.endpoint = endpoint.clone();
        }

        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }

        if let Some(sort) = self.sort {
            config.sort = sort;
        }

        if let Some(ref image) = self.fallback_image {
            config.art.fallback_image = image.clone();
        }

        if let Some(ref link) = self.fallback_link {
            config.art.fallback_link = link.clone();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
