//! Configuration management
//!
//! Loads configuration from an XDG-compliant path.
//! Config location: ~/.config/guessmap/config.toml
//!
//! The file is optional; every field has a default. Credentials are read
//! from the environment (see `credentials`).

pub mod credentials;
pub mod defaults;

use crate::constants::api::{NOMINATIM_URL, OPENTRIPMAP_URL, TILE_URL};
use crate::constants::poll::{MAX_HOURS, MAX_PICKS, MIN_HOURS, MIN_PICKS};
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub use credentials::{Credentials, MastodonCredentials};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default values for a run, overridden by CLI flags
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Map rendering settings
    #[serde(default)]
    pub render: RenderConfig,

    /// OpenTripMap settings
    #[serde(default)]
    pub opentripmap: OpenTripMapConfig,

    /// Nominatim settings
    #[serde(default)]
    pub nominatim: NominatimConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

/// Default values for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Country name, ISO code, "random" or "world"
    #[serde(default = "default_country")]
    pub country: String,

    /// Number of poll options
    #[serde(default = "default_nb_picks")]
    pub nb_picks: u8,

    /// Preset name or "random"
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Search radius in kilometers
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,

    /// Poll duration in hours
    #[serde(default = "default_hours")]
    pub hours: u32,

    /// Center points tried before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

/// Map rendering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_image_size")]
    pub width: u32,

    #[serde(default = "default_image_size")]
    pub height: u32,

    /// Tile zoom level
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Tile URL template with `{s}`, `{layer}`, `{z}`, `{x}`, `{y}`
    #[serde(default = "default_tile_url")]
    pub tile_url: String,
}

/// OpenTripMap settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenTripMapConfig {
    #[serde(default = "default_otm_url")]
    pub url: String,

    /// Popularity filter (1-3)
    #[serde(default = "default_otm_rate")]
    pub rate: u8,

    /// Maximum places per query
    #[serde(default = "default_otm_limit")]
    pub limit: u32,
}

/// Nominatim settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NominatimConfig {
    #[serde(default = "default_nominatim_url")]
    pub url: String,
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

// Default value functions for serde
fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}
fn default_nb_picks() -> u8 {
    DEFAULT_NB_PICKS
}
fn default_preset() -> String {
    DEFAULT_PRESET.to_string()
}
fn default_radius_km() -> f64 {
    DEFAULT_RADIUS_KM
}
fn default_hours() -> u32 {
    DEFAULT_HOURS
}
fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}
fn default_image_size() -> u32 {
    DEFAULT_IMAGE_SIZE
}
fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}
fn default_tile_url() -> String {
    TILE_URL.to_string()
}
fn default_otm_url() -> String {
    OPENTRIPMAP_URL.to_string()
}
fn default_otm_rate() -> u8 {
    DEFAULT_OTM_RATE
}
fn default_otm_limit() -> u32 {
    DEFAULT_OTM_LIMIT
}
fn default_nominatim_url() -> String {
    NOMINATIM_URL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            country: default_country(),
            nb_picks: default_nb_picks(),
            preset: default_preset(),
            radius_km: default_radius_km(),
            hours: default_hours(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_image_size(),
            height: default_image_size(),
            zoom: default_zoom(),
            tile_url: default_tile_url(),
        }
    }
}

impl Default for OpenTripMapConfig {
    fn default() -> Self {
        Self {
            url: default_otm_url(),
            rate: default_otm_rate(),
            limit: default_otm_limit(),
        }
    }
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            url: default_nominatim_url(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the default path is read
    /// when present and defaults are used otherwise; nothing is written.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let path = Self::config_path()?;
                if path.exists() {
                    Self::load_from(&path)?
                } else {
                    debug!("No config file at {}, using defaults", path.display());
                    Config::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        debug!("Loaded config from {}", path.display());

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        let d = &self.defaults;
        if !(MIN_PICKS..=MAX_PICKS).contains(&d.nb_picks) {
            return Err(Error::Config(format!(
                "defaults.nb_picks must be between {} and {}, got {}",
                MIN_PICKS, MAX_PICKS, d.nb_picks
            )));
        }
        if !(MIN_HOURS..=MAX_HOURS).contains(&d.hours) {
            return Err(Error::Config(format!(
                "defaults.hours must be between {} and {}, got {}",
                MIN_HOURS, MAX_HOURS, d.hours
            )));
        }
        if !(d.radius_km.is_finite() && d.radius_km > 0.0) {
            return Err(Error::Config(format!(
                "defaults.radius_km must be positive, got {}",
                d.radius_km
            )));
        }
        if d.max_attempts == 0 {
            return Err(Error::Config("defaults.max_attempts must be at least 1".to_string()));
        }
        if self.render.width == 0 || self.render.height == 0 {
            return Err(Error::Config("render.width and render.height must be positive".to_string()));
        }
        if self.render.zoom > 19 {
            return Err(Error::Config(format!(
                "render.zoom must be at most 19, got {}",
                self.render.zoom
            )));
        }
        if !(1..=3).contains(&self.opentripmap.rate) {
            return Err(Error::Config(format!(
                "opentripmap.rate must be between 1 and 3, got {}",
                self.opentripmap.rate
            )));
        }
        Ok(())
    }

    /// HTTP request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.defaults.country, "random");
        assert_eq!(config.defaults.nb_picks, 3);
        assert_eq!(config.defaults.radius_km, 50.0);
        assert_eq!(config.defaults.hours, 24);
        assert_eq!(config.opentripmap.rate, 3);
        assert_eq!(config.defaults.max_attempts, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[defaults]\ncountry = \"Japan\"\nhours = 12\n\n[render]\nzoom = 14").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.defaults.country, "Japan");
        assert_eq!(config.defaults.hours, 12);
        assert_eq!(config.defaults.nb_picks, 3);
        assert_eq!(config.render.zoom, 14);
        assert_eq!(config.render.width, 1024);
        assert_eq!(config.nominatim.url, NOMINATIM_URL);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let result = Config::load(Some(Path::new("/nonexistent/guessmap.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[defaults\nnb_picks = ").unwrap();
        assert!(Config::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_validate_ranges() {
        let mut config = Config::default();
        config.defaults.nb_picks = 5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.defaults.hours = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.defaults.radius_km = -1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.opentripmap.rate = 7;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[defaults]"));
        assert!(toml_str.contains("[render]"));
        let loaded: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(loaded, config);
    }
}
