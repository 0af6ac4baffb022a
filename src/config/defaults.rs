//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default country filter
pub const DEFAULT_COUNTRY: &str = "random";

/// Default number of poll options
pub const DEFAULT_NB_PICKS: u8 = 3;

/// Default map preset
pub const DEFAULT_PRESET: &str = "default";

/// Default search radius in kilometers
pub const DEFAULT_RADIUS_KM: f64 = 50.0;

/// Default poll duration in hours
pub const DEFAULT_HOURS: u32 = 24;

/// Default number of center points tried before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 50;

/// Default image size in pixels
pub const DEFAULT_IMAGE_SIZE: u32 = 1024;

/// Default tile zoom level
pub const DEFAULT_ZOOM: u8 = 15;

/// Default OpenTripMap popularity filter (1-3, 3 = most notable)
pub const DEFAULT_OTM_RATE: u8 = 3;

/// Default maximum number of places per OpenTripMap query
pub const DEFAULT_OTM_LIMIT: u32 = 50;

/// Default HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "guessmap";
