//! Constants shared across modules
//!
//! Tunable defaults live in `config::defaults`; these are fixed.

/// User-Agent sent with every outbound request (Nominatim and tile servers require one)
pub const USER_AGENT: &str = concat!("guessmap/", env!("CARGO_PKG_VERSION"));

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in meters (WGS84 approximation)
    pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

    /// Latitude band used when no country constrains the random center
    pub const WORLD_MIN_LAT: f64 = -60.0;
    pub const WORLD_MAX_LAT: f64 = 70.0;
}

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// OpenTripMap radius search
    pub const OPENTRIPMAP_URL: &str = "https://api.opentripmap.com/0.1/en/places/radius";

    /// Label-free raster tiles (CARTO basemaps)
    pub const TILE_URL: &str = "https://{s}.basemaps.cartocdn.com/{layer}/{z}/{x}/{y}.png";

    /// Tile server subdomains substituted for `{s}`
    pub const TILE_SUBDOMAINS: [&str; 4] = ["a", "b", "c", "d"];
}

/// Poll constraints
pub mod poll {
    /// Longest poll option Mastodon accepts by default
    pub const MAX_OPTION_LENGTH: usize = 50;

    pub const MIN_PICKS: u8 = 2;
    pub const MAX_PICKS: u8 = 4;

    /// Poll duration bounds in hours
    pub const MIN_HOURS: u32 = 1;
    pub const MAX_HOURS: u32 = 168;
}

/// Environment variables holding credentials
pub mod env {
    pub const MASTODON_INSTANCE: &str = "MASTODON_INSTANCE";
    pub const MASTODON_ACCESS_TOKEN: &str = "MASTODON_ACCESS_TOKEN";
    pub const OPENTRIPMAP_API_KEY: &str = "OPENTRIPMAP_API_KEY";
}
