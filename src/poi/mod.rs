//! Points of interest
//!
//! Defines the `PoiSource` trait used by the candidate generator. The
//! OpenTripMap implementation lives in its own file.

pub mod opentripmap;

use crate::error::Result;
use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};

/// A named real-world place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub name: String,
    pub coords: Coordinates,
    /// Comma-separated categories as reported by the source
    #[serde(default)]
    pub kinds: String,
    /// Popularity rating, higher is more notable
    #[serde(default)]
    pub rate: u8,
}

impl Poi {
    pub fn new(name: impl Into<String>, coords: Coordinates) -> Self {
        Self {
            name: name.into(),
            coords,
            kinds: String::new(),
            rate: 0,
        }
    }

    /// True when the place carries a usable name
    pub fn is_named(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Trait for point-of-interest backends
pub trait PoiSource {
    /// Returns the source name (e.g., "opentripmap")
    fn name(&self) -> &'static str;

    /// Places within `radius_meters` of `center`
    ///
    /// An empty result is not an error; the caller decides whether to retry.
    fn places_within(&self, center: Coordinates, radius_meters: f64) -> Result<Vec<Poi>>;
}
