//! OpenTripMap POI backend
//!
//! Uses the `places/radius` endpoint, which returns a GeoJSON feature
//! collection. API documentation: https://opentripmap.io/docs
//!
//! `rate` filters by popularity (3 = most notable places only) and
//! `src_attr=osm` restricts results to OpenStreetMap-sourced names.

use crate::constants::USER_AGENT;
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use crate::poi::{Poi, PoiSource};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// OpenTripMap backend
#[derive(Debug, Clone)]
pub struct OpenTripMapBackend {
    client: reqwest::blocking::Client,
    url: String,
    api_key: String,
    rate: u8,
    limit: u32,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
    #[serde(default)]
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    /// GeoJSON order: [lon, lat]; nested arrays for non-point shapes
    coordinates: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(default)]
    name: String,
    #[serde(default)]
    kinds: String,
    #[serde(default)]
    rate: u8,
}

/// Error payload returned with 4xx responses
#[derive(Debug, Deserialize)]
struct ApiError {
    error: String,
}

impl OpenTripMapBackend {
    /// Create a new OpenTripMap backend
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        rate: u8,
        limit: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
            rate,
            limit,
        })
    }

    fn request_url(&self, center: Coordinates, radius_meters: f64) -> String {
        format!(
            "{}?lon={}&lat={}&radius={}&rate={}&src_attr=osm&limit={}&format=geojson&apikey={}",
            self.url,
            center.lng,
            center.lat,
            radius_meters.round() as u64,
            self.rate,
            self.limit,
            urlencoding::encode(&self.api_key)
        )
    }

    /// Convert GeoJSON features into POIs, skipping non-point geometries
    fn into_pois(collection: FeatureCollection) -> Vec<Poi> {
        collection
            .features
            .into_iter()
            .filter_map(|feature| {
                if feature.geometry.kind != "Point" {
                    return None;
                }
                let (lng, lat) = match feature.geometry.coordinates.as_array()?.as_slice() {
                    [lng, lat, ..] => (lng.as_f64()?, lat.as_f64()?),
                    _ => return None,
                };
                Some(Poi {
                    name: feature.properties.name.trim().to_string(),
                    coords: Coordinates::new(lat, lng),
                    kinds: feature.properties.kinds,
                    rate: feature.properties.rate,
                })
            })
            .collect()
    }
}

impl PoiSource for OpenTripMapBackend {
    fn name(&self) -> &'static str {
        "opentripmap"
    }

    fn places_within(&self, center: Coordinates, radius_meters: f64) -> Result<Vec<Poi>> {
        let response = self
            .client
            .get(self.request_url(center, radius_meters))
            .send()
            .map_err(|e| Error::PoiSource(format!("OpenTripMap request failed: {}", e)))?;

        let status = response.status();
        let body = response.text()?;
        debug!("OpenTripMap answered {} ({} bytes)", status, body.len());

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| status.to_string());
            return Err(Error::PoiSource(format!("OpenTripMap returned {}", detail)));
        }

        let collection: FeatureCollection = serde_json::from_str(&body)?;
        Ok(Self::into_pois(collection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> OpenTripMapBackend {
        OpenTripMapBackend::new(
            "https://api.example.org/places/radius",
            "k&y",
            3,
            50,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_request_url() {
        let url = backend().request_url(Coordinates::new(45.5, 6.25), 50_000.0);
        assert!(url.starts_with("https://api.example.org/places/radius?"));
        assert!(url.contains("lon=6.25&lat=45.5"));
        assert!(url.contains("radius=50000"));
        assert!(url.contains("rate=3"));
        assert!(url.contains("limit=50"));
        assert!(url.ends_with("apikey=k%26y"));
    }

    #[test]
    fn test_into_pois() {
        let raw = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "id": "1",
                    "geometry": {"type": "Point", "coordinates": [2.2945, 48.8584]},
                    "properties": {"xid": "W1", "name": " Eiffel Tower ", "rate": 7, "kinds": "towers,architecture"}
                },
                {
                    "type": "Feature",
                    "id": "2",
                    "geometry": {"type": "Point", "coordinates": [2.3376, 48.8606]},
                    "properties": {"xid": "W2", "name": "", "rate": 3}
                },
                {
                    "type": "Feature",
                    "id": "3",
                    "geometry": {"type": "LineString", "coordinates": [[2.0, 48.0], [2.1, 48.1]]},
                    "properties": {"name": "A path"}
                }
            ]
        }"#;
        let collection: FeatureCollection = serde_json::from_str(raw).unwrap();
        let pois = OpenTripMapBackend::into_pois(collection);

        assert_eq!(pois.len(), 2);
        assert_eq!(pois[0].name, "Eiffel Tower");
        assert_eq!(pois[0].coords, Coordinates::new(48.8584, 2.2945));
        assert_eq!(pois[0].rate, 7);
        assert!(pois[0].is_named());
        assert!(!pois[1].is_named());
    }

    #[test]
    fn test_empty_collection() {
        let collection: FeatureCollection =
            serde_json::from_str(r#"{"type": "FeatureCollection", "features": []}"#).unwrap();
        assert!(OpenTripMapBackend::into_pois(collection).is_empty());
    }
}
