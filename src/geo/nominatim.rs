//! Nominatim reverse geocoding backend (OpenStreetMap)
//!
//! Uses the free Nominatim API. The usage policy requires an identifying
//! User-Agent and at most one request per second, which a single run stays
//! well under.

use crate::constants::USER_AGENT;
use crate::error::{Error, Result};
use crate::geo::{Address, Coordinates, ReverseGeocoder};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::blocking::Client,
    base_url: String,
}

/// Nominatim reverse response (format=jsonv2)
#[derive(Debug, Deserialize)]
struct NominatimReverse {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    address: HashMap<String, String>,
    /// Present instead of an address when nothing is found
    #[serde(default)]
    error: Option<String>,
}

/// Address keys tried in order for the city part of a label
const CITY_KEYS: [&str; 5] = ["municipality", "town", "city", "village", "hamlet"];
const REGION_KEYS: [&str; 3] = ["state", "region", "county"];

impl NominatimBackend {
    /// Create a new Nominatim backend
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn into_address(result: NominatimReverse) -> Option<Address> {
        if let Some(error) = result.error {
            debug!("Nominatim found nothing: {}", error);
            return None;
        }
        let display_name = result.display_name?;
        let pick = |keys: &[&str]| keys.iter().find_map(|k| result.address.get(*k).cloned());

        Some(Address {
            display_name,
            city: pick(&CITY_KEYS),
            region: pick(&REGION_KEYS),
            country: result.address.get("country").cloned(),
            country_code: result
                .address
                .get("country_code")
                .map(|c| c.to_lowercase()),
        })
    }
}

impl ReverseGeocoder for NominatimBackend {
    fn reverse_geocode(&self, point: Coordinates) -> Result<Option<Address>> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=jsonv2&addressdetails=1&accept-language=en",
            self.base_url, point.lat, point.lng
        );

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| Error::Geocoding(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            return Err(Error::Geocoding(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let result: NominatimReverse = response
            .json()
            .map_err(|e| Error::Geocoding(format!("Failed to parse Nominatim response: {}", e)))?;

        Ok(Self::into_address(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_address_prefers_municipality() {
        let raw = r#"{
            "display_name": "Tour Eiffel, Paris, France",
            "address": {
                "tourism": "Tour Eiffel",
                "city": "Paris",
                "municipality": "Paris 7e",
                "state": "Île-de-France",
                "country": "France",
                "country_code": "FR"
            }
        }"#;
        let parsed: NominatimReverse = serde_json::from_str(raw).unwrap();
        let address = NominatimBackend::into_address(parsed).unwrap();

        assert_eq!(address.city.as_deref(), Some("Paris 7e"));
        assert_eq!(address.region.as_deref(), Some("Île-de-France"));
        assert_eq!(address.country.as_deref(), Some("France"));
        assert_eq!(address.country_code.as_deref(), Some("fr"));
    }

    #[test]
    fn test_into_address_error_payload() {
        let parsed: NominatimReverse =
            serde_json::from_str(r#"{"error": "Unable to geocode"}"#).unwrap();
        assert!(NominatimBackend::into_address(parsed).is_none());
    }

    #[test]
    fn test_into_address_missing_parts() {
        let parsed: NominatimReverse = serde_json::from_str(
            r#"{"display_name": "Somewhere at sea", "address": {"country": "Nowhere"}}"#,
        )
        .unwrap();
        let address = NominatimBackend::into_address(parsed).unwrap();
        assert!(address.city.is_none());
        assert!(address.region.is_none());
        assert!(address.country_code.is_none());
    }

    #[test]
    fn test_backend_trims_base_url() {
        let backend =
            NominatimBackend::new("https://example.org/", Duration::from_secs(5)).unwrap();
        assert_eq!(backend.base_url, "https://example.org");
    }
}
