//! Geocoding capability used by distance-based source selection.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shipping address as needed for geocoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub country: String,
    pub postcode: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub city: String,
}

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeoError {
    #[error("no coordinates found for address ({country} {postcode})")]
    NotFound { country: String, postcode: String },

    #[error("geocoding provider failed: {0}")]
    Provider(String),
}

/// Resolve an address into candidate coordinates.
pub trait GetLatsLngsFromAddress: Send + Sync {
    fn execute(&self, address: &Address) -> Result<Vec<LatLng>, GeoError>;
}

/// Geocoder backed by a local postcode table.
///
/// Keys are `(country, postcode)`, both upper-cased with whitespace removed.
#[derive(Debug, Default)]
pub struct OfflineGeocoder {
    table: HashMap<(String, String), Vec<LatLng>>,
}

impl OfflineGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, country: &str, postcode: &str, location: LatLng) {
        self.table
            .entry(key(country, postcode))
            .or_default()
            .push(location);
    }
}

impl GetLatsLngsFromAddress for OfflineGeocoder {
    fn execute(&self, address: &Address) -> Result<Vec<LatLng>, GeoError> {
        match self.table.get(&key(&address.country, &address.postcode)) {
            Some(found) if !found.is_empty() => Ok(found.clone()),
            _ => Err(GeoError::NotFound {
                country: address.country.clone(),
                postcode: address.postcode.clone(),
            }),
        }
    }
}

fn key(country: &str, postcode: &str) -> (String, String) {
    let normalize = |s: &str| {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_uppercase)
            .collect::<String>()
    };
    (normalize(country), normalize(postcode))
}
