use async_trait::async_trait;
use log::info;
use serde::Deserialize;

use super::{Coordinates, Geocoder, RemoteError};

/// Google Geocoding API client.
pub struct GoogleGeocoder {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

impl GoogleGeocoder {
    pub fn new(http: reqwest::Client, url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            api_key: api_key.into(),
        }
    }
}

/// First result of an `OK` response; any other status, or no results, is an error.
fn first_location(response: GeocodeResponse, address: &str) -> Result<Coordinates, RemoteError> {
    if response.status != "OK" {
        let detail = match response.error_message {
            Some(message) => format!("{} ({})", response.status, message),
            None => response.status,
        };
        return Err(RemoteError::Geocode(format!("{detail} for \"{address}\"")));
    }
    let result = response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| RemoteError::Geocode(format!("no results for \"{address}\"")))?;
    Ok(Coordinates {
        latitude: result.geometry.location.lat,
        longitude: result.geometry.location.lng,
    })
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinates, RemoteError> {
        let response: GeocodeResponse = self
            .http
            .get(&self.url)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let coordinates = first_location(response, address)?;
        info!(
            "geocoded \"{}\" to {}, {}",
            address, coordinates.latitude, coordinates.longitude
        );
        Ok(coordinates)
    }
}
