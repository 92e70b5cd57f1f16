//! Outbound clients for the three hosted services the app depends on.
//!
//! Each service sits behind an object-safe async trait so the workflow can be
//! driven by the real HTTP clients in `main.rs` and by in-memory fakes in tests.
//!
//! - `feature_layer`: ArcGIS FeatureServer layer holding the service centers.
//! - `geocoding`: Google Geocoding API, address to latitude/longitude.
//! - `autocomplete`: Google Places Autocomplete, partial text to full addresses.

pub mod autocomplete;
pub mod feature_layer;
pub mod geocoding;

use async_trait::async_trait;
use common::model::record::{Attributes, Feature};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service error {code}: {message}")]
    Service { code: i64, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("geocoding failed: {0}")]
    Geocode(String),
    #[error("address suggestions failed: {0}")]
    Autocomplete(String),
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::Decode(err.to_string())
    }
}

/// Query parameters of a feature layer read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureQuery {
    pub where_clause: String,
    pub out_fields: String,
    pub return_geometry: bool,
    /// Keep paging until the service reports no more rows.
    pub return_all_records: bool,
}

impl FeatureQuery {
    /// Every row, every attribute, no geometry.
    pub fn match_all() -> Self {
        Self {
            where_clause: "1=1".to_string(),
            out_fields: "*".to_string(),
            return_geometry: false,
            return_all_records: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EditFailure {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub description: String,
}

/// Per-feature outcome of an add, update or delete.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResult {
    #[serde(default)]
    pub object_id: Option<i64>,
    #[serde(default)]
    pub global_id: Option<String>,
    pub success: bool,
    #[serde(default)]
    pub error: Option<EditFailure>,
}

impl EditResult {
    /// Human-readable reason of a rejected edit.
    pub fn failure_detail(&self) -> String {
        match &self.error {
            Some(failure) if !failure.description.is_empty() => {
                format!("{} (code {})", failure.description, failure.code)
            }
            Some(failure) => format!("code {}", failure.code),
            None => "the service reported success=false".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[async_trait]
pub trait FeatureService: Send + Sync {
    async fn query(&self, query: &FeatureQuery) -> Result<Vec<Attributes>, RemoteError>;

    async fn add_features(&self, features: &[Feature]) -> Result<Vec<EditResult>, RemoteError>;

    async fn update_features(&self, features: &[Feature])
        -> Result<Vec<EditResult>, RemoteError>;

    async fn delete_features(&self, object_ids: &[i64]) -> Result<Vec<EditResult>, RemoteError>;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Coordinates, RemoteError>;
}

#[async_trait]
pub trait AddressAutocomplete: Send + Sync {
    async fn suggest(&self, partial: &str) -> Result<Vec<String>, RemoteError>;
}
