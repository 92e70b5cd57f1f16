//! In-memory stand-ins for the hosted services, recording every outbound call.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use common::model::record::{object_id, Attributes, Feature, OBJECT_ID};
use common::model::schema::Schema;
use serde_json::json;

use super::{AccessCodes, Workflow};
use crate::clients::{
    AddressAutocomplete, Coordinates, EditFailure, EditResult, FeatureQuery, FeatureService,
    Geocoder, RemoteError,
};

pub const ADMIN_CODE: &str = "asiaan";
pub const GUEST_CODE: &str = "visitor";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Query,
    Add(Attributes),
    Update(Attributes),
    Delete(Vec<i64>),
    Geocode(String),
    Suggest(String),
}

impl Call {
    pub fn is_write(&self) -> bool {
        matches!(self, Call::Add(_) | Call::Update(_) | Call::Delete(_))
    }
}

#[derive(Default)]
pub struct FakeServices {
    pub rows: Mutex<Vec<Attributes>>,
    pub calls: Mutex<Vec<Call>>,
    /// Writes answer `success: false`.
    pub reject_writes: bool,
    /// Writes fail before reaching the service.
    pub fail_transport: bool,
    pub known_addresses: Vec<(String, Coordinates)>,
    pub suggestions: Vec<String>,
}

impl FakeServices {
    pub fn with_rows(rows: Vec<Attributes>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| predicate(c)).count()
    }

    pub fn rows(&self) -> Vec<Attributes> {
        self.rows.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn write_outcome(&self, object_id: Option<i64>) -> Result<Option<EditResult>, RemoteError> {
        if self.fail_transport {
            return Err(RemoteError::Decode("connection reset".to_string()));
        }
        if self.reject_writes {
            return Ok(Some(EditResult {
                object_id,
                global_id: None,
                success: false,
                error: Some(EditFailure {
                    code: 1000,
                    description: "permission denied".to_string(),
                }),
            }));
        }
        Ok(None)
    }
}

fn succeeded(object_id: Option<i64>) -> EditResult {
    EditResult {
        object_id,
        global_id: None,
        success: true,
        error: None,
    }
}

#[async_trait]
impl FeatureService for FakeServices {
    async fn query(&self, _query: &FeatureQuery) -> Result<Vec<Attributes>, RemoteError> {
        self.record(Call::Query);
        Ok(self.rows())
    }

    async fn add_features(&self, features: &[Feature]) -> Result<Vec<EditResult>, RemoteError> {
        let mut results = Vec::new();
        for feature in features {
            self.record(Call::Add(feature.attributes.clone()));
            if let Some(rejected) = self.write_outcome(None)? {
                results.push(rejected);
                continue;
            }
            let mut rows = self.rows.lock().unwrap();
            let id = rows.iter().filter_map(object_id).max().unwrap_or(0) + 1;
            let mut attributes = feature.attributes.clone();
            attributes.insert(OBJECT_ID.to_string(), json!(id));
            rows.push(attributes);
            results.push(succeeded(Some(id)));
        }
        Ok(results)
    }

    async fn update_features(
        &self,
        features: &[Feature],
    ) -> Result<Vec<EditResult>, RemoteError> {
        let mut results = Vec::new();
        for feature in features {
            self.record(Call::Update(feature.attributes.clone()));
            let id = feature.object_id();
            if let Some(rejected) = self.write_outcome(id)? {
                results.push(rejected);
                continue;
            }
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|row| object_id(row) == id && id.is_some()) {
                Some(row) => {
                    for (key, value) in &feature.attributes {
                        row.insert(key.clone(), value.clone());
                    }
                    results.push(succeeded(id));
                }
                None => results.push(EditResult {
                    object_id: id,
                    global_id: None,
                    success: false,
                    error: Some(EditFailure {
                        code: 1019,
                        description: "feature not found".to_string(),
                    }),
                }),
            }
        }
        Ok(results)
    }

    async fn delete_features(&self, object_ids: &[i64]) -> Result<Vec<EditResult>, RemoteError> {
        self.record(Call::Delete(object_ids.to_vec()));
        let mut results = Vec::new();
        for &id in object_ids {
            if let Some(rejected) = self.write_outcome(Some(id))? {
                results.push(rejected);
                continue;
            }
            self.rows
                .lock()
                .unwrap()
                .retain(|row| object_id(row) != Some(id));
            results.push(succeeded(Some(id)));
        }
        Ok(results)
    }
}

#[async_trait]
impl Geocoder for FakeServices {
    async fn geocode(&self, address: &str) -> Result<Coordinates, RemoteError> {
        self.record(Call::Geocode(address.to_string()));
        self.known_addresses
            .iter()
            .find(|(known, _)| known == address)
            .map(|(_, coordinates)| *coordinates)
            .ok_or_else(|| RemoteError::Geocode(format!("ZERO_RESULTS for \"{address}\"")))
    }
}

#[async_trait]
impl AddressAutocomplete for FakeServices {
    async fn suggest(&self, partial: &str) -> Result<Vec<String>, RemoteError> {
        self.record(Call::Suggest(partial.to_string()));
        Ok(self
            .suggestions
            .iter()
            .filter(|s| s.starts_with(partial))
            .cloned()
            .collect())
    }
}

pub fn workflow(fake: &Arc<FakeServices>) -> Workflow {
    Workflow::new(
        Schema::default(),
        AccessCodes::new(ADMIN_CODE, GUEST_CODE),
        fake.clone(),
        fake.clone(),
        fake.clone(),
    )
}

/// A complete service-center row as the layer returns it.
pub fn center(id: i64, name: &str) -> Attributes {
    let mut record = Attributes::new();
    record.insert(OBJECT_ID.into(), json!(id));
    record.insert("GlobalID".into(), json!(format!("{{9A1C-{id:04}}}")));
    record.insert("Name".into(), json!(name));
    record.insert("Phone_number".into(), json!("555-000-0000"));
    record.insert("Address".into(), json!(format!("{id} Oak St, Springfield")));
    record.insert("Address_w_suit__".into(), json!(""));
    record.insert("Latitude".into(), json!(39.78));
    record.insert("Longitude".into(), json!(-89.65));
    for flag in Schema::default().binary_fields() {
        record.insert(flag.name.clone(), json!(0));
    }
    record.insert("Showers".into(), json!(1));
    record
}
