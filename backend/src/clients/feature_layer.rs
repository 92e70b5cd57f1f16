//! ArcGIS FeatureServer layer client.
//!
//! Talks to the layer's REST endpoints (`query`, `addFeatures`, `updateFeatures`,
//! `deleteFeatures`) with `f=json`. The service answers errors with HTTP 200 and a
//! top-level `{"error": {"code", "message", "details"}}` body, so every response
//! goes through `decode` before it is trusted.

use async_trait::async_trait;
use common::model::record::{Attributes, Feature};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::{EditResult, FeatureQuery, FeatureService, RemoteError};

/// Upper bound on the pages one read may request.
const MAX_QUERY_PAGES: usize = 10_000;

pub struct FeatureLayer {
    http: reqwest::Client,
    url: String,
    page_size: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryPage {
    #[serde(default)]
    features: Vec<Feature>,
    #[serde(default)]
    exceeded_transfer_limit: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddResponse {
    #[serde(default)]
    add_results: Vec<EditResult>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateResponse {
    #[serde(default)]
    update_results: Vec<EditResult>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteResponse {
    #[serde(default)]
    delete_results: Vec<EditResult>,
}

#[derive(Deserialize)]
struct ServiceErrorBody {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Vec<String>,
}

/// Turns an ArcGIS JSON body into `T`, surfacing an embedded `error` object.
fn decode<T: DeserializeOwned>(body: Value) -> Result<T, RemoteError> {
    if let Some(error) = body.get("error") {
        let error: ServiceErrorBody = serde_json::from_value(error.clone())?;
        let message = if error.details.is_empty() {
            error.message
        } else {
            format!("{} ({})", error.message, error.details.join("; "))
        };
        return Err(RemoteError::Service {
            code: error.code,
            message,
        });
    }
    Ok(serde_json::from_value(body)?)
}

impl FeatureLayer {
    pub fn new(http: reqwest::Client, url: impl Into<String>, page_size: usize) -> Self {
        let url = url.into().trim_end_matches('/').to_string();
        Self {
            http,
            url,
            page_size: page_size.max(1),
        }
    }

    async fn get_json(&self, operation: &str, params: &[(&str, String)]) -> Result<Value, RemoteError> {
        let response = self
            .http
            .get(format!("{}/{}", self.url, operation))
            .query(params)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn post_form(&self, operation: &str, params: &[(&str, String)]) -> Result<Value, RemoteError> {
        let response = self
            .http
            .post(format!("{}/{}", self.url, operation))
            .form(params)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl FeatureService for FeatureLayer {
    async fn query(&self, query: &FeatureQuery) -> Result<Vec<Attributes>, RemoteError> {
        let mut rows = Vec::new();
        let mut offset = 0usize;
        let mut pages = 0usize;
        let mut previous_ids: Vec<Option<i64>> = Vec::new();

        loop {
            let mut params = vec![
                ("where", query.where_clause.clone()),
                ("outFields", query.out_fields.clone()),
                ("returnGeometry", query.return_geometry.to_string()),
                ("f", "json".to_string()),
            ];
            if query.return_all_records {
                params.push(("resultOffset", offset.to_string()));
                params.push(("resultRecordCount", self.page_size.to_string()));
            }

            let page: QueryPage = decode(self.get_json("query", &params).await?)?;
            let received = page.features.len();
            pages += 1;
            debug!("query page at offset {} returned {} rows", offset, received);

            // a layer that ignores resultOffset answers every page alike
            let ids: Vec<Option<i64>> = page.features.iter().map(Feature::object_id).collect();
            if pages > 1 && ids.iter().any(Option::is_some) && ids == previous_ids {
                return Err(RemoteError::Decode(format!(
                    "the page at offset {offset} repeats the previous page"
                )));
            }
            rows.extend(page.features.into_iter().map(|f| f.attributes));

            if !query.return_all_records || !page.exceeded_transfer_limit || received == 0 {
                break;
            }
            if pages >= MAX_QUERY_PAGES {
                return Err(RemoteError::Decode(format!(
                    "the layer still reports more rows after {MAX_QUERY_PAGES} pages"
                )));
            }
            previous_ids = ids;
            offset += received;
        }

        info!("fetched {} rows from the feature layer", rows.len());
        Ok(rows)
    }

    async fn add_features(&self, features: &[Feature]) -> Result<Vec<EditResult>, RemoteError> {
        let params = [
            ("features", serde_json::to_string(features)?),
            ("f", "json".to_string()),
        ];
        let response: AddResponse = decode(self.post_form("addFeatures", &params).await?)?;
        Ok(response.add_results)
    }

    async fn update_features(
        &self,
        features: &[Feature],
    ) -> Result<Vec<EditResult>, RemoteError> {
        let params = [
            ("features", serde_json::to_string(features)?),
            ("f", "json".to_string()),
        ];
        let response: UpdateResponse = decode(self.post_form("updateFeatures", &params).await?)?;
        Ok(response.update_results)
    }

    async fn delete_features(&self, object_ids: &[i64]) -> Result<Vec<EditResult>, RemoteError> {
        let ids = object_ids
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let params = [("objectIds", ids), ("f", "json".to_string())];
        let response: DeleteResponse = decode(self.post_form("deleteFeatures", &params).await?)?;
        Ok(response.delete_results)
    }
}
