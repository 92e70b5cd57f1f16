use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use super::{AddressAutocomplete, RemoteError};

/// Google Places Autocomplete client restricted to street addresses.
pub struct GooglePlacesAutocomplete {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<Prediction>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct Prediction {
    description: String,
}

impl GooglePlacesAutocomplete {
    pub fn new(http: reqwest::Client, url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            api_key: api_key.into(),
        }
    }
}

fn descriptions(response: AutocompleteResponse) -> Result<Vec<String>, RemoteError> {
    match response.status.as_str() {
        "OK" => Ok(response
            .predictions
            .into_iter()
            .map(|p| p.description)
            .collect()),
        "ZERO_RESULTS" => Ok(Vec::new()),
        status => Err(RemoteError::Autocomplete(match response.error_message {
            Some(message) => format!("{status} ({message})"),
            None => status.to_string(),
        })),
    }
}

#[async_trait]
impl AddressAutocomplete for GooglePlacesAutocomplete {
    async fn suggest(&self, partial: &str) -> Result<Vec<String>, RemoteError> {
        let response: AutocompleteResponse = self
            .http
            .get(&self.url)
            .query(&[
                ("input", partial),
                ("types", "address"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let suggestions = descriptions(response)?;
        debug!("{} suggestions for \"{}\"", suggestions.len(), partial);
        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: serde_json::Value) -> AutocompleteResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn predictions_keep_provider_ranking() {
        let response = parse(json!({
            "status": "OK",
            "predictions": [
                {"description": "123 Main St, Springfield, IL, USA", "place_id": "a"},
                {"description": "123 Main St, Springfield, MO, USA", "place_id": "b"}
            ]
        }));
        assert_eq!(
            descriptions(response).unwrap(),
            vec![
                "123 Main St, Springfield, IL, USA".to_string(),
                "123 Main St, Springfield, MO, USA".to_string()
            ]
        );
    }

    #[test]
    fn zero_results_is_an_empty_list() {
        let response = parse(json!({"status": "ZERO_RESULTS", "predictions": []}));
        assert!(descriptions(response).unwrap().is_empty());
    }

    #[test]
    fn other_statuses_are_errors() {
        let response = parse(json!({
            "status": "OVER_QUERY_LIMIT",
            "error_message": "You have exceeded your daily request quota."
        }));
        let err = descriptions(response).unwrap_err();
        assert!(err.to_string().contains("OVER_QUERY_LIMIT"));
    }
}
