//! Calls to the backend session API. Failures are returned as display text.

use common::model::schema::Schema;
use common::requests::{Action, SessionStarted, SessionView, Suggestions};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

const SESSION_API: &str = "/api/session";

pub async fn load_schema() -> Result<Schema, String> {
    read(Request::get("/api/schema").send().await).await
}

pub async fn open_session() -> Result<SessionStarted, String> {
    read(Request::post(SESSION_API).send().await).await
}

pub async fn fetch_view(session_id: &str) -> Result<SessionView, String> {
    read(
        Request::get(&format!("{SESSION_API}/{session_id}"))
            .send()
            .await,
    )
    .await
}

/// Closes a session on the server; an already dropped session is not an error.
pub async fn close_session(session_id: &str) -> Result<(), String> {
    let response = Request::delete(&format!("{SESSION_API}/{session_id}"))
        .send()
        .await
        .map_err(|err| err.to_string())?;
    match response.status() {
        204 | 404 => Ok(()),
        status => Err(format!("server answered {} {}", status, response.status_text())),
    }
}

/// Posts one `Action` and returns the view the server rendered for it.
///
/// # Returns
/// The new `SessionView`; rejected actions still arrive as a view carrying
/// error notices, so `Err` means the request itself failed.
pub async fn post_action(session_id: &str, action: &Action) -> Result<SessionView, String> {
    let request = Request::post(&format!("{SESSION_API}/{session_id}/action"))
        .json(action)
        .map_err(|err| err.to_string())?;
    read(request.send().await).await
}

pub async fn fetch_suggestions(session_id: &str, text: &str) -> Result<Suggestions, String> {
    read(
        Request::get(&format!("{SESSION_API}/{session_id}/suggestions"))
            .query([("q", text)])
            .send()
            .await,
    )
    .await
}

async fn read<T: DeserializeOwned>(
    response: Result<Response, gloo_net::Error>,
) -> Result<T, String> {
    let response = response.map_err(|err| err.to_string())?;
    if !response.ok() {
        let body = response.text().await.unwrap_or_default();
        return Err(format!(
            "server answered {} {}: {}",
            response.status(),
            response.status_text(),
            body
        ));
    }
    response.json::<T>().await.map_err(|err| err.to_string())
}
