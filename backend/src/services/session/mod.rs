//! # Session Service Module
//!
//! HTTP surface of the single interactive view. The UI opens a session, then
//! posts every button press or selection as an `Action` and renders the
//! `SessionView` it gets back.
//!
//! ## Sub-modules:
//! - `start`: opens a session on the login page.
//! - `close`: closes a session, dropping its context.
//! - `get`: re-renders the current page (the table re-reads the dataset).
//! - `action`: runs one named action through the workflow.
//! - `suggestions`: address suggestions for the open form's search box.

mod action;
mod close;
mod get;
mod start;
mod suggestions;

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

/// The base path for all session endpoints.
const API_PATH: &str = "/api/session";

/// Configures and returns the Actix `Scope` for the session routes.
///
/// # Registered Routes:
///
/// *   **`POST /api/session`**: new session id and the login view.
/// *   **`GET /{session_id}`**: current view of the session.
/// *   **`DELETE /{session_id}`**: closes the session; `404` if it is not open.
/// *   **`POST /{session_id}/action`**: applies the JSON `Action` body and returns
///     the new view; failures are reported as notices, not HTTP errors.
/// *   **`GET /{session_id}/suggestions?q=`**: address suggestions; `403` for
///     guests, `404` for unknown sessions.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(start::process))
        .route("/{session_id}", get().to(get::process))
        .route("/{session_id}", delete().to(close::process))
        .route("/{session_id}/action", post().to(action::process))
        .route("/{session_id}/suggestions", get().to(suggestions::process))
}
