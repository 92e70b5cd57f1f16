use actix_web::{web, HttpResponse};
use log::info;

use crate::error::AppError;
use crate::session_controller::state::SessionsState;

/// Closes a session; the UI opens a fresh one when the user logs out.
pub(crate) async fn process(
    session_id: web::Path<String>,
    sessions: web::Data<SessionsState>,
) -> Result<HttpResponse, AppError> {
    if !sessions.remove(&session_id).await {
        return Err(AppError::SessionNotFound(session_id.into_inner()));
    }
    info!("closed session {}", session_id);
    Ok(HttpResponse::NoContent().finish())
}
