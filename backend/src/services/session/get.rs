use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::session_controller::state::SessionsState;
use crate::workflow::Workflow;

/// Renders the current page of a session again.
pub(crate) async fn process(
    session_id: web::Path<String>,
    sessions: web::Data<SessionsState>,
    workflow: web::Data<Workflow>,
) -> Result<HttpResponse, AppError> {
    let entry = sessions.get(&session_id).await?;
    let mut entry = entry.lock().await;
    let view = workflow.render(&mut entry, Vec::new()).await;
    Ok(HttpResponse::Ok().json(view))
}
