use actix_web::{web, HttpResponse};
use common::requests::Action;
use log::debug;

use crate::error::AppError;
use crate::session_controller::state::SessionsState;
use crate::workflow::Workflow;

/// Applies one user action and returns the resulting view.
///
/// A rejected or failed action still answers `200 OK`: its errors travel as
/// notices in the view, next to the unchanged session state.
pub(crate) async fn process(
    session_id: web::Path<String>,
    sessions: web::Data<SessionsState>,
    workflow: web::Data<Workflow>,
    action: web::Json<Action>,
) -> Result<HttpResponse, AppError> {
    let entry = sessions.get(&session_id).await?;
    let mut entry = entry.lock().await;
    let action = action.into_inner();
    debug!("session {} requested {}", session_id, action_name(&action));
    let view = workflow.handle(&mut entry, action).await;
    Ok(HttpResponse::Ok().json(view))
}

// Action payloads carry access codes; only their names are logged.
fn action_name(action: &Action) -> &'static str {
    match action {
        Action::Login { .. } => "login",
        Action::Logout => "logout",
        Action::StartEdit { .. } => "start_edit",
        Action::StartCreate => "start_create",
        Action::Delete { .. } => "delete",
        Action::Back => "back",
        Action::SelectSuggestion { .. } => "select_suggestion",
        Action::Submit { .. } => "submit",
    }
}
