use actix_web::{web, HttpResponse};
use common::requests::SuggestionsQuery;

use crate::error::AppError;
use crate::session_controller::state::SessionsState;
use crate::workflow::Workflow;

/// Address suggestions for the search box of the session's open form.
pub(crate) async fn process(
    session_id: web::Path<String>,
    query: web::Query<SuggestionsQuery>,
    sessions: web::Data<SessionsState>,
    workflow: web::Data<Workflow>,
) -> Result<HttpResponse, AppError> {
    let entry = sessions.get(&session_id).await?;
    let entry = entry.lock().await;
    let suggestions = workflow.suggest(&entry, &query.q).await?;
    Ok(HttpResponse::Ok().json(suggestions))
}
