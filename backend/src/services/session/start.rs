use actix_web::{web, HttpResponse, Responder};
use common::requests::SessionStarted;
use log::info;

use crate::session_controller::state::SessionsState;
use crate::workflow::Workflow;

/// Opens a session on the login page and returns its id with the first view.
pub(crate) async fn process(
    sessions: web::Data<SessionsState>,
    workflow: web::Data<Workflow>,
) -> impl Responder {
    let (session_id, entry) = sessions.open().await;
    let mut entry = entry.lock().await;
    let view = workflow.render(&mut entry, Vec::new()).await;
    info!("opened session {} ({} open)", session_id, sessions.len().await);
    HttpResponse::Ok().json(SessionStarted { session_id, view })
}
