//! # Schema Service Module
//!
//! Serves the declared field schema under `/api/schema` so the UI lays out and
//! defaults its forms with the same descriptors the server validates against.

use actix_web::web::{get, scope};
use actix_web::{web, HttpResponse, Responder, Scope};

use crate::workflow::Workflow;

const API_PATH: &str = "/api/schema";

/// Configures and returns the Actix `Scope` for the schema route.
///
/// *   **`GET /api/schema`**: the ordered field descriptors as JSON.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(process))
}

async fn process(workflow: web::Data<Workflow>) -> impl Responder {
    HttpResponse::Ok().json(workflow.schema())
}
