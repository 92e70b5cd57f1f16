mod clients;
mod config;
mod error;
mod services;
mod session_controller;
mod workflow;

use crate::clients::autocomplete::GooglePlacesAutocomplete;
use crate::clients::feature_layer::FeatureLayer;
use crate::clients::geocoding::GoogleGeocoder;
use crate::config::Config;
use crate::session_controller::state::SessionsState;
use crate::workflow::{AccessCodes, Workflow};
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use common::model::schema::Schema;
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::{error, info};
use mime_guess::from_path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    let file_path = if path.is_empty() { "index.html" } else { path };

    match STATIC_DIR.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => match STATIC_DIR.get_file("index.html") {
            Some(index) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(index.contents().to_vec()),
            None => HttpResponse::NotFound().body("Not Found"),
        },
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|err| {
        error!("configuration error: {}", err);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
    })?;
    info!("loaded configuration: {:?}", config);

    let http = reqwest::Client::new();
    let schema = match &config.binary_fields {
        Some(fields) => Schema::with_binary_fields(fields),
        None => Schema::default(),
    };
    let workflow = web::Data::new(Workflow::new(
        schema,
        AccessCodes::new(config.admin_code.as_str(), config.guest_code.as_str()),
        Arc::new(FeatureLayer::new(
            http.clone(),
            config.dataset_url.as_str(),
            config.page_size,
        )),
        Arc::new(GoogleGeocoder::new(
            http.clone(),
            config.geocode_url.as_str(),
            config.maps_api_key.as_str(),
        )),
        Arc::new(GooglePlacesAutocomplete::new(
            http,
            config.autocomplete_url.as_str(),
            config.maps_api_key.as_str(),
        )),
    ));
    let sessions = web::Data::new(SessionsState::new(
        config.max_sessions,
        Duration::from_secs(config.session_idle_minutes * 60),
    ));

    let url = format!("http://{}:{}", config.host, config.port);
    if config.open_browser {
        let url = url.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            let _ = webbrowser::open(&url);
        });
    }

    info!("Server running at {}", url);

    HttpServer::new(move || {
        App::new()
            .app_data(workflow.clone())
            .app_data(sessions.clone())
            .service(services::schema::configure_routes())
            .service(services::session::configure_routes())
            .default_service(web::route().to(serve_embedded))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
