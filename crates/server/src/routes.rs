use std::path::Path;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::{AppState, FormState};

pub mod files;
pub mod form;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        // one INFO span per request with method and path
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        // status code and latency
        .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
        .on_failure(DefaultOnFailure::new().level(Level::ERROR))
}

/// Router for the staged JSON API plus the static index page.
pub fn build_router(state: AppState, cors: CorsLayer, frontend_dir: &Path) -> Router {
    let index = ServeFile::new(frontend_dir.join("index.html"));

    let public = Router::new()
        .route_service("/", index)
        .nest_service("/static", ServeDir::new(frontend_dir))
        .route("/health", get(health));

    let api = Router::new()
        .route("/files", get(files::list_files))
        .route("/files/upload", post(files::upload_file))
        .route("/files/fetch", post(files::fetch_file))
        .route("/files/create", post(files::create_file))
        .route("/files/:filename", get(files::read_file).put(files::update_file))
        .route("/files/:filename/save", post(files::save_file));

    public
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(trace_layer())
}

/// Router for the form-based editor that writes straight to disk.
pub fn build_form_router(state: FormState) -> Router {
    Router::new()
        .route("/", get(form::index).post(form::submit))
        .route("/health", get(health))
        .with_state(state)
        .layer(trace_layer())
}
