use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use common::fetch::Fetcher;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::{AppState, FormState};
use service::{
    editor::EditorService,
    form_files::FormFiles,
    storage::{disk::DiskStorage, record_store::RecordStore},
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// config.toml when present (and it must be valid), environment otherwise.
pub fn load_config() -> Result<AppConfig, StartupError> {
    AppConfig::load().map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

fn bind_addr(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Assemble the staged API router from configuration.
pub fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let fetcher = Fetcher::new(Duration::from_secs(cfg.fetch.timeout_secs))?;
    let editor = EditorService::new(RecordStore::new(), DiskStorage::new(&cfg.storage.dir), fetcher);
    let state = AppState { editor: Arc::new(editor) };
    Ok(routes::build_router(state, build_cors(), &cfg.storage.frontend_dir))
}

/// Assemble the form editor router from configuration.
pub fn build_form_app(cfg: &AppConfig) -> Router {
    let files = FormFiles::new(DiskStorage::new(&cfg.storage.form_dir));
    routes::build_form_router(FormState { files: Arc::new(files) })
}

/// Public entry: build the staged API and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    common::env::ensure_env(&cfg.storage.frontend_dir, &[cfg.storage.dir.as_path()]).await?;

    let app = build_app(&cfg)?;
    let addr = bind_addr(&cfg.server.host, cfg.server.port)?;
    info!(%addr, storage = %cfg.storage.dir.display(), "starting file editor api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Public entry: run the form-based editor that writes straight to disk
pub async fn run_form_editor(cfg: AppConfig) -> anyhow::Result<()> {
    common::env::ensure_env(&cfg.storage.frontend_dir, &[cfg.storage.form_dir.as_path()]).await?;

    let app = build_form_app(&cfg);
    let addr = bind_addr(&cfg.server.host, cfg.server.form_port)?;
    info!(%addr, files = %cfg.storage.form_dir.display(), "starting form editor");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
