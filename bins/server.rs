use std::process::ExitCode;

use configs::AppConfig;
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

/// Identity attached to every lifecycle event of this process.
#[derive(Clone, Copy)]
struct Instance {
    id: Uuid,
    pid: u32,
}

fn install_panic_hook(instance: Instance) {
    std::panic::set_hook(Box::new(move |info| {
        error!(service = "server", event = "panic", service_id = %instance.id, pid = instance.pid, message = %info, "unhandled panic");
    }));
}

fn build_runtime(cfg: &AppConfig) -> std::io::Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(threads) = cfg.server.worker_threads {
        builder.worker_threads(threads);
    }
    builder.build()
}

/// Serve until the API fails or Ctrl+C arrives. Unsaved staged edits are
/// dropped on shutdown.
async fn serve(cfg: AppConfig, instance: Instance) -> ExitCode {
    tokio::select! {
        res = server::run(cfg) => match res {
            Ok(()) => {
                info!(service = "server", event = "stop", service_id = %instance.id, "api stopped");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "server", event = "run_failed", error = %e, "api exited with error");
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            info!(service = "server", event = "shutdown_signal", service_id = %instance.id, "received Ctrl+C");
            ExitCode::SUCCESS
        }
    }
}

fn main() -> ExitCode {
    dotenv().ok();
    common::utils::logging::init_logging_default();

    let instance = Instance { id: Uuid::new_v4(), pid: std::process::id() };
    install_panic_hook(instance);

    let cfg = match server::startup::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "server", event = "config_invalid", error = %e, "refusing to start");
            return ExitCode::FAILURE;
        }
    };

    let rt = match build_runtime(&cfg) {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "server",
        event = "start",
        service_id = %instance.id,
        pid = instance.pid,
        version = env!("CARGO_PKG_VERSION"),
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "file editor api starting"
    );
    rt.block_on(serve(cfg, instance))
}
