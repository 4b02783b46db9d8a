use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    common::utils::logging::init_logging_json();

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    info!(
        service = "form_editor",
        event = "start",
        %service_id,
        pid,
        version = env!("CARGO_PKG_VERSION"),
        "form editor starting"
    );

    let cfg = server::startup::load_config()?;

    tokio::select! {
        res = server::run_form_editor(cfg) => {
            if let Err(e) = &res {
                error!(service = "form_editor", event = "run_failed", error = %e, "form editor exited with error");
            }
            res
        }
        _ = tokio::signal::ctrl_c() => {
            info!(service = "form_editor", event = "shutdown_signal", %service_id, pid, "received Ctrl+C, shutting down");
            Ok(())
        }
    }
}
