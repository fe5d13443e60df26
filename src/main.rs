//! Pomodoro Timer - a countdown daemon for the work/break/rest technique
//!
//! This is the main entry point for the pomodoro-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use pomodoro_timer::{
    api::create_router,
    config::Config,
    services::notifier_task,
    state::AppState,
    storage::JsonFileStorage,
    tasks::{autosave_task, countdown_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pomodoro-timer v{}", env!("CARGO_PKG_VERSION"));

    let storage = JsonFileStorage::new(config.data_file());
    info!("Snapshot file: {}", storage.path().display());

    let settings = config.settings();
    info!("Configuration: host={}, port={}, work={}min, break={}min, rest={}min, rest every {} blocks",
          config.host, config.port, settings.work_time, settings.break_time,
          settings.rest_time, settings.rest_periodicity);

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        settings,
        Box::new(storage),
    ));

    if config.fresh {
        info!("Starting fresh, saved snapshot ignored");
    } else {
        match state.load() {
            Ok(Some(loaded)) => info!("Restored saved timer: {:?}", loaded),
            Ok(None) => info!("No saved timer, starting from the first work block"),
            Err(e) => warn!("{}", e),
        }
    }

    // Start the background tasks
    let countdown_state = Arc::clone(&state);
    tokio::spawn(async move {
        countdown_task(countdown_state).await;
    });

    let notifier_state = Arc::clone(&state);
    let notify_cmd = config.notify_cmd.clone();
    tokio::spawn(async move {
        notifier_task(notifier_state, notify_cmd).await;
    });

    if let Some(period) = config.autosave_period() {
        let autosave_state = Arc::clone(&state);
        tokio::spawn(async move {
            autosave_task(autosave_state, period).await;
        });
    }

    if config.autostart {
        state.start().map_err(anyhow::Error::msg)?;
    }

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /start         - Start or resume the countdown");
    info!("  POST   /stop          - Pause the countdown");
    info!("  POST   /reset         - Back to the first work block");
    info!("  POST   /restart-phase - Apply settings to the current phase now");
    info!("  GET    /settings      - Current settings");
    info!("  PUT    /settings      - Update settings");
    info!("  PUT    /state         - Update cycle/phase");
    info!("  POST   /data/save     - Persist the snapshot");
    info!("  POST   /data/load     - Restore the snapshot");
    info!("  DELETE /data          - Erase the snapshot");
    info!("  GET    /status        - Timer status");
    info!("  GET    /events        - Server-Sent Events stream");
    info!("  GET    /health        - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Persist on teardown so the next start resumes where this one left off
    if let Err(e) = state.stop() {
        warn!("{}", e);
    }
    match state.save() {
        Ok(snapshot) => info!("Saved timer on shutdown: {:?}", snapshot),
        Err(e) => tracing::error!("{}", e),
    }

    info!("Server shutdown complete");
    Ok(())
}
