use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use hotdesk::directory::InMemoryDirectory;
use hotdesk::engine::Engine;
use hotdesk::notifier::{LogSink, Notifier};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let metrics_port: Option<u16> = std::env::var("HOTDESK_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok());
    hotdesk::observability::init(metrics_port);

    let data_dir = std::env::var("HOTDESK_DATA_DIR").unwrap_or_else(|_| "./data".into());
    let notify_interval: u64 = std::env::var("HOTDESK_NOTIFY_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);

    // Ensure data directory exists
    std::fs::create_dir_all(&data_dir)?;

    let directory = Arc::new(match std::env::var("HOTDESK_DIRECTORY") {
        Ok(path) => InMemoryDirectory::load(Path::new(&path))?,
        Err(_) => InMemoryDirectory::new(),
    });

    let wal_path = PathBuf::from(&data_dir).join("bookings.wal");
    let engine = Arc::new(Engine::new(wal_path, directory.clone())?);

    info!("hotdesk booking engine up");
    info!("  data_dir: {data_dir}");
    info!("  workplaces: {}", directory.workplace_count());
    info!("  notify_interval: {notify_interval}s");
    info!(
        "  metrics: {}",
        metrics_port.map_or("disabled".to_string(), |p| format!("http://0.0.0.0:{p}/metrics"))
    );

    let notifier = Notifier::new(engine.clone(), Arc::new(LogSink));
    let notifier_task = tokio::spawn(notifier.run(Duration::from_secs(notify_interval)));

    // Run until SIGTERM/ctrl-c, then stop the poller
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to register SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("ctrl-c received"),
            _ = sigterm.recv() => info!("SIGTERM received"),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await?;
        info!("ctrl-c received");
    }

    notifier_task.abort();
    info!("shutting down");
    Ok(())
}
