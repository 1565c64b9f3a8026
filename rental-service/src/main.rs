use rental_service::config::RentalConfig;
use rental_service::services::metrics::init_metrics;
use rental_service::startup::Application;
use service_core::observability::{init_tracing, shutdown_tracing};
use tokio::signal;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = RentalConfig::load()?;

    // Metrics recorder first so nothing recorded during startup is lost
    init_metrics()?;
    init_tracing("rental-service", &config.telemetry)?;

    tracing::info!(
        environment = ?config.common.environment,
        port = config.common.port,
        "Starting rental-service"
    );

    let application = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        anyhow::anyhow!("startup failed: {}", e)
    })?;
    application.run_until_stopped(shutdown_signal()).await?;

    shutdown_tracing();
    Ok(())
}
