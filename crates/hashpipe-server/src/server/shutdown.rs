use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Resolves on Ctrl+C, SIGTERM, or when `token` is cancelled by
/// `POST /shutdown`. A signal cancels `token` so that every holder observes
/// the shutdown.
pub async fn shutdown_signal(token: CancellationToken) {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
        () = token.cancelled() => {
            tracing::info!("Received shutdown request");
        },
    }

    token.cancel();
    tracing::info!("Shutdown signal received, draining pending work...");
}
