#![doc = include_str!("../README.md")]

mod server;

use clap::Parser;
use hashpipe::Pipeline;
use server::config::{CliArgs, ServerConfig};
use server::routes::{AppState, router};
use server::shutdown::shutdown_signal;
use server::telemetry::init_telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    let providers = init_telemetry()?;

    let state = AppState::new(Arc::new(Pipeline::new(config.pipeline.clone())?));
    let pipeline = Arc::clone(state.pipeline());
    let token = state.shutdown_token();

    let app = router(state).layer(
        ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        ),
    );

    let listener = TcpListener::bind(&config.server_addr).await?;
    log_startup_info(&config.server_addr, &pipeline);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(token))
        .await?;

    // The listener is closed; finish everything already admitted.
    pipeline.shutdown().await;
    tracing::info!(
        "Service shut down successfully with {} stored items",
        pipeline.stored()
    );

    providers.shutdown();
    Ok(())
}

fn log_startup_info(addr: &str, pipeline: &Pipeline) {
    if cfg!(debug_assertions) {
        tracing::info!(
            "Starting hash service on {} with full config: {:#?}",
            addr,
            pipeline.config()
        );
    } else {
        tracing::info!(
            "Starting hash service on {} with {} workers",
            addr,
            pipeline.config().num_workers
        );
    }
}
