use anyhow::{bail, Context, Result};
use roster::core::config::Config;
use roster::core::state::AppState;
use roster::core::{routes, server, startup, tracing_init};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, Level};

fn main() -> Result<()> {
    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    let config = Config::from_file(&config_path).context(format!(
        "Failed to load configuration from '{}'. \
        Copy config.example.toml to config.toml and adjust the values.",
        config_path.display()
    ))?;

    tracing_init::init_tracing(&config.logging)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.num_threads)
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    runtime.block_on(async_main(config, config_path))
}

async fn async_main(config: Config, config_path: PathBuf) -> Result<()> {
    info!(
        config_path = %config_path.display(),
        port = ?config.server.port,
        unix_socket = ?config.server.unix_socket,
        num_threads = config.server.num_threads,
        backend = ?config.store.backend,
        table = %config.store.table,
        "Roster service starting"
    );

    let state = AppState::new(config.clone()).context("Failed to build application state")?;

    startup::probe_store(&state).await;

    let app = routes::build_router(Arc::new(state)).layer(
        ServiceBuilder::new().layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        ),
    );

    let tcp_handle = match config.server.port {
        Some(port) => Some(server::spawn_tcp(app.clone(), port).await?),
        None => None,
    };

    let unix_handle = match &config.server.unix_socket {
        Some(path) => Some(server::spawn_unix(app, path)?),
        None => None,
    };

    info!("HTTP server(s) started, waiting for shutdown signal");

    match (tcp_handle, unix_handle) {
        (Some(tcp), Some(unix)) => {
            tokio::select! {
                result = tcp => log_exit("TCP", result),
                result = unix => log_exit("Unix socket", result),
            }
        }
        (Some(tcp), None) => log_exit("TCP", tcp.await),
        (None, Some(unix)) => log_exit("Unix socket", unix.await),
        (None, None) => {
            error!("No listeners configured");
            bail!("No listeners configured");
        }
    }

    info!("Shutting down gracefully");

    Ok(())
}

fn log_exit(
    listener: &str,
    result: std::result::Result<Result<()>, tokio::task::JoinError>,
) {
    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(listener, error = %e, "Server task failed"),
        Err(e) => error!(listener, error = %e, "Server task panicked"),
    }
}
