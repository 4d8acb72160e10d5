// Listener setup: TCP and/or Unix socket

use anyhow::{Context, Result};
use axum::Router;
use std::net::SocketAddr;
use std::path::Path;
use tokio::net::{TcpListener, UnixListener};
use tokio::signal;
use tokio::task::JoinHandle;
use tower::Service;
use tracing::{error, info};

pub async fn spawn_tcp(app: Router, port: u16) -> Result<JoinHandle<Result<()>>> {
    let addr = format!("0.0.0.0:{}", port);

    let listener = TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind TCP listener to {}", addr))?;

    info!(address = %addr, "TCP listener bound");

    Ok(tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("TCP server error")
    }))
}

/// Serve on a Unix socket, replacing a stale socket file left by an earlier run.
pub fn spawn_unix(app: Router, path: &Path) -> Result<JoinHandle<Result<()>>> {
    if path.exists() {
        std::fs::remove_file(path)
            .context(format!("Failed to remove existing Unix socket: {}", path.display()))?;
    }

    let listener = UnixListener::bind(path)
        .context(format!("Failed to bind Unix socket listener to {}", path.display()))?;

    info!(path = %path.display(), "Unix socket listener bound");

    let mut make_service = app.into_make_service();
    Ok(tokio::spawn(async move {
        loop {
            let (socket, _remote_addr) = tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        error!(error = %e, "Failed to accept Unix socket connection");
                        continue;
                    }
                },
                _ = shutdown_signal() => return Ok(()),
            };

            let tower_service = match make_service.call(&socket).await {
                Ok(svc) => svc,
                Err(infallible) => match infallible {},
            };

            tokio::spawn(async move {
                let socket = hyper_util::rt::TokioIo::new(socket);

                let hyper_service = hyper::service::service_fn(
                    move |request: hyper::Request<hyper::body::Incoming>| {
                        tower_service.clone().call(request)
                    },
                );

                if let Err(err) =
                    hyper_util::server::conn::auto::Builder::new(hyper_util::rt::TokioExecutor::new())
                        .serve_connection(socket, hyper_service)
                        .await
                {
                    error!(error = %err, "Error serving Unix socket connection");
                }
            });
        }
    }))
}

/// Wait for Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal"),
        _ = terminate => info!("Received SIGTERM signal"),
    }
}
