//! Rocket telemetry server binary.
//!
//! Serves telemetry ingestion and rocket queries over HTTP. State lives only
//! in memory and is lost when the process exits.

use rocket_server::{app, config, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Default config file looked up in the working directory.
const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Picks the config file: first CLI argument, then `ROCKETS_CONFIG_PATH`,
/// then [`DEFAULT_CONFIG_PATH`]. Also returns where the path came from.
fn config_path() -> (String, &'static str) {
    let non_blank = |value: &String| !value.trim().is_empty();

    if let Some(path) = std::env::args().nth(1).filter(non_blank) {
        (path, "argument")
    } else if let Some(path) = std::env::var("ROCKETS_CONFIG_PATH").ok().filter(non_blank) {
        (path, "environment")
    } else {
        (DEFAULT_CONFIG_PATH.to_string(), "default")
    }
}

fn init_tracing(logging: &config::LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

#[tokio::main]
async fn main() {
    let (path, source) = config_path();
    let config = match config::load_config(Some(path.as_str())) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("rocket-server: invalid configuration in {path}: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging);
    tracing::info!(%path, source, "configuration loaded");

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "cannot bind telemetry listener");
            std::process::exit(1);
        }
    };

    tracing::info!(%addr, "accepting rocket telemetry");

    if let Err(e) = axum::serve(listener, app(AppState::in_memory()))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "telemetry server stopped with an error");
        std::process::exit(1);
    }

    tracing::info!("telemetry server stopped, in-memory rocket state discarded");
}

/// Resolves once SIGINT or SIGTERM arrives. If a handler cannot be
/// installed that signal is simply never observed.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "SIGINT handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        () = interrupt => "SIGINT",
        () = terminate => "SIGTERM",
    };
    tracing::info!(signal, "draining in-flight requests before exit");
}
