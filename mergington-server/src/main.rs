mod http;
mod openapi;
mod state;

use crate::state::State;
use anyhow::{ensure, Context, Result};
use clap::Parser;
use mergington_shared::Config;
use std::{fs::File, net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::net::TcpListener;

/// Command line arguments for mergington-server.
#[derive(Parser, Debug)]
struct ServerOptions {
    /// YAML configuration file. Without it the built-in activities are served.
    #[clap(short, long)]
    config: Option<PathBuf>,
    /// Address to listen on, overrides `http.listen_on`.
    #[clap(short, long)]
    listen_on: Option<SocketAddr>,
    /// Directory with the front end, overrides `http.static_dir`.
    #[clap(short, long)]
    static_dir: Option<PathBuf>,
}

fn load_config(options: &ServerOptions) -> Result<Config> {
    let mut config: Config = match &options.config {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("open config file: {}", path.display()))?;
            serde_yaml::from_reader(file)
                .with_context(|| format!("deserialize config from {}", path.display()))?
        }
        None => Config::default(),
    };
    config.validate().context("invalid activities")?;
    ensure!(!config.activities.is_empty(), "no activities configured");

    if let Some(listen_on) = options.listen_on {
        config.http.listen_on = listen_on;
    }
    if let Some(static_dir) = &options.static_dir {
        config.http.static_dir = static_dir.clone();
    }
    Ok(config)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    log::info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let options = ServerOptions::parse();
    let config = load_config(&options)?;

    let index = config.http.static_dir.join("index.html");
    if !index.is_file() {
        log::warn!("{} not found, the front end will not load", index.display());
    }

    let listen_on = config.http.listen_on;
    let state = Arc::new(State::from_config(config));
    log::info!("Loaded {} activities", state.list().len());

    let mut activities_rx = state.subscribe();
    tokio::spawn(async move {
        while activities_rx.changed().await.is_ok() {
            let participants: usize = activities_rx
                .borrow_and_update()
                .values()
                .map(|record| record.participants.len())
                .sum();
            log::debug!("Registry updated, {participants} participants in total");
        }
    });

    let listener = TcpListener::bind(listen_on)
        .await
        .with_context(|| format!("bind {listen_on}"))?;
    http::main(state, listener, shutdown_signal()).await
}
