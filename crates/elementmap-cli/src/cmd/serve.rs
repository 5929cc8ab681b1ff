//! `elementmap serve`: run the HTTP endpoint until interrupted.

use std::path::Path;

use anyhow::Context;
use clap::Args;
use elementmap_core::config::MapConfig;

use crate::serve::{ServeConfig, start_server};

/// Arguments for `elementmap serve`.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Interface to bind (overrides `[server] host`).
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides `[server] port`).
    #[arg(long)]
    pub port: Option<u16>,
}

/// Execute `elementmap serve`.
pub fn run_serve(args: &ServeArgs, config: &MapConfig, project_root: &Path) -> anyhow::Result<()> {
    let serve_config = ServeConfig {
        host: args
            .host
            .clone()
            .unwrap_or_else(|| config.server.host.clone()),
        port: args.port.unwrap_or(config.server.port),
        store_path: config.store_path(project_root),
        map: config.clone(),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(start_server(serve_config))
}
