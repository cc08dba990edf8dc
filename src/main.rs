use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use huepresetd::bridge::Bridge;
use huepresetd::config;
use huepresetd::disco;
use huepresetd::dispatch::Dispatcher;
use huepresetd::presets::Presets;
use huepresetd::rotation::Rotation;
use huepresetd::server;

#[derive(Debug, Parser)]
#[command(name = "huepresetd", about = "Preset scene daemon for Philips Hue lights")]
struct Args {
    /// Path to the TOML config file.
    #[arg(long, default_value = "huepresetd.toml")]
    config: PathBuf,
    /// Address to serve on, host:port.
    #[arg(long)]
    bind: Option<String>,
    /// Hue application key (username).
    #[arg(short, long)]
    key: Option<String>,
    /// Bridge address; skips discovery when set.
    #[arg(long)]
    bridge: Option<std::net::IpAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    let mut settings = config::load_settings(&args.config)?;
    if let Some(bind) = args.bind {
        settings.bind = bind;
    }
    if let Some(key) = args.key {
        settings.username = key;
    }
    if let Some(bridge) = args.bridge {
        settings.bridge_addr = Some(bridge);
    }

    let presets = Presets::builtin();
    settings.validate(&presets)?;

    let bridge_ip = match settings.bridge_addr {
        Some(ip) => ip,
        None => disco::discover_bridge()
            .await
            .context("no bridge address configured and discovery failed")?,
    };
    let bridge = Bridge::for_ip(bridge_ip).with_user(&settings.username);

    let rotation = Rotation::new(settings.rotation.clone())?;
    let dispatcher = Dispatcher::new(presets, rotation, bridge, settings.surface_bridge_errors);
    let app = server::build_router(Arc::new(dispatcher));

    let listener = tokio::net::TcpListener::bind(&settings.bind)
        .await
        .with_context(|| format!("could not listen on {}", settings.bind))?;
    log::info!("serving on {}, bridge at {bridge_ip}", settings.bind);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("shutting down"),
        Err(e) => log::error!("could not listen for the shutdown signal: {e}"),
    }
}
