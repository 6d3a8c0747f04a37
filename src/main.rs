//! hue-power-memory: restores Hue light settings after a power cycle.
//!
//! Run with: hue-power-memory --help

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::{error, info};

use hue_power_memory::{
    BootstrapOptions, BridgeConfig, HueBridge, Reconciler, Scheduler, bootstrap,
};

#[derive(Parser)]
#[command(name = "hue-power-memory", version)]
#[command(about = "Restore Hue light settings after the lights are power-cycled", long_about = None)]
struct Cli {
    /// Bridge config file (default: platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bridge address, overriding the config file
    #[arg(short, long)]
    bridge: Option<String>,

    /// Application username, overriding the config file
    #[arg(short, long)]
    username: Option<String>,

    /// Polling interval in milliseconds
    #[arg(short, long, default_value = "1500")]
    interval_ms: u64,

    /// Bridge request timeout in milliseconds
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    /// Seconds to wait for the bridge link button on first start
    #[arg(long, default_value = "30")]
    link_wait: u64,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();
    info!("Starting Hue power memory server");

    let Some(path) = cli.config.clone().or_else(BridgeConfig::path) else {
        error!("no config directory on this platform; pass --config");
        std::process::exit(1);
    };

    let mut config = BridgeConfig::load_from(&path);
    if cli.bridge.is_some() {
        config.bridge_ip = cli.bridge.clone();
    }
    if cli.username.is_some() {
        config.username = cli.username.clone();
    }

    let options = BootstrapOptions {
        link_wait: Duration::from_secs(cli.link_wait),
        ..Default::default()
    };
    let config = match bootstrap(config, &path, &options).await {
        Ok(config) => config,
        Err(e) => {
            error!("could not set up the bridge: {e}");
            std::process::exit(1);
        }
    };

    let (Some(host), Some(username)) = (config.bridge_ip.as_deref(), config.username.as_deref())
    else {
        error!("bridge config is incomplete");
        std::process::exit(1);
    };

    let bridge = match HueBridge::with_timeout(host, username, Duration::from_millis(cli.timeout_ms)) {
        Ok(bridge) => bridge,
        Err(e) => {
            error!("could not create bridge client: {e}");
            std::process::exit(1);
        }
    };

    info!("Watching lights on {} every {}ms", bridge.base(), cli.interval_ms);
    Scheduler::new(Reconciler::new(bridge))
        .with_interval(Duration::from_millis(cli.interval_ms))
        .run()
        .await;
}
