use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use tracing::info;

use vitals::config::{Config, load_config, load_config_from_path};
use vitals::engine::Engine;
use vitals::poller::Poller;
use vitals::server;
use vitals::system::SystemSource;

#[derive(Parser)]
#[command(
    name = "vitals",
    about = "System telemetry HTTP service with derived metrics and health scoring"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:3000
    #[arg(long, env = "VITALS_LISTEN")]
    listen: Option<String>,

    /// Collection interval in milliseconds
    #[arg(long, env = "VITALS_INTERVAL_MS")]
    interval_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitals=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    let engine = Arc::new(Engine::new(create_source(), config.processes.top));
    let poller = Poller::new(
        engine.clone(),
        Duration::from_millis(config.poll.collect_deadline_ms),
    );
    poller.start(Duration::from_millis(config.poll.interval_ms));

    let app = server::router(engine);

    let addr: SocketAddr = config
        .server
        .listen
        .parse()
        .wrap_err_with(|| format!("invalid listen address {:?}", config.server.listen))?;
    info!(%addr, "listening");
    info!(
        "endpoints: /api/system/{{info,cpu,memory,uptime,load,disk,network,health,history,processes,all}}"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .wrap_err("failed to bind listener")?;
    axum::serve(listener, app).await.wrap_err("server error")?;

    poller.stop();
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(ref listen) = cli.listen {
        config.server.listen = listen.clone();
    }
    if let Some(interval) = cli.interval_ms {
        config.poll.interval_ms = interval;
    }

    config
}

fn create_source() -> Box<dyn SystemSource> {
    #[cfg(target_os = "linux")]
    {
        Box::new(vitals::system::HostSource::new())
    }
    #[cfg(not(target_os = "linux"))]
    {
        // No tick-counter reader off Linux; serve deterministic mock data.
        Box::new(vitals::system::MockSource::typical_system())
    }
}
