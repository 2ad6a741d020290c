use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use verbroute::config::{load_config, AppConfig, ConfigWatcher};
use verbroute::lifecycle::{build_dispatcher, signals, Shutdown};
use verbroute::observability::{logging, metrics};
use verbroute::{HandlerContext, HandlerResult, HttpServer, ServiceCatalog, ServiceType};

#[derive(Parser)]
#[command(name = "verbroute")]
#[command(about = "Convention-based HTTP request dispatcher", long_about = None)]
struct Cli {
    /// TOML configuration file; watched for changes.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Services served by the binary.
fn catalog() -> ServiceCatalog {
    ServiceCatalog::new().with(
        ServiceType::new("app::ProfileService").operation("getUser", get_user),
    )
}

fn get_user(ctx: &HandlerContext) -> HandlerResult {
    let mut user = serde_json::Map::new();
    user.insert("name".into(), "John Doe".into());
    user.insert("id".into(), 9.into());
    user.insert("context".into(), serde_json::to_value(ctx)?);
    Ok(user.into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init(&config.observability.log_level);
    tracing::info!("verbroute v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        mount_point = %config.dispatch.mount_point,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let dispatcher = Arc::new(build_dispatcher(catalog(), &config)?);

    // The watcher must outlive the server.
    let (config_updates, _watcher) = match &cli.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run()?))
        }
        None => (tokio::sync::mpsc::unbounded_channel().1, None),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    tokio::spawn(signals::shutdown_on_ctrl_c(shutdown));

    let server = HttpServer::new(config, dispatcher);
    server.run(listener, config_updates, shutdown_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
