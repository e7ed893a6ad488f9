//! rpc-adapter service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum router ──▶ host::axum ──▶ adapter ──┬──▶ generic handler
//!                     (request id,     (AxumEvent)             │    (echo)
//!                      trace, limits)                          │
//!     Client Response                                          └──▶ JSON 500 when the
//!     ◀──────────────────────────────────────────────────────────     routing parameter
//!                                                                     is missing
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use rpc_adapter::config::loader::load_or_default;
use rpc_adapter::handler::EchoFactory;
use rpc_adapter::lifecycle::{wait_for_signal, Shutdown};
use rpc_adapter::observability::{logging, metrics};
use rpc_adapter::{HandlerOptions, HttpServer};

#[derive(Parser)]
#[command(name = "rpc-adapter")]
#[command(about = "Serve an RPC handler behind a framework request adapter", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    if cli.check {
        println!("configuration ok");
        return Ok(());
    }

    logging::init_logging(&config.observability)?;
    tracing::info!("rpc-adapter v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        prefix = %config.mount.prefix,
        route_key = %config.mount.route_key,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let options = HandlerOptions::new().with_on_error(|event| {
        tracing::error!(
            code = %event.error.code,
            path = event.path.unwrap_or("-"),
            url = %event.req.url,
            "{}",
            event.error.message
        );
    });

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(wait_for_signal(shutdown));

    let server = HttpServer::new(config, &EchoFactory, options);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
