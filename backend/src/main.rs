//! mcp-time mock server.

use clap::Parser;
use std::net::SocketAddr;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mcp_time::{config::Config, create_app_with_state, state::AppState};

/// mcp-time - mock MCP server over HTTP+SSE
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Absolute URL prefix for the message endpoint announced over SSE
    #[arg(long)]
    public_url: Option<String>,
}

/// Initialize logging. The returned guard must live as long as the process
/// so buffered file output gets flushed.
fn init_logging(config: &Config) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = match &config.log_level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let (file_layer, guard) = match &config.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("log_file has no file name: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .with(file_layer)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::from_figment(args.host, args.port, args.public_url)?;
    let _log_guard = init_logging(&config)?;
    info!("Configuration loaded");

    let state = AppState::from_config(&config);
    let shutdown = state.shutdown_token().clone();
    let app = create_app_with_state(state);

    let addr = config.socket_addr()?;
    info!("Starting mcp-time mock server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Open SSE streams end once the token is cancelled, letting graceful
    // shutdown finish.
    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down gracefully...");
        shutdown.cancel();
    };

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await?;

    info!("Server shut down");
    Ok(())
}
