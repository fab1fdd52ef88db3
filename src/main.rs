use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use snake_arena_client::arena::color::CellPalette;
use snake_arena_client::arena::shared::ArenaSnapshot;
use snake_arena_client::config::ClientConfig;
use snake_arena_client::net::client::ArenaClient;
use snake_arena_client::render::terminal::TerminalRenderer;
use snake_arena_client::session::ArenaSession;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout belongs to the terminal renderer
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Snake Arena Client v{}", env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::load_or_default();
    config.validate().map_err(anyhow::Error::msg)?;
    info!(
        "Configuration loaded: {}:{}, max_arena_cells={}",
        config.server_address, config.port, config.max_arena_cells
    );

    let session = ArenaSession::new(&config);
    let render_handle = if config.render_terminal {
        session.on_update(TerminalRenderer::stdout(CellPalette::new(config.background)))?
    } else {
        session.on_update(|snapshot: &ArenaSnapshot| {
            info!(
                "Arena frame v{} ({}x{})",
                snapshot.version(),
                snapshot.width(),
                snapshot.height()
            );
        })?
    };

    let mut client = ArenaClient::new(config.clone(), session.decoder());

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    };

    tokio::select! {
        result = client.connect_and_run() => {
            match result {
                Ok(stats) => info!(
                    "Stream ended: {} frames, {} applied, {} rejected",
                    stats.frames, stats.applied, stats.rejected
                ),
                Err(e) => error!("Connection error: {}", e),
            }
        }
        _ = shutdown => {
            info!("Shutting down...");
        }
    }

    info!("Session metrics: {}", session.metrics().summary());

    // Dropping every decoder handle closes the render channel
    drop(client);
    drop(session);
    render_handle
        .join()
        .map_err(|_| anyhow::anyhow!("render thread panicked"))?;

    info!("Client stopped");
    Ok(())
}
