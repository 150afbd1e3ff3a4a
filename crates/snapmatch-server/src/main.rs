use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use snapmatch_server::config::ServerConfig;
use snapmatch_server::{http, AppState};

/// Fallback when `RUST_LOG` is unset. Directives name the crate targets
/// (underscored), matching the tracing target equal to them or prefixed
/// by them plus `::`.
const DEFAULT_LOG_FILTER: &str = "info,snapmatch_server=debug,snapmatch_room=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let game_config = config.game_config()?;
    tracing::info!(
        symbols = game_config.catalog.len(),
        card_size = game_config.card_size,
        round_secs = game_config.round_duration.as_secs(),
        "game configuration loaded"
    );

    let state = Arc::new(AppState::new(game_config));
    let app = http::app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "snapmatch server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
