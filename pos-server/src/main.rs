use std::path::Path;

use anyhow::Context;
use pos_server::bootstrap::{ensure_admin, seed_demo_data};
use pos_server::{Config, Server, ServerState, init_logger_with_file, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (.env) and logging
    dotenv::dotenv().ok();
    let log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty());
    let _log_guard = init_logger_with_file(log_dir.as_deref().map(Path::new));

    print_banner();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "POS server starting");

    // 2. Configuration
    let config = Config::from_env().context("invalid configuration")?;

    // 3. Store and shared state
    let state = ServerState::initialize(&config).context("failed to open store")?;

    // 4. Startup data
    ensure_admin(&state).await?;
    if config.seed_demo_data {
        seed_demo_data(&state).await?;
    }

    // 5. HTTP server
    Server::with_state(config, state)
        .run()
        .await
        .context("server error")?;

    Ok(())
}
