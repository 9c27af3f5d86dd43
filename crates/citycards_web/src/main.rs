//! Server entry point.

use citycards_core::db::open_db;
use citycards_core::init_logging;
use citycards_web::{app, AppState, Config};
use log::info;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env();

    init_logging(&config.log_level, &config.log_dir)?;

    let conn = open_db(&config.db_path)?;
    std::fs::create_dir_all(&config.media_dir)?;
    let state = AppState::new(conn, config.media_dir.clone());

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    info!(
        "event=http_serve module=web status=start addr={} db={}",
        config.addr,
        config.db_path.display()
    );
    axum::serve(listener, app(state)).await?;

    Ok(())
}
