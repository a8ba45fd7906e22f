use std::sync::Arc;

use anyhow::Context;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use songs_backend::config::Config;
use songs_backend::routers;
use songs_backend::store::{self, MongoStore, SongStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_target(false)
        .init();

    let config = Config::from_env()?;

    let store = MongoStore::connect(&config)
        .await
        .context("failed to connect to the document store")?;

    // Replace whatever the collection holds with the seed dataset.
    let songs = store::load_seed(&config.seed_file)?;
    let seeded = songs.len();
    store
        .reseed(songs)
        .await
        .context("failed to seed the songs collection")?;
    info!("seeded {seeded} songs from {}", config.seed_file.display());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;
    info!("songs backend listening on {}", listener.local_addr()?);

    axum::serve(listener, routers::app(Arc::new(store)))
        .await
        .context("server error")?;
    Ok(())
}
