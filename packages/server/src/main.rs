use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, bail};
use common::storage::MediaStore;
use common::storage::filesystem::FilesystemMediaStore;
use common::storage::s3::S3MediaStore;
use common::{StorageBackend, StorageConfig};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tubehub::config::AppConfig;
use tubehub::database::{ensure_indexes, init_db};
use tubehub::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load().context("loading configuration")?;

    let db = init_db(&config.database)
        .await
        .context("connecting to the database")?;
    ensure_indexes(&db)
        .await
        .context("creating database indexes")?;

    let media = build_media_store(&config.storage).await?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("parsing server address")?;

    let state = AppState {
        db: db.clone(),
        media,
        config,
    };
    let app = tubehub::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Server running at http://{}", addr);
    info!("API docs at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running API server")?;

    db.close().await.context("closing database pool")?;
    info!("Shut down cleanly");
    Ok(())
}

async fn build_media_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn MediaStore>> {
    match config.backend {
        StorageBackend::Filesystem => {
            let store = FilesystemMediaStore::new(
                config.root_dir.clone(),
                config.public_base_url.clone(),
                config.max_upload_size,
            )
            .await
            .with_context(|| format!("opening media directory {}", config.root_dir.display()))?;
            info!("Storing media under {}", config.root_dir.display());
            Ok(Arc::new(store))
        }
        StorageBackend::S3 => {
            let Some(s3) = config.s3.as_ref() else {
                bail!("storage.backend is s3 but no [storage.s3] section is configured");
            };
            let store = S3MediaStore::new(s3, config.public_base_url.clone(), config.max_upload_size)
                .context("configuring S3 media store")?;
            info!("Storing media in bucket {}", s3.bucket);
            Ok(Arc::new(store))
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", err);
    }
    info!("Shutdown signal received");
}
