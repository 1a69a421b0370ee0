use tracing_subscriber::EnvFilter;

use crate::{
    config::{Config, StoreConfig},
    data::kv::KvStore,
    error::AppError,
    router,
};

/// Installs the global tracing subscriber.
///
/// Verbosity comes from `RUST_LOG`, defaulting to `info` for this crate with
/// the Discord libraries held at `warn`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,serenity=warn,poise=warn,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Opens the configured record store.
///
/// With `DATABASE_URL` set, connects to the database and runs pending SeaORM
/// migrations so the key-value table exists. Otherwise opens, or creates on first
/// write, the local JSON data file.
///
/// # Arguments
/// - `config` - Application configuration naming the store
///
/// # Returns
/// - `Ok(KvStore)` - Store ready for use
/// - `Err(AppError)` - Failed to connect, migrate or read the data file
pub async fn connect_to_store(config: &Config) -> Result<KvStore, AppError> {
    match &config.store {
        StoreConfig::Database(url) => {
            use migration::{Migrator, MigratorTrait};
            use sea_orm::{ConnectOptions, Database};

            let mut opt = ConnectOptions::new(url);
            opt.sqlx_logging(false);

            let db = Database::connect(opt).await?;

            Migrator::up(&db, None).await?;

            tracing::info!("Using database store");
            Ok(KvStore::database(db))
        }
        StoreConfig::File(path) => {
            tracing::info!("Using file store at {}", path.display());
            KvStore::file(path.clone()).await
        }
    }
}

/// Serves the keep-alive endpoint until the process exits.
pub async fn serve_keep_alive(addr: &str) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Keep-alive endpoint listening on {}", addr);

    axum::serve(listener, router::router()).await?;

    Ok(())
}
