//! MongoDB connection bootstrap.
//!
//! The service holds exactly one [`Database`] handle for its whole lifetime;
//! the driver pools connections behind it.

use std::time::Duration;

use bookshelf_kernel::settings::DatabaseSettings;
use mongodb::{bson::doc, options::ClientOptions, Client, Database};
use thiserror::Error;

const APP_NAME: &str = "bookshelf";

#[derive(Debug, Error)]
pub enum DbError {
    #[error("invalid database uri: {0}")]
    InvalidUri(#[source] mongodb::error::Error),

    #[error("database unreachable: {0}")]
    Unreachable(#[source] mongodb::error::Error),
}

/// Open the client described by `settings` and verify it with a `ping`.
pub async fn connect(settings: &DatabaseSettings) -> Result<Database, DbError> {
    let mut options = ClientOptions::parse(&settings.uri)
        .await
        .map_err(DbError::InvalidUri)?;
    options.server_selection_timeout = Some(Duration::from_millis(settings.connect_timeout_ms));
    options.app_name.get_or_insert_with(|| APP_NAME.to_string());

    let name = database_name(&options, &settings.name);
    let client = Client::with_options(options).map_err(DbError::InvalidUri)?;
    let database = client.database(&name);

    database
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(DbError::Unreachable)?;

    tracing::info!(target: "bookshelf-db", database = %name, "database connected");
    Ok(database)
}

/// The database named in the URI path, or `fallback` when the URI has none.
pub fn database_name(options: &ClientOptions, fallback: &str) -> String {
    options
        .default_database
        .clone()
        .unwrap_or_else(|| fallback.to_string())
}
