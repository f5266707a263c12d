pub mod filter_utils;
pub mod models;
pub mod repository;
pub mod test_utils;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::path::Path;
use util::config;

/// Turns a configured database path into a connection URL.
///
/// DSNs are used as-is; anything else is treated as a SQLite file path whose
/// parent directory is created on demand.
pub fn database_url(path_or_url: &str) -> String {
    if path_or_url.starts_with("sqlite:")
        || path_or_url.starts_with("postgres://")
        || path_or_url.starts_with("mysql://")
    {
        return path_or_url.to_string();
    }

    if let Some(parent) = Path::new(path_or_url).parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }
    format!("sqlite://{path_or_url}?mode=rwc")
}

/// Connects using `DATABASE_PATH` from the global configuration.
pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    let url = database_url(&config::database_path());
    log::info!("Connecting to {}", url);

    let mut options = ConnectOptions::new(url);
    options.sqlx_logging(false);
    Database::connect(options).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_url_passes_dsns_through() {
        assert_eq!(database_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            database_url("postgres://u:p@localhost/assets"),
            "postgres://u:p@localhost/assets"
        );
    }

    #[test]
    fn database_url_wraps_plain_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("assets.db");
        let url = database_url(path.to_str().unwrap());

        assert_eq!(url, format!("sqlite://{}?mode=rwc", path.display()));
        assert!(path.parent().unwrap().exists());
    }
}
