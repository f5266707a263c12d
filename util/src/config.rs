//! Global application configuration.
//!
//! `AppConfig` is a lazily initialized singleton holding the values read from
//! `.env` and the process environment. Tests and binaries may override single
//! fields through the setters below.

use std::env;
use std::sync::{OnceLock, RwLock, RwLockReadGuard};

/// Runtime configuration shared by the binaries and the database layer.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
}

static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes"),
        Err(_) => default,
    }
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Every variable has a development default, so this never fails.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "asset-registry".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "logs/asset-registry.log".into()),
            log_to_stdout: flag("LOG_TO_STDOUT", false),
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/asset-registry.db".into()),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn global() -> RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Reloads the configuration from the environment, dropping overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock
                .write()
                .expect("Failed to acquire AppConfig write lock");
            *guard = AppConfig::from_env();
        }
    }

    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }
}

pub fn app_env() -> String {
    AppConfig::global().env.clone()
}

pub fn is_production() -> bool {
    app_env().eq_ignore_ascii_case("production")
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn setters_override_and_reset_restores() {
        unsafe {
            env::set_var("DATABASE_PATH", "tmp/from-env.db");
        }
        AppConfig::reset();
        assert_eq!(database_path(), "tmp/from-env.db");

        AppConfig::set_database_path("tmp/override.db");
        assert_eq!(database_path(), "tmp/override.db");

        AppConfig::reset();
        assert_eq!(database_path(), "tmp/from-env.db");

        unsafe {
            env::remove_var("DATABASE_PATH");
        }
        AppConfig::reset();
    }

    #[test]
    #[serial]
    fn defaults_apply_when_unset() {
        unsafe {
            env::remove_var("APP_ENV");
            env::remove_var("PROJECT_NAME");
        }
        AppConfig::reset();
        assert_eq!(app_env(), "development");
        assert_eq!(project_name(), "asset-registry");
        assert!(!is_production());

        unsafe {
            env::set_var("APP_ENV", "Production");
        }
        AppConfig::reset();
        assert!(is_production());

        unsafe {
            env::remove_var("APP_ENV");
        }
        AppConfig::reset();
    }

    #[test]
    #[serial]
    fn log_to_stdout_accepts_common_truthy_values() {
        let cases = [
            ("true", true),
            ("1", true),
            ("YES", true),
            ("false", false),
            ("no", false),
        ];
        for (raw, expected) in cases {
            unsafe {
                env::set_var("LOG_TO_STDOUT", raw);
            }
            assert_eq!(flag("LOG_TO_STDOUT", false), expected, "value {raw}");
        }
        unsafe {
            env::remove_var("LOG_TO_STDOUT");
        }
        assert!(!flag("LOG_TO_STDOUT", false));
    }
}
