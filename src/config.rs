//! Server configuration.
//!
//! Values start from [`Config::default`] and are overridden by plain
//! environment variables (`PORT`, `DB_HOST`, `NODE_ENV`, ...). A `.env` file in
//! the working directory is loaded into the environment first, if present.
//!
//! Variables that are set but empty count as unset. Text settings such as
//! `DB_PASSWORD` are taken verbatim, so `1234` or `007` stay strings.

use std::time::Duration;

use figment::providers::{Env, Serialized};
use figment::value::{Dict, Value};
use figment::Figment;
use serde::{Deserialize, Serialize};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};

use crate::error::Error;

const ENV_VARS: &[&str] = &[
    "HOST",
    "PORT",
    "DB_HOST",
    "DB_PORT",
    "DB_USER",
    "DB_PASSWORD",
    "DB_NAME",
    "DATABASE_URL",
    "DB_CONNECTION_LIMIT",
    "DB_ACQUIRE_TIMEOUT_MS",
    "NODE_ENV",
    "USE_IN_MEMORY",
    "FRONTEND_URL",
];

/// Keys whose values must not be parsed as numbers, booleans or lists.
const TEXT_KEYS: &[&str] = &[
    "host",
    "db_host",
    "db_user",
    "db_password",
    "db_name",
    "database_url",
    "frontend_url",
];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    /// Takes precedence over the individual `db_*` connection fields.
    pub database_url: Option<String>,
    pub db_connection_limit: u32,
    pub db_acquire_timeout_ms: u64,
    #[serde(rename = "node_env")]
    pub environment: Environment,
    /// Allows the in-memory fallback even in production.
    pub use_in_memory: bool,
    pub frontend_url: Option<String>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            host: "127.0.0.1".into(),
            port: 5000,
            db_host: "localhost".into(),
            db_port: 3306,
            db_user: "root".into(),
            db_password: String::new(),
            db_name: "campaign_tracker".into(),
            database_url: None,
            db_connection_limit: 10,
            db_acquire_timeout_ms: 3000,
            environment: Environment::Development,
            use_in_memory: false,
            frontend_url: None,
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Serialized::defaults(environment()))
    }

    pub fn load() -> Result<Config, Error> {
        // a missing .env file is fine
        let _ = dotenvy::dotenv();

        Ok(Config::figment().extract()?)
    }

    pub fn fallback_enabled(&self) -> bool {
        self.use_in_memory || self.environment != Environment::Production
    }

    pub fn connect_options(&self) -> Result<MySqlConnectOptions, Error> {
        if let Some(url) = &self.database_url {
            return Ok(url.parse()?);
        }

        Ok(MySqlConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name))
    }

    pub fn pool_options(&self) -> MySqlPoolOptions {
        MySqlPoolOptions::new()
            .max_connections(self.db_connection_limit)
            .acquire_timeout(Duration::from_millis(self.db_acquire_timeout_ms))
    }
}

fn environment() -> Dict {
    Env::raw()
        .only(ENV_VARS)
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(key, value)| {
            let value = if TEXT_KEYS.contains(&key.as_str()) {
                Value::from(value)
            } else {
                value.parse().unwrap_or_else(|never| match never {})
            };

            (key.as_str().to_owned(), value)
        })
        .collect()
}
