use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

use config::{Config, Environment, File};

use serde::Deserialize;
use serde_aux::prelude::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::controller::LandingPage;
use crate::gatekeeper::Gatekeeper;

/// Runtime environment, either `Dev` for local development, or `Prod` for release
#[derive(Debug)]
pub enum Runtime {
    Dev,
    Prod,
}

impl Runtime {
    pub fn as_str(&self) -> &str {
        match self {
            Runtime::Dev => "dev",
            Runtime::Prod => "prod",
        }
    }
}

impl TryFrom<String> for Runtime {
    type Error = anyhow::Error;

    fn try_from(s: String) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => anyhow::bail!("{} is not a valid runtime environment", other),
        }
    }
}

/// Application settings wrapper
#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: ApplicationSettings,
    pub database: DatabaseSettings,
    pub throttling: ThrottlingSettings,
}

impl Settings {
    /// Load application settings from the settings directory
    pub fn load() -> anyhow::Result<Self> {
        let path = env::current_dir()?.join("settings");
        // Get the current environment based on the `APP_ENV` environment variable, default to `Dev`
        let runtime: Runtime = env::var("APP_ENV")
            .unwrap_or_else(|_| "dev".into())
            .try_into()?;

        Self::load_from(runtime, &path)
    }
    /// Load application settings from a specified path and runtime
    pub fn load_from(runtime: Runtime, base_path: &Path) -> anyhow::Result<Self> {
        Config::builder()
            .add_source(File::from(base_path.join("base")).required(true))
            .add_source(File::from(base_path.join(runtime.as_str())).required(true))
            // Override/include any settings from environment variables
            // NOTE: Takes the form `APP_<settings category>__<setting name>`.
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
            .context("Failed to load/deserialize settings")
    }
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    port: u16,

    page_file: PathBuf,
    email_form_key: String,
    log_filter: String,
}

impl ApplicationSettings {
    /// The application address to bind to
    pub fn addr(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
    /// Default tracing filter, overridden by `RUST_LOG`
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }
    /// The page served to visitors, and the form field it posts the email in
    pub fn landing_page(&self) -> LandingPage {
        LandingPage::new(self.page_file.clone(), self.email_form_key.clone())
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    path: PathBuf,
    create_if_missing: bool,
    migrate: bool,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    max_connections: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    acquire_timeout_seconds: u64,
}

impl DatabaseSettings {
    /// The database connection options
    pub fn connect_options(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(self.create_if_missing)
    }
    /// A lazily connected pool, connections are opened on first use
    pub fn pool(&self) -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_seconds))
            .connect_lazy_with(self.connect_options())
    }
    /// Whether pending migrations are applied on startup
    pub fn migrate(&self) -> bool {
        self.migrate
    }
}

#[derive(Debug, Deserialize)]
pub struct ThrottlingSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    delay_seconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    max_submissions: u32,
}

impl ThrottlingSettings {
    pub fn gatekeeper(&self) -> Gatekeeper {
        Gatekeeper::new(self.delay_seconds, self.max_submissions)
    }
}
