use std::path::PathBuf;

use anyhow::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder};
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};
use crate::model::{FilterField, ResponseMode, SortDirection, SortField};

/// Prefix of environment variables, e.g. `USERSEARCH__SERVER__PORT`.
pub const ENV_PREFIX: &str = "USERSEARCH";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub index: IndexConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Per-request deadline; `0` disables it.
    pub request_timeout_ms: u64,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the bind address as a string in the format "host:port".
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Option<std::time::Duration> {
        (self.request_timeout_ms > 0)
            .then(|| std::time::Duration::from_millis(self.request_timeout_ms))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub url: Option<String>,
    pub max_connections: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    /// Index directory; the index lives in memory when unset.
    pub path: Option<PathBuf>,
    pub writer_heap_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub page_size: usize,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    /// Query parameters honoured by `GET /search`.
    pub filter_fields: Vec<FilterField>,
    pub response_mode: ResponseMode,
    /// Number of records written by `GET /search/putsample`.
    pub sample_count: usize,
    /// Concurrent record writes during sample loading.
    pub sample_concurrency: usize,
    /// Documents committed per index batch during sample loading.
    pub index_batch_size: usize,
}

impl SearchConfig {
    #[must_use]
    pub fn filter_enabled(&self, field: FilterField) -> bool {
        self.filter_fields.contains(&field)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                request_timeout_ms: 30_000,
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                url: None,
                max_connections: 4,
            },
            index: IndexConfig {
                path: None,
                writer_heap_bytes: 50_000_000,
            },
            search: SearchConfig {
                page_size: 200,
                sort_field: SortField::Birthday,
                sort_direction: SortDirection::Asc,
                filter_fields: vec![FilterField::Mail, FilterField::UserId],
                response_mode: ResponseMode::Records,
                sample_count: 500,
                sample_concurrency: 8,
                index_batch_size: 100,
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
            },
        }
    }
}

impl Settings {
    fn builder() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.request_timeout_ms", 30_000)?
            .set_default("store.backend", "memory")?
            .set_default("store.max_connections", 4)?
            .set_default("index.writer_heap_bytes", 50_000_000)?
            .set_default("search.page_size", 200)?
            .set_default("search.sort_field", "birthday")?
            .set_default("search.sort_direction", "asc")?
            .set_default("search.filter_fields", vec!["mail", "userid"])?
            .set_default("search.response_mode", "records")?
            .set_default("search.sample_count", 500)?
            .set_default("search.sample_concurrency", 8)?
            .set_default("search.index_batch_size", 100)?
            .set_default("logging.level", "debug")?)
    }

    /// ## Summary
    /// Loads configuration from `config.toml` and environment variables into
    /// `Settings`. Environment variables take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration, deserializing it or
    /// validating it fails.
    pub fn load() -> Result<Self> {
        let settings = Self::builder()?
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            // Env, e.g. USERSEARCH__SEARCH__PAGE_SIZE=50
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("search.filter_fields"),
            )
            .build()?
            .try_deserialize::<Settings>()?;
        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Builds settings from defaults overlaid with a TOML document.
    ///
    /// ## Errors
    /// Returns an error if the document is malformed or fails validation.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let settings = Self::builder()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize::<Settings>()?;
        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Checks cross-field constraints serde cannot express.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` describing the first problem.
    pub fn validate(&self) -> CoreResult<()> {
        if self.search.page_size == 0 {
            return Err(CoreError::InvalidConfiguration(
                "search.page_size must be positive".to_string(),
            ));
        }
        if self.search.sample_concurrency == 0 || self.search.index_batch_size == 0 {
            return Err(CoreError::InvalidConfiguration(
                "search.sample_concurrency and search.index_batch_size must be positive"
                    .to_string(),
            ));
        }
        if self.store.backend == StoreBackend::Postgres
            && self.store.url.as_deref().is_none_or(str::is_empty)
        {
            return Err(CoreError::InvalidConfiguration(
                "store.url is required for the postgres backend".to_string(),
            ));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables, `.env` file and
/// `config.toml`.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
