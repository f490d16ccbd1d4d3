/// Configuration management for the admin server
///
/// Settings are layered, later sources winning:
///
/// 1. Built-in defaults
/// 2. `ezztracker.toml` in the working directory, if present
/// 3. Environment variables (a `.env` file is loaded into the environment first)
///
/// # Keys
///
/// - `COMPANY_NAME`: Name of the company created on first run (default: ebizz)
/// - `ADMIN_TITLE`: Title shown by the admin index (default: ezzTracker Admin)
/// - `SECRET_KEY`: Session signing key, at least 32 characters (required)
/// - `DATABASE_FILE`: SQLite database file (default: ezztracker.sqlite)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 5)
/// - `SESSION_TTL_HOURS`: Login session lifetime (default: 24)
/// - `API_HOST`: Host to bind to (default: 127.0.0.1)
/// - `API_PORT`: Port to bind to (default: 5000)
///
/// # Example
///
/// ```no_run
/// use ezztracker_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use ezztracker_shared::db::pool::DatabaseConfig as PoolConfig;
use serde::Deserialize;
use std::path::PathBuf;

/// Minimum length of `SECRET_KEY`
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted `SESSION_TTL_HOURS` (ten years)
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 10;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Name given to the default company when the database is created
    pub company_name: String,

    /// Admin site title
    pub admin_title: String,

    pub api: ApiConfig,

    pub database: DatabaseConfig,

    pub session: SessionConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub file: PathBuf,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Secret key for signing session tokens
    ///
    /// IMPORTANT: Must be kept secret. Generate with: `openssl rand -hex 32`
    pub secret: String,

    pub ttl_hours: i64,
}

/// Flat key/value view of every configuration source
#[derive(Debug, Deserialize)]
struct Settings {
    company_name: String,
    admin_title: String,
    secret_key: Option<String>,
    database_file: PathBuf,
    database_max_connections: u32,
    session_ttl_hours: i64,
    api_host: String,
    api_port: u16,
}

impl Config {
    /// Loads configuration from defaults, `ezztracker.toml` and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `SECRET_KEY` is missing or shorter than 32 characters
    /// - A value cannot be parsed into its type
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let sources = Self::defaults()?
            .add_source(::config::File::with_name("ezztracker").required(false))
            .add_source(Self::environment())
            .build()?;

        Self::from_sources(sources)
    }

    /// Environment source; values stay strings until deserialized into their field
    fn environment() -> ::config::Environment {
        ::config::Environment::default()
    }

    fn defaults() -> Result<::config::ConfigBuilder<::config::builder::DefaultState>, ::config::ConfigError> {
        ::config::Config::builder()
            .set_default("company_name", "ebizz")?
            .set_default("admin_title", "ezzTracker Admin")?
            .set_default("database_file", "ezztracker.sqlite")?
            .set_default("database_max_connections", 5)?
            .set_default("session_ttl_hours", 24)?
            .set_default("api_host", "127.0.0.1")?
            .set_default("api_port", 5000)
    }

    /// Validates merged settings and shapes them into a [`Config`]
    pub fn from_sources(sources: ::config::Config) -> anyhow::Result<Self> {
        let settings: Settings = sources.try_deserialize()?;

        let secret = settings
            .secret_key
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("SECRET_KEY is required"))?;

        if secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("SECRET_KEY must be at least {} characters long", MIN_SECRET_LEN);
        }

        if !(1..=MAX_SESSION_TTL_HOURS).contains(&settings.session_ttl_hours) {
            anyhow::bail!(
                "SESSION_TTL_HOURS must be between 1 and {}",
                MAX_SESSION_TTL_HOURS
            );
        }

        Ok(Self {
            company_name: settings.company_name,
            admin_title: settings.admin_title,
            api: ApiConfig {
                host: settings.api_host,
                port: settings.api_port,
            },
            database: DatabaseConfig {
                file: settings.database_file,
                max_connections: settings.database_max_connections,
            },
            session: SessionConfig {
                secret,
                ttl_hours: settings.session_ttl_hours,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Pool settings for the shared database layer
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            file: self.database.file.clone(),
            max_connections: self.database.max_connections,
            ..Default::default()
        }
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session.ttl_hours)
    }
}
