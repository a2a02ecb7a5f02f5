use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::DEFAULT_COOKIE_NAME;

/// Salt value shipped for local development. Anything still running with it
/// in production gets a loud warning at startup.
const DEFAULT_CODEC_SALT: &str = "default-salt-please-change";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret salt for the identifier codec. Changing it invalidates every
    /// previously issued identifier token.
    pub salt: String,

    /// Minimum length of encoded identifier tokens.
    pub min_token_length: usize,

    /// Absolute session lifetime in seconds. No sliding renewal.
    pub session_ttl_secs: i64,

    /// Name of the session cookie.
    pub cookie_name: String,

    /// Whether the session cookie carries the `Secure` flag.
    pub cookie_secure: bool,
}

impl AuthConfig {
    #[must_use]
    pub fn uses_default_salt(&self) -> bool {
        self.salt == DEFAULT_CODEC_SALT
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the server address as a string in the format "host:port".
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from defaults, environment variables, and an
    /// optional `config.toml`. Environment variables take precedence over
    /// defaults; the TOML file takes precedence over both.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8710)?
            .set_default("database.max_connections", 4)?
            .set_default("logging.level", "debug")?
            .set_default("auth.salt", DEFAULT_CODEC_SALT)?
            .set_default("auth.min_token_length", 8)?
            // Matches the original seven-day cookie lifetime.
            .set_default("auth.session_ttl_secs", 7 * 24 * 60 * 60)?
            .set_default("auth.cookie_name", DEFAULT_COOKIE_NAME)?
            .set_default("auth.cookie_secure", false)?
            // Env file
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;

    if settings.auth.uses_default_salt() {
        tracing::warn!(
            "Default identifier codec salt is in use; set AUTH_SALT to a unique secret for production"
        );
    }

    Ok(settings)
}
