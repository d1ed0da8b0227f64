use std::env;

use auth::HashCost;
use auth::SigningError;
use auth::SigningKey;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseConfig {
    fn default_max_connections() -> u32 {
        5
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    #[serde(default)]
    pub leeway_seconds: i64,
}

impl JwtConfig {
    /// One year.
    pub const MAX_EXPIRATION_HOURS: i64 = 24 * 365;
    pub const MAX_LEEWAY_SECONDS: i64 = 60 * 60;

    /// Signing key built from the configured secret.
    ///
    /// # Errors
    /// * `MissingKey` - Secret is empty
    pub fn signing_key(&self) -> Result<SigningKey, SigningError> {
        SigningKey::from_secret(self.secret.as_bytes())
    }

    /// Token lifetime.
    ///
    /// # Errors
    /// * `Message` - `expiration_hours` is not in `1..=MAX_EXPIRATION_HOURS`
    pub fn lifetime(&self) -> Result<Duration, ConfigError> {
        if !(1..=Self::MAX_EXPIRATION_HOURS).contains(&self.expiration_hours) {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_hours must be between 1 and {}",
                Self::MAX_EXPIRATION_HOURS
            )));
        }
        Duration::try_hours(self.expiration_hours).ok_or_else(|| {
            ConfigError::Message("jwt.expiration_hours is out of range".to_string())
        })
    }

    /// Clock-skew leeway applied past a token's expiration.
    ///
    /// # Errors
    /// * `Message` - `leeway_seconds` is not in `0..=MAX_LEEWAY_SECONDS`
    pub fn leeway(&self) -> Result<Duration, ConfigError> {
        if !(0..=Self::MAX_LEEWAY_SECONDS).contains(&self.leeway_seconds) {
            return Err(ConfigError::Message(format!(
                "jwt.leeway_seconds must be between 0 and {}",
                Self::MAX_LEEWAY_SECONDS
            )));
        }
        Duration::try_seconds(self.leeway_seconds).ok_or_else(|| {
            ConfigError::Message("jwt.leeway_seconds is out of range".to_string())
        })
    }
}

// Keeps the secret out of `Configuration loaded` style logs.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

/// Argon2id work factor for newly hashed passwords.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl PasswordConfig {
    pub fn hash_cost(&self) -> HashCost {
        HashCost {
            memory_kib: self.memory_kib,
            iterations: self.iterations,
            parallelism: self.parallelism,
        }
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        let cost = HashCost::default();
        Self {
            memory_kib: cost.memory_kib,
            iterations: cost.iterations,
            parallelism: cost.parallelism,
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        config.jwt.lifetime()?;
        config.jwt.leeway()?;

        Ok(config)
    }
}
