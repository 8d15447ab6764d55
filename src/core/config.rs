//! Configuration management

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use config::{Config as ConfigBuilder, ConfigBuilder as Builder, ConfigError as BuilderError, Environment, File};
use config::builder::DefaultState;
use clap::Parser;

/// Environment variable prefix, e.g. `STARPLUS_SERVER__PORT=8080`
pub const ENV_PREFIX: &str = "STARPLUS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid server configuration: {0}")]
    InvalidServer(String),

    #[error("Invalid database configuration: {0}")]
    InvalidDatabase(String),

    #[error("Invalid logging configuration: {0}")]
    InvalidLogging(String),

    #[error("Invalid security configuration: {0}")]
    InvalidSecurity(String),

    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

impl From<BuilderError> for ConfigError {
    fn from(err: BuilderError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
}

impl Config {
    /// Load configuration with precedence: CLI args > Environment variables > Config file > Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let cli_args = CliArgs::parse();
        Self::load_with(&cli_args)
    }

    /// Same as [`Config::load`] with already parsed arguments
    pub fn load_with(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let mut builder = with_defaults(ConfigBuilder::builder())?;

        if let Some(config_path) = &cli_args.config {
            if !config_path.exists() {
                return Err(ConfigError::FileNotFound(
                    config_path.display().to_string()
                ));
            }
            builder = builder.add_source(File::from(config_path.as_path()));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("security.allowed_origins")
                .try_parsing(true)
        );

        if let Some(host) = &cli_args.host {
            builder = builder.set_override("server.host", host.clone())?;
        }
        if let Some(port) = cli_args.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(db_path) = &cli_args.database {
            builder = builder.set_override("database.path", db_path.display().to_string())?;
        }
        if let Some(log_level) = &cli_args.log_level {
            builder = builder.set_override("logging.level", log_level.clone())?;
        }

        Self::finish(builder)
    }

    /// Built-in defaults only
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::finish(with_defaults(ConfigBuilder::builder())?)
    }

    fn finish(builder: Builder<DefaultState>) -> Result<Self, ConfigError> {
        let mut config: Config = builder.build()?.try_deserialize()?;
        config.security.fill_jwt_secret();
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.logging.validate()?;
        self.security.validate()?;
        Ok(())
    }
}

fn with_defaults(builder: Builder<DefaultState>) -> Result<Builder<DefaultState>, ConfigError> {
    Ok(builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 3000)?
        .set_default("server.request_timeout", 30)?
        .set_default("database.path", "./data/starplus.db")?
        .set_default("database.connection_pool_size", 10)?
        .set_default("database.busy_timeout", 5000)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "json")?
        .set_default("logging.output", "stdout")?
        .set_default("security.jwt_secret", "")?
        .set_default("security.token_ttl_secs", 3600)?
        .set_default("security.bcrypt_cost", 10)?
        .set_default("security.allowed_origins", vec!["http://localhost:5173"])?
        .set_default("security.enable_hsts", false)?
        .set_default("security.hsts_max_age", 31536000)?
        .set_default("security.bootstrap_admin_username", "admin")?
        .set_default("security.bootstrap_admin_password", "admin123")?)
}

/// Command-line arguments for configuration override
#[derive(Debug, Default, Parser)]
#[command(name = "starplus-inventory")]
#[command(about = "Star Plus tower/server/equipment inventory API", long_about = None)]
pub struct CliArgs {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Server host address
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Database file path
    #[arg(short, long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: u64, // seconds
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::InvalidServer("host cannot be empty".to_string()));
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidServer("port must be greater than 0".to_string()));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::InvalidServer("request_timeout must be greater than 0".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub connection_pool_size: usize,
    pub busy_timeout: u64, // milliseconds
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidDatabase("path cannot be empty".to_string()));
        }

        if self.connection_pool_size == 0 {
            return Err(ConfigError::InvalidDatabase("connection_pool_size must be greater than 0".to_string()));
        }

        if self.busy_timeout == 0 {
            return Err(ConfigError::InvalidDatabase("busy_timeout must be greater than 0".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
    pub log_file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.as_str()) {
            return Err(ConfigError::InvalidLogging(
                format!("level must be one of: {:?}", valid_levels)
            ));
        }

        let valid_formats = ["json", "text"];
        if !valid_formats.contains(&self.format.as_str()) {
            return Err(ConfigError::InvalidLogging(
                format!("format must be one of: {:?}", valid_formats)
            ));
        }

        let valid_outputs = ["stdout", "file"];
        if !valid_outputs.contains(&self.output.as_str()) {
            return Err(ConfigError::InvalidLogging(
                format!("output must be one of: {:?}", valid_outputs)
            ));
        }

        if self.output == "file" && self.log_file.is_none() {
            return Err(ConfigError::InvalidLogging(
                "log_file must be specified when output is 'file'".to_string()
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub bcrypt_cost: u32,
    pub allowed_origins: Vec<String>,
    pub enable_hsts: bool,
    pub hsts_max_age: u64, // seconds
    pub bootstrap_admin_username: String,
    pub bootstrap_admin_password: String,
    /// Set when no secret was configured and one was generated at load time
    #[serde(skip)]
    pub jwt_secret_generated: bool,
}

/// Shortest accepted signing secret, in bytes
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Longest accepted session lifetime (7 days)
pub const MAX_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Secrets that circulate in sample configs and must never sign tokens
const KNOWN_PLACEHOLDER_SECRETS: &[&str] = &[
    "change-this-secret-in-production",
    "changeme",
    "secret",
];

impl SecurityConfig {
    /// Generate a random secret when none is configured.
    ///
    /// Tokens signed with a generated secret do not survive a restart.
    pub fn fill_jwt_secret(&mut self) {
        if self.jwt_secret.is_empty() {
            self.jwt_secret = format!(
                "{}{}",
                uuid::Uuid::new_v4().simple(),
                uuid::Uuid::new_v4().simple()
            );
            self.jwt_secret_generated = true;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if KNOWN_PLACEHOLDER_SECRETS.contains(&self.jwt_secret.as_str()) {
            return Err(ConfigError::InvalidSecurity("jwt_secret is a published placeholder".to_string()));
        }

        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::InvalidSecurity(format!(
                "jwt_secret must be at least {} bytes", MIN_JWT_SECRET_LEN
            )));
        }

        if self.token_ttl_secs <= 0 || self.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::InvalidSecurity(format!(
                "token_ttl_secs must be between 1 and {}", MAX_TOKEN_TTL_SECS
            )));
        }

        // bcrypt only accepts costs in 4..=31
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidSecurity("bcrypt_cost must be between 4 and 31".to_string()));
        }

        if self.allowed_origins.is_empty() {
            return Err(ConfigError::InvalidSecurity("allowed_origins cannot be empty".to_string()));
        }

        if self.enable_hsts && self.hsts_max_age == 0 {
            return Err(ConfigError::InvalidSecurity("hsts_max_age must be greater than 0 when enable_hsts is true".to_string()));
        }

        if self.bootstrap_admin_username.trim().is_empty() || self.bootstrap_admin_password.is_empty() {
            return Err(ConfigError::InvalidSecurity(
                "bootstrap admin credentials cannot be empty".to_string()
            ));
        }

        Ok(())
    }
}
