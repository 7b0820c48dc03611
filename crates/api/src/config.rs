// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server configuration module
//!
//! This module provides configuration structures and logic for the blob properties
//! server, supporting different environments and validation of configuration parameters.

use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    time::Duration,
};

use anyhow::{Result, anyhow, ensure};
use blob_client::{BlobConfig, BlobConfigError, DEFAULT_LOG_FILE_PATH};
use config::{Config, ConfigError, Environment as ConfigEnv, File};
use serde::{Deserialize, Deserializer, Serialize, de};
use utoipa::ToSchema;

use crate::error::{ServerError, ServerResult};

/// A validated server port that ensures the value is appropriate for the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerPort {
    port: u16,
    environment: Environment,
}

impl ServerPort {
    /// Create a new `ServerPort`, ensuring it's valid for the given environment
    ///
    /// # Errors
    ///
    /// Returns an error if the port is 0 in non-testing environments
    pub fn new(port: u16, environment: Environment) -> Result<Self> {
        if port == 0 && environment != Environment::Testing {
            return Err(anyhow!("port cannot be 0 in non-testing environments"));
        }
        Ok(Self { port, environment })
    }

    /// Create a safe default port for development
    pub const fn default_development() -> Self {
        Self {
            port: 3000,
            environment: Environment::Development,
        }
    }

    /// Create a safe testing port (port 0)
    pub const fn testing() -> Self {
        Self {
            port: 0,
            environment: Environment::Testing,
        }
    }

    /// Get the port value
    pub fn value(&self) -> u16 {
        self.port
    }
}

impl<'de> Deserialize<'de> for ServerPort {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let port = u16::deserialize(deserializer)?;
        // Re-validated in `ServerConfig::load` once the environment is known
        Ok(Self {
            port,
            environment: Environment::Development,
        })
    }
}

/// A validated timeout duration in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeoutSeconds(Duration);

impl TimeoutSeconds {
    /// Create a new `TimeoutSeconds`, ensuring the value is within valid bounds
    ///
    /// # Errors
    ///
    /// Returns an error if timeout is 0 or greater than 300 seconds
    pub fn new(seconds: u64) -> Result<Self> {
        ensure!(seconds != 0, "timeout must be greater than 0");
        ensure!(seconds <= 300, "timeout cannot exceed 300");
        Ok(Self(Duration::from_secs(seconds)))
    }

    /// Create a safe default timeout (30 seconds)
    pub const fn default_value() -> Self {
        Self(Duration::from_secs(30))
    }

    /// Create a safe testing timeout (5 seconds)
    pub const fn testing() -> Self {
        Self(Duration::from_secs(5))
    }

    /// Default timeout for the outbound blob request (20 seconds)
    ///
    /// Kept below [`TimeoutSeconds::default_value`] so the blob client gives up before
    /// the inbound request does.
    pub const fn outbound_default() -> Self {
        Self(Duration::from_secs(20))
    }

    /// Outbound blob timeout for tests (2 seconds), below [`TimeoutSeconds::testing`]
    pub const fn outbound_testing() -> Self {
        Self(Duration::from_secs(2))
    }

    /// Get the timeout duration
    pub fn value(&self) -> Duration {
        self.0
    }
}

impl<'de> Deserialize<'de> for TimeoutSeconds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = u64::deserialize(deserializer)?;
        Self::new(seconds).map_err(|e| de::Error::custom(e.to_string()))
    }
}

impl Default for TimeoutSeconds {
    fn default() -> Self {
        Self::default_value()
    }
}

/// Environment types for configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Production environment
    Production,
    /// Development environment
    Development,
    /// Testing environment
    Testing,
}

/// Location of the property blob
#[derive(Clone, Deserialize)]
pub struct BlobStorageConfig {
    /// Base URL of the blob, without the SAS token
    #[serde(default)]
    pub blob_url: String,
    /// SAS query-string fragment, appended verbatim to `blob_url`
    #[serde(default)]
    pub sas_token: String,
    /// Outbound request timeout (validated range: 1-300, below the inbound timeout)
    #[serde(default = "TimeoutSeconds::outbound_default")]
    pub timeout_seconds: TimeoutSeconds,
}

impl Default for BlobStorageConfig {
    fn default() -> Self {
        Self {
            blob_url: String::new(),
            sas_token: String::new(),
            timeout_seconds: TimeoutSeconds::outbound_default(),
        }
    }
}

impl fmt::Debug for BlobStorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobStorageConfig")
            .field("blob_url", &self.blob_url)
            .field("sas_token", &"<redacted>")
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Failure log settings
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Path of the append-only blob failure log
    #[serde(default = "default_log_file_path")]
    pub log_file_path: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file_path: default_log_file_path(),
        }
    }
}

fn default_log_file_path() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE_PATH)
}

/// Server configuration for different environments
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: IpAddr,
    /// Server port (validated for environment compatibility)
    pub port: ServerPort,
    /// Inbound request timeout in seconds (validated range: 1-300)
    pub timeout_seconds: TimeoutSeconds,
    /// Environment type
    pub environment: Environment,
    /// Property blob location
    #[serde(default)]
    pub blob_storage: BlobStorageConfig,
    /// Failure log settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: ServerPort::default_development(),
            timeout_seconds: TimeoutSeconds::default(),
            environment: Environment::Development,
            blob_storage: BlobStorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment variables and optional configuration files
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` if configuration is invalid or cannot be loaded.
    pub fn from_env() -> ServerResult<Self> {
        Self::load().map_err(|e| ServerError::Config {
            message: format!("failed to load configuration: {e}"),
        })
    }

    /// Load configuration using the config crate with hierarchical sources
    ///
    /// Configuration is loaded in the following order (later sources override earlier ones):
    /// 1. Default values
    /// 2. Configuration file (config.json)
    /// 3. Environment-specific files (config.{env}.json)
    /// 4. Environment variables with `SERVER_` prefix, using `__` between nested keys
    ///    (e.g. `SERVER_BLOB_STORAGE__SAS_TOKEN`)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let env_var = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let mut config_builder = Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 3000)?
            .set_default("timeout_seconds", 30)?
            .set_default("environment", "development")?
            .set_default("blob_storage.timeout_seconds", 20)?
            .set_default("logging.log_file_path", DEFAULT_LOG_FILE_PATH)?
            .add_source(File::with_name("config.json").required(false))
            .add_source(
                File::with_name(&format!("config.{}.json", env_var.to_lowercase())).required(false),
            )
            .add_source(
                ConfigEnv::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        if std::env::var("ENVIRONMENT").is_ok() {
            config_builder = config_builder.set_override("environment", env_var.to_lowercase())?;
        }

        let config = config_builder.build()?;
        let mut server_config: Self = config.try_deserialize()?;

        // Fix the ServerPort to have the correct environment context
        server_config.port = ServerPort::new(server_config.port.value(), server_config.environment)
            .map_err(|e| ConfigError::Message(format!("invalid port configuration: {e}")))?;

        server_config
            .blob_config()
            .map_err(|e| ConfigError::Message(format!("invalid blob storage configuration: {e}")))?;

        server_config
            .validate_timeouts()
            .map_err(|e| ConfigError::Message(format!("invalid timeout configuration: {e}")))?;

        Ok(server_config)
    }

    /// Create configuration optimized for testing
    ///
    /// The blob URL points at a closed local port; tests replace it with a mock server.
    pub fn for_testing() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: ServerPort::testing(), // let OS choose available port
            timeout_seconds: TimeoutSeconds::testing(),
            environment: Environment::Testing,
            blob_storage: BlobStorageConfig {
                blob_url: "http://127.0.0.1:9/properties.json".to_string(),
                sas_token: String::new(),
                timeout_seconds: TimeoutSeconds::outbound_testing(),
            },
            logging: LoggingConfig::default(),
        }
    }

    /// Get socket address for binding
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port.value())
    }

    /// Check that the blob request times out before the inbound request does
    ///
    /// A failed blob fetch must reach the handler so it is logged and answered with a 500.
    ///
    /// # Errors
    ///
    /// Returns an error if `blob_storage.timeout_seconds` is not strictly below `timeout_seconds`
    pub fn validate_timeouts(&self) -> Result<()> {
        let inbound = self.timeout_seconds.value();
        let outbound = self.blob_storage.timeout_seconds.value();
        ensure!(
            outbound < inbound,
            "blob_storage.timeout_seconds ({}s) must be less than timeout_seconds ({}s)",
            outbound.as_secs(),
            inbound.as_secs()
        );
        Ok(())
    }

    /// Build the blob client configuration
    ///
    /// # Errors
    ///
    /// Returns `BlobConfigError::MissingBlobUrl` if no blob URL is configured
    pub fn blob_config(&self) -> Result<BlobConfig, BlobConfigError> {
        Ok(BlobConfig::new(
            self.blob_storage.blob_url.as_str(),
            self.blob_storage.sas_token.as_str(),
        )?
        .with_timeout(self.blob_storage.timeout_seconds.value())
        .with_log_file_path(self.logging.log_file_path.clone()))
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Development => write!(f, "development"),
            Environment::Testing => write!(f, "testing"),
        }
    }
}
