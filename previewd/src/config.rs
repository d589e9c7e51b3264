//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The configuration
//! file path defaults to `config.yaml` but can be specified via `-f` flag or `PREVIEWD_CONFIG`
//! environment variable.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY** - Storage credentials, mapped onto
//!    `storage.access_key_id` and `storage.secret_access_key`
//! 3. **Environment variables** - Variables prefixed with `PREVIEWD_` override everything above
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `PREVIEWD_STORAGE__BUCKET=thumbnails` sets the `storage.bucket` field.
//!
//! ## Usage
//!
//! ```no_run
//! use clap::Parser;
//! use previewd::config::{Args, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let args = Args::parse();
//! let config = Config::load(&args)?;
//!
//! println!("Server will bind to {}:{}", config.host, config.port);
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Variable Examples
//!
//! ```bash
//! # Override server port
//! PREVIEWD_PORT=8080
//!
//! # Storage credentials (the account id in CDN links defaults to the access key id)
//! AWS_ACCESS_KEY_ID=...
//! AWS_SECRET_ACCESS_KEY=...
//!
//! # Point at a different bucket and CDN
//! PREVIEWD_STORAGE__BUCKET=thumbnails
//! PREVIEWD_CDN__BASE_URL=https://cdn.example.com
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "PREVIEWD_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// All fields have defaults matching the production deployment, so an empty
/// config file plus the two storage credentials is a complete configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Object storage the preview images are written to
    pub storage: StorageConfig,
    /// Public CDN that serves the stored objects
    pub cdn: CdnConfig,
    /// Request size limits
    pub limits: LimitsConfig,
    /// Enable Prometheus metrics endpoint at `/internal/metrics`
    pub enable_metrics: bool,
    /// Enable OpenTelemetry OTLP export for distributed tracing
    pub enable_otel_export: bool,
}

/// S3-compatible storage settings.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// S3 API endpoint
    pub endpoint_url: Url,
    /// Signing region; most S3-compatible providers accept any value
    pub region: String,
    /// Bucket every preview is written to
    pub bucket: String,
    /// Logical folder prefixed to every object key
    pub folder: String,
    /// Address the bucket as a path segment instead of a subdomain
    pub force_path_style: bool,
    /// Access key id, usually provided through `AWS_ACCESS_KEY_ID`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,
    /// Secret access key, usually provided through `AWS_SECRET_ACCESS_KEY`
    #[serde(skip_serializing)]
    pub secret_access_key: Option<String>,
}

// Hand-written so the secret never ends up in debug logs
impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("endpoint_url", &self.endpoint_url.as_str())
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("folder", &self.folder)
            .field("force_path_style", &self.force_path_style)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Public URL layout: `{base_url}/projects/{account_id}/{bucket_segment}/{key}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CdnConfig {
    /// CDN origin
    pub base_url: Url,
    /// Project/account path segment. Falls back to `storage.access_key_id` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Fixed segment between the account and the object key
    pub bucket_segment: String,
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum accepted request body in bytes. Images arrive base64 encoded, so this is
    /// roughly 4/3 of the largest image accepted.
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            storage: StorageConfig::default(),
            cdn: CdnConfig::default(),
            limits: LimitsConfig::default(),
            enable_metrics: false,
            enable_otel_export: false,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint_url: "https://bucket.poehali.dev".parse().expect("Default storage endpoint is a valid URL"),
            region: "us-east-1".to_string(),
            bucket: "files".to_string(),
            folder: "previews".to_string(),
            force_path_style: true,
            access_key_id: None,
            secret_access_key: None,
        }
    }
}

impl Default for CdnConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cdn.poehali.dev".parse().expect("Default CDN URL is a valid URL"),
            account_id: None,
            bucket_segment: "bucket".to_string(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 20 * 1024 * 1024, // 20 MiB
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Standard AWS credential variables
            .merge(
                Env::raw()
                    .only(&["AWS_ACCESS_KEY_ID"])
                    .map(|_| "storage.access_key_id".into()),
            )
            .merge(
                Env::raw()
                    .only(&["AWS_SECRET_ACCESS_KEY"])
                    .map(|_| "storage.secret_access_key".into()),
            )
            // Prefixed variables win over everything else; PREVIEWD_CONFIG is the file path, not a field
            .merge(Env::prefixed("PREVIEWD_").ignore(&["CONFIG"]).split("__"))
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        if self.storage.access_key_id.as_deref().is_none_or(str::is_empty) {
            return Err(Error::Internal {
                operation: "Config validation: storage access key id is not configured. \
                     Set AWS_ACCESS_KEY_ID or storage.access_key_id in the config file."
                    .to_string(),
            });
        }

        if self.storage.secret_access_key.as_deref().is_none_or(str::is_empty) {
            return Err(Error::Internal {
                operation: "Config validation: storage secret access key is not configured. \
                     Set AWS_SECRET_ACCESS_KEY or storage.secret_access_key in the config file."
                    .to_string(),
            });
        }

        if self.storage.bucket.trim().is_empty() {
            return Err(Error::Internal {
                operation: "Config validation: storage.bucket cannot be empty".to_string(),
            });
        }

        if self.storage.folder.trim_matches('/').is_empty() {
            return Err(Error::Internal {
                operation: "Config validation: storage.folder cannot be empty".to_string(),
            });
        }

        if self.cdn.bucket_segment.trim_matches('/').is_empty() {
            return Err(Error::Internal {
                operation: "Config validation: cdn.bucket_segment cannot be empty".to_string(),
            });
        }

        if self.limits.max_body_bytes == 0 {
            return Err(Error::Internal {
                operation: "Config validation: limits.max_body_bytes cannot be 0".to_string(),
            });
        }

        Ok(())
    }

    /// Account segment used in public CDN links
    pub fn cdn_account_id(&self) -> Option<&str> {
        self.cdn
            .account_id
            .as_deref()
            .or(self.storage.access_key_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
