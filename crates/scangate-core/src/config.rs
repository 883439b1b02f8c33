//! Configuration module
//!
//! Env-driven configuration for the gateway: server, storage, scanning, and
//! notification settings. `Config::from_env` reads the process environment
//! (after a best-effort `.env` load); `validate` fails fast on misconfiguration.

use std::env;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_MAX_FILE_SIZE_BYTES: usize = 100 * 1024 * 1024;
const DEFAULT_CLAMAV_PORT: u16 = 3310;
const DEFAULT_CLAMAV_TIMEOUT_SECS: u64 = 30;
const DEFAULT_NOTIFICATION_QUEUE_SIZE: usize = 1000;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    /// Externally visible base URL; the signed form's `href` and the
    /// notification `downloadUrl` are derived from it.
    pub public_base_url: String,
    /// Upper bound for inbound request bodies (multipart uploads included).
    pub max_file_size_bytes: usize,
    /// Secret for the HMAC signature over the issued POST policy.
    pub form_signing_secret: String,
    /// Access-key id embedded in the `X-Amz-Credential` scope.
    pub credential_access_key: String,
    pub aws_region: String,
    pub upload_acl: String,
    // Storage configuration
    pub storage_path: String,
    // ClamAV configuration
    pub clamav_enabled: bool,
    pub clamav_host: String,
    pub clamav_port: u16,
    pub clamav_fail_closed: bool,
    pub clamav_timeout_secs: u64,
    // Notification dispatch configuration
    pub notification_queue_url: Option<String>,
    pub notification_queue_size: usize,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        // Best-effort .env load; missing file is fine
        dotenvy::dotenv().ok();

        let form_signing_secret = env::var("FORM_SIGNING_SECRET")
            .map_err(|_| anyhow::anyhow!("FORM_SIGNING_SECRET must be set"))?;

        let cors_origins = env_or("CORS_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let config = Config {
            server_port: env_parse("SERVER_PORT", DEFAULT_SERVER_PORT),
            environment: env_or("ENVIRONMENT", "development"),
            cors_origins,
            public_base_url: env_or("PUBLIC_BASE_URL", "http://localhost:3000"),
            max_file_size_bytes: env_parse("MAX_FILE_SIZE_BYTES", DEFAULT_MAX_FILE_SIZE_BYTES),
            form_signing_secret,
            credential_access_key: env_or("CREDENTIAL_ACCESS_KEY", "ASIAxxxbbcc"),
            aws_region: env_or("AWS_REGION", "us-east-1"),
            upload_acl: env_or("UPLOAD_ACL", "private"),
            storage_path: env_or("STORAGE_PATH", "./data/uploads"),
            clamav_enabled: env_bool("CLAMAV_ENABLED", false),
            clamav_host: env_or("CLAMAV_HOST", "localhost"),
            clamav_port: env_parse("CLAMAV_PORT", DEFAULT_CLAMAV_PORT),
            clamav_fail_closed: env_bool("CLAMAV_FAIL_CLOSED", true),
            clamav_timeout_secs: env_parse("CLAMAV_TIMEOUT_SECS", DEFAULT_CLAMAV_TIMEOUT_SECS),
            notification_queue_url: env::var("NOTIFICATION_QUEUE_URL").ok(),
            notification_queue_size: env_parse(
                "NOTIFICATION_QUEUE_SIZE",
                DEFAULT_NOTIFICATION_QUEUE_SIZE,
            ),
        };

        config.validate()?;
        Ok(config)
    }

    /// Fail fast on misconfiguration.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.public_base_url.trim().is_empty() {
            anyhow::bail!("PUBLIC_BASE_URL must not be empty");
        }
        if url::Url::parse(&self.public_base_url).is_err() {
            anyhow::bail!("PUBLIC_BASE_URL is not a valid URL: {}", self.public_base_url);
        }
        if self.form_signing_secret.len() < 16 {
            anyhow::bail!("FORM_SIGNING_SECRET must be at least 16 characters");
        }
        if self.max_file_size_bytes == 0 {
            anyhow::bail!("MAX_FILE_SIZE_BYTES must be greater than zero");
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Upload target the signed form points at.
    pub fn upload_href(&self) -> String {
        format!("{}/upload", self.public_base_url.trim_end_matches('/'))
    }

    /// Download URL for a stored reference.
    pub fn download_url(&self, reference: &str) -> String {
        format!(
            "{}/download/{}",
            self.public_base_url.trim_end_matches('/'),
            reference
        )
    }
}
