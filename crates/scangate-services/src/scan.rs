//! Virus scanning service.
//!
//! The pipeline talks to the `Scanner` trait; `ClamAvScanner` implements it
//! against a clamd instance over TCP.

use async_trait::async_trait;
use clamav_client::{clean, Tcp};
use scangate_core::ScanVerdict;
use std::str;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Scanning transport/engine failures. A verdict is never produced when one
/// of these is returned (unless the scanner is configured fail-open, in which
/// case the error is swallowed and the verdict is `Clean`).
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Scan engine error: {0}")]
    Engine(String),

    #[error("Scan timeout (exceeded {0} seconds)")]
    Timeout(u64),
}

/// Virus-scanning capability.
#[async_trait]
pub trait Scanner: Send + Sync {
    /// Scan `content` and produce exactly one verdict.
    async fn check_if_clean(&self, content: &[u8]) -> Result<ScanVerdict, ScanError>;
}

/// Scanner backed by a ClamAV daemon.
#[derive(Clone)]
pub struct ClamAvScanner {
    host: String,
    port: u16,
    fail_closed: bool,
    /// Timeout in seconds for each scan operation
    timeout_secs: u64,
}

impl ClamAvScanner {
    /// Create a new scanner.
    ///
    /// # Arguments
    /// * `host` - ClamAV daemon hostname
    /// * `port` - ClamAV daemon port (typically 3310)
    /// * `fail_closed` - If true, surface scan failures/timeouts as errors;
    ///   if false, treat them as a clean verdict (fail-open)
    pub fn new(host: String, port: u16, fail_closed: bool) -> Self {
        Self::with_timeout(host, port, fail_closed, 30)
    }

    /// Create with a custom scan timeout (for large files or slow instances).
    pub fn with_timeout(host: String, port: u16, fail_closed: bool, timeout_secs: u64) -> Self {
        Self {
            host,
            port,
            fail_closed,
            timeout_secs,
        }
    }

    fn fail_open_or(&self, err: ScanError) -> Result<ScanVerdict, ScanError> {
        if self.fail_closed {
            Err(err)
        } else {
            tracing::warn!(error = %err, "Scan failed, continuing (fail-open)");
            Ok(ScanVerdict::Clean)
        }
    }
}

/// Pull the signature name out of a clamd `FOUND` response line,
/// e.g. `stream: Eicar-Test-Signature FOUND`.
fn extract_virus_name(response_bytes: &[u8]) -> String {
    let response_str = match str::from_utf8(response_bytes) {
        Ok(s) => s.trim(),
        Err(_) => return "unknown".to_string(),
    };
    if response_str.contains("FOUND") {
        response_str
            .split(':')
            .nth(1)
            .unwrap_or("unknown")
            .split_whitespace()
            .next()
            .unwrap_or("unknown")
            .to_string()
    } else {
        "unknown".to_string()
    }
}

#[async_trait]
impl Scanner for ClamAvScanner {
    /// Scan in-memory data using the sync API inside spawn_blocking to avoid
    /// !Send tokio futures.
    async fn check_if_clean(&self, content: &[u8]) -> Result<ScanVerdict, ScanError> {
        let start = Instant::now();
        tracing::debug!(host = %self.host, port = %self.port, "Starting ClamAV scan");
        let data = content.to_vec();
        let host = self.host.clone();
        let port = self.port;
        let timeout_secs = self.timeout_secs;

        let result = tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            tokio::task::spawn_blocking(move || {
                let address = format!("{}:{}", host, port);
                let connection = Tcp {
                    host_address: address.as_str(),
                };
                let response_bytes = clamav_client::scan_buffer(data.as_slice(), connection, None)
                    .map_err(|e| ScanError::Engine(format!("ClamAV scan error: {}", e)))?;
                let is_clean = clean(&response_bytes).map_err(|e| {
                    ScanError::Engine(format!("Failed to parse ClamAV response: {}", e))
                })?;
                if is_clean {
                    Ok(ScanVerdict::Clean)
                } else {
                    Ok(ScanVerdict::VirusFound(extract_virus_name(&response_bytes)))
                }
            }),
        )
        .await;

        match result {
            Ok(Ok(Ok(verdict))) => {
                match &verdict {
                    ScanVerdict::Clean => tracing::info!(
                        duration_ms = start.elapsed().as_millis(),
                        "File scan completed: clean"
                    ),
                    ScanVerdict::VirusFound(name) => tracing::warn!(
                        duration_ms = start.elapsed().as_millis(),
                        virus = %name,
                        "File scan detected virus"
                    ),
                }
                Ok(verdict)
            }
            Ok(Ok(Err(err))) => {
                tracing::error!(error = %err, "ClamAV scan failed");
                self.fail_open_or(err)
            }
            Ok(Err(join_err)) => {
                let err = ScanError::Engine(format!("ClamAV scan task join error: {}", join_err));
                tracing::error!(error = %err, "ClamAV scan panicked");
                Err(err)
            }
            Err(_) => {
                tracing::error!(timeout_secs, "ClamAV scan timeout");
                self.fail_open_or(ScanError::Timeout(timeout_secs))
            }
        }
    }
}

/// Scanner used when scanning is disabled by configuration: every file gets
/// a clean verdict.
#[derive(Clone, Default)]
pub struct DisabledScanner;

#[async_trait]
impl Scanner for DisabledScanner {
    async fn check_if_clean(&self, _content: &[u8]) -> Result<ScanVerdict, ScanError> {
        tracing::debug!("Virus scanning disabled, treating file as clean");
        Ok(ScanVerdict::Clean)
    }
}
