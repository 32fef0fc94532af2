//! Process-wide configuration, loaded once at startup and read-only
//! thereafter.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Sentinel application id used until a deployed instance is configured.
pub const PLACEHOLDER_APP_ID: &str = "PLACEHOLDER_APP_ID";

const DEFAULT_FAUCET_URL: &str = "https://faucet.testnet-conway.linera.net";
const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
const DEFAULT_UPLOAD_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Deployed application instance to target. Left as the
    /// placeholder until an instance id is supplied.
    pub application_id: String,
    /// Faucet endpoint used for the wallet/chain bootstrap handshake.
    pub faucet_url: String,
    pub ui: UiConfig,
    pub content: ContentConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Uploads larger than this byte count are rejected.
    pub max_file_size: u64,
    /// Upper bound for an upload request; also scales the simulated
    /// upload delay.
    pub upload_timeout_ms: u64,
    /// Upper bound for every non-upload request.
    pub request_timeout_ms: u64,
    /// Declared page size for listings.
    pub default_page_size: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Allow-list for content types. Absent means no restriction.
    pub allowed_types: Option<Vec<String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            application_id: PLACEHOLDER_APP_ID.to_string(),
            faucet_url: DEFAULT_FAUCET_URL.to_string(),
            ui: UiConfig::default(),
            content: ContentConfig::default(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            upload_timeout_ms: DEFAULT_UPLOAD_TIMEOUT_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ContentConfig {
    /// The content types accepted by the production deployment.
    pub fn standard_allow_list() -> Vec<String> {
        [
            "text/plain",
            "text/html",
            "text/css",
            "text/javascript",
            "application/javascript",
            "application/json",
            "image/jpeg",
            "image/png",
            "image/gif",
            "image/webp",
            "application/pdf",
            "application/octet-stream",
        ]
        .iter()
        .map(|t| t.to_string())
        .collect()
    }
}

impl AppConfig {
    /// Loads and validates a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|err| ClientError::Config(format!("{}: {err}", path.display())))?;
        let config: Self =
            serde_json::from_str(&raw).map_err(|err| ClientError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.ui.max_file_size == 0 {
            return Err(ClientError::Config("ui.max_file_size must be positive".into()));
        }
        if self.ui.upload_timeout_ms == 0 {
            return Err(ClientError::Config("ui.upload_timeout_ms must be positive".into()));
        }
        if self.ui.request_timeout_ms == 0 {
            return Err(ClientError::Config("ui.request_timeout_ms must be positive".into()));
        }
        if self.ui.default_page_size == 0 {
            return Err(ClientError::Config("ui.default_page_size must be positive".into()));
        }
        if let Some(types) = &self.content.allowed_types {
            if types.iter().any(|t| t.trim().is_empty()) {
                return Err(ClientError::Config(
                    "content.allowed_types entries must be non-empty".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_millis(self.ui.upload_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.ui.request_timeout_ms)
    }

    /// The simulated backend answers uploads after a twentieth of the
    /// configured upload timeout.
    pub fn simulated_upload_delay(&self) -> Duration {
        Duration::from_millis(self.ui.upload_timeout_ms / 20)
    }
}
