//! Session bootstrap: the simulated faucet/wallet/chain handshake.
//!
//! A session replaces module-level globals. It is constructed once at
//! startup, owns the backend handle and the session-wide cancellation
//! handle, and hands out controllers bound to both.

use rand::{thread_rng, Rng};
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

use crate::backend::{cancel_pair, BackendHandle, CancelHandle, CancelToken, SimulatedBackend};
use crate::config::{AppConfig, PLACEHOLDER_APP_ID};
use crate::controller::InteractionController;
use crate::error::ClientError;

const HANDSHAKE_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug)]
pub struct Session {
    chain_id: String,
    application_connected: bool,
    config: AppConfig,
    backend: BackendHandle,
    shutdown: CancelHandle,
}

impl Session {
    /// Validates the configuration, performs the simulated faucet
    /// handshake, claims a chain, and spawns the backend. Failure here
    /// blocks every backend-dependent feature.
    pub async fn connect(config: AppConfig) -> Result<Self, ClientError> {
        config.validate()?;
        if config.faucet_url.trim().is_empty() {
            return Err(ClientError::Init("faucet URL is not configured".to_string()));
        }

        sleep(HANDSHAKE_DELAY).await;
        let chain_id = random_chain_id();
        let application_connected = config.application_id != PLACEHOLDER_APP_ID;

        let (shutdown, token) = cancel_pair();
        let backend = SimulatedBackend::spawn(&config, token);

        info!(%chain_id, application_connected, "dCDN session connected");
        Ok(Self {
            chain_id,
            application_connected,
            config,
            backend,
            shutdown,
        })
    }

    /// The chain claimed for this session.
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// Whether a deployed application instance is configured.
    pub fn application_connected(&self) -> bool {
        self.application_connected
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// A controller bound to this session's backend.
    pub fn controller(&self) -> InteractionController {
        InteractionController::new(
            self.config.clone(),
            self.backend.clone(),
            self.application_connected,
        )
    }

    /// A token that fires when the session shuts down.
    pub fn cancel_token(&self) -> CancelToken {
        self.shutdown.token()
    }

    /// Cancels every in-flight request and stops the backend.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

fn random_chain_id() -> String {
    let mut bytes = [0u8; 32];
    thread_rng().fill(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn chain_id_is_64_hex_chars() {
        let session = Session::connect(AppConfig::default()).await.unwrap();
        assert_eq!(session.chain_id().len(), 64);
        assert!(session.chain_id().chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!session.application_connected());
    }

    #[tokio::test(start_paused = true)]
    async fn deployed_application_id_marks_connected() {
        let config = AppConfig {
            application_id: "9a6140207dec406bb0f67fb98cda7cc9".to_string(),
            ..AppConfig::default()
        };
        let session = Session::connect(config).await.unwrap();
        assert!(session.application_connected());
    }
}
