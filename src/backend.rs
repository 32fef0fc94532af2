//! Backend transport and the simulated responder behind it.
//!
//! Requests are sent as `(Request, oneshot reply)` pairs over an mpsc
//! channel. The simulated backend serves each request on its own task
//! after an operation-specific delay, so overlapping calls complete
//! independently and in no guaranteed order.

use std::time::Duration;

use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use tokio::select;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::sleep;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::ClientError;
use crate::protocol::{unix_now, ContentMetadata, ContentRecord, NetworkMetrics, Request, Response};

// Simulated operation latencies.
const DOWNLOAD_DELAY: Duration = Duration::from_millis(1500);
const METADATA_DELAY: Duration = Duration::from_millis(1000);
const REGISTER_DELAY: Duration = Duration::from_millis(1500);
const AVAILABILITY_DELAY: Duration = Duration::from_millis(1000);
const METRICS_DELAY: Duration = Duration::from_millis(50);

const REQUEST_QUEUE_DEPTH: usize = 64;

/// Fires cancellation for every token created from this handle.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Cooperative cancellation signal carried by each request.
#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

/// Creates a connected cancellation handle/token pair.
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    /// Another token watching the same cancellation signal.
    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the paired handle fires. Pends forever if the
    /// handle is dropped without cancelling.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// A request in flight toward the backend task.
struct BackendRequest {
    request: Request,
    respond: oneshot::Sender<Response>,
}

/// Cloneable sending side of the backend channel.
#[derive(Clone, Debug)]
pub struct BackendHandle {
    tx: mpsc::Sender<BackendRequest>,
}

impl BackendHandle {
    /// Issues a request and waits for its reply, bounded by `timeout`
    /// and by the request's cancellation token.
    pub async fn call(
        &self,
        request: Request,
        timeout: Duration,
        mut cancel: CancelToken,
    ) -> Result<Response, ClientError> {
        let (respond, reply) = oneshot::channel();
        self.tx
            .send(BackendRequest { request, respond })
            .await
            .map_err(|_| ClientError::BackendClosed)?;

        select! {
            response = reply => response.map_err(|_| ClientError::BackendClosed),
            _ = sleep(timeout) => Err(ClientError::Timeout { after: timeout }),
            _ = cancel.cancelled() => Err(ClientError::Cancelled),
        }
    }
}

/// Responder task fabricating plausible replies after realistic
/// delays. No content or node state is kept between requests.
pub struct SimulatedBackend {
    rx: mpsc::Receiver<BackendRequest>,
    upload_delay: Duration,
    shutdown: CancelToken,
}

impl SimulatedBackend {
    /// Spawns the responder and returns the handle for issuing
    /// requests to it.
    pub fn spawn(config: &AppConfig, shutdown: CancelToken) -> BackendHandle {
        let (tx, rx) = mpsc::channel(REQUEST_QUEUE_DEPTH);
        let backend = Self {
            rx,
            upload_delay: config.simulated_upload_delay(),
            shutdown,
        };
        tokio::spawn(backend.run());
        BackendHandle { tx }
    }

    async fn run(mut self) {
        loop {
            select! {
                incoming = self.rx.recv() => {
                    let Some(BackendRequest { request, respond }) = incoming else {
                        break;
                    };
                    let delay = self.delay_for(&request);
                    tokio::spawn(async move {
                        sleep(delay).await;
                        let _ = respond.send(fabricate_response(request));
                    });
                }
                _ = self.shutdown.cancelled() => {
                    break;
                }
            }
        }
        debug!("simulated backend stopped");
    }

    fn delay_for(&self, request: &Request) -> Duration {
        match request {
            Request::Upload { .. } => self.upload_delay,
            Request::Download { .. } => DOWNLOAD_DELAY,
            Request::GetContentMetadata { .. } => METADATA_DELAY,
            Request::RegisterNode { .. } => REGISTER_DELAY,
            Request::GetContentNodes { .. } => AVAILABILITY_DELAY,
            Request::GetMetrics => METRICS_DELAY,
        }
    }
}

fn fabricate_response(request: Request) -> Response {
    match request {
        Request::Upload { content, metadata } => {
            let content_id = mock_content_id();
            debug!(
                %content_id,
                size = content.len(),
                name = %metadata.name,
                "fabricated upload reply"
            );
            Response::Uploaded { content_id }
        }
        Request::Download { content_id } => Response::Downloaded { content_id },
        Request::GetContentMetadata { content_id } => Response::Metadata {
            record: example_record(content_id),
        },
        Request::RegisterNode { registration } => Response::NodeRegistered {
            node_id: registration.node_id,
        },
        Request::GetContentNodes { content_id } => Response::ContentNodes {
            content_id,
            nodes: (0..3).map(|_| mock_node_id()).collect(),
        },
        Request::GetMetrics => Response::Metrics {
            metrics: NetworkMetrics::default(),
        },
    }
}

/// Fixed example record echoing the requested id. A real backend would
/// look the id up instead.
fn example_record(content_id: String) -> ContentRecord {
    ContentRecord {
        id: content_id,
        metadata: ContentMetadata {
            name: "Example Content".to_string(),
            size: 1_024_000,
            content_type: "application/octet-stream".to_string(),
            owner: "example-owner".to_string(),
            created_at: unix_now().saturating_sub(86_400),
            expires_at: None,
            content_hash: Some("sha256_mock_hash_value".to_string()),
        },
    }
}

/// A stand-in content id. A real backend derives this from the content
/// hash.
pub fn mock_content_id() -> String {
    format!("mock_{}", random_lowercase(24))
}

pub fn mock_node_id() -> String {
    format!("node_{}", random_lowercase(8))
}

fn random_lowercase(len: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .map(char::from)
        .map(|c| c.to_ascii_lowercase())
        .take(len)
        .collect()
}
