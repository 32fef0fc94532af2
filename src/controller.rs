//! The interaction controller: five user operations plus dashboard
//! refresh, each validating its inputs against the configuration and
//! reporting into the status board.
//!
//! Operations never fail the caller. Every error, from a rejected
//! field to a timed-out request, is converted at the operation
//! boundary into an error status, and the final status is also
//! returned so callers can react without reading the board.

use std::path::PathBuf;

use tokio::fs;
use tracing::{info, warn};

use crate::backend::{BackendHandle, CancelToken};
use crate::config::AppConfig;
use crate::error::{ClientError, ValidationError};
use crate::format::format_bytes;
use crate::protocol::{
    unix_now, ContentMetadata, NetworkMetrics, NodeRegistration, Request, Response,
};
use crate::status::{AvailabilityReport, Status, StatusArea, StatusBoard};

/// Inputs of the upload form. The shell owns the form and resets it
/// after a successful upload.
#[derive(Clone, Debug, Default)]
pub struct UploadForm {
    pub file: Option<PathBuf>,
    pub name: String,
    pub content_type: String,
    pub owner: String,
}

#[derive(Clone)]
pub struct InteractionController {
    config: AppConfig,
    backend: BackendHandle,
    board: StatusBoard,
    application_connected: bool,
}

impl InteractionController {
    pub(crate) fn new(
        config: AppConfig,
        backend: BackendHandle,
        application_connected: bool,
    ) -> Self {
        Self {
            config,
            backend,
            board: StatusBoard::new(),
            application_connected,
        }
    }

    /// A handle onto the board this controller reports into.
    pub fn board(&self) -> StatusBoard {
        self.board.clone()
    }

    /// Writes the post-bootstrap greeting into the upload area.
    pub async fn announce_connection(&self) {
        let message = if self.application_connected {
            "dCDN client connected and ready!"
        } else {
            "dCDN client connected but requires deployed app ID to function fully"
        };
        self.board
            .set_status(StatusArea::Upload, Status::success(message))
            .await;
    }

    /// Validates the form, reads the file, and uploads it. On success
    /// the status names the new content id and the dashboard counters
    /// are refreshed once.
    pub async fn upload_content(&self, form: &UploadForm, cancel: &CancelToken) -> Status {
        match self.try_upload(form, cancel).await {
            Ok(status) => status,
            Err(err) => self.fail(StatusArea::Upload, err).await,
        }
    }

    async fn try_upload(
        &self,
        form: &UploadForm,
        cancel: &CancelToken,
    ) -> Result<Status, ClientError> {
        let path = form.file.as_ref().ok_or(ValidationError::MissingFile)?;
        let size = fs::metadata(path)
            .await
            .map_err(|err| ClientError::Operation(err.to_string()))?
            .len();

        if size > self.config.ui.max_file_size {
            return Err(ValidationError::FileTooLarge {
                limit: format_bytes(self.config.ui.max_file_size),
            }
            .into());
        }

        let content_type = form.content_type.trim();
        if let Some(allowed) = &self.config.content.allowed_types {
            if !allowed.iter().any(|t| t == content_type) {
                return Err(ValidationError::DisallowedType {
                    content_type: content_type.to_string(),
                    allowed: allowed.join(", "),
                }
                .into());
            }
        }

        let name = form.name.trim();
        let owner = form.owner.trim();
        if name.is_empty() || content_type.is_empty() || owner.is_empty() {
            return Err(ValidationError::MissingFields.into());
        }

        self.report(StatusArea::Upload, Status::success("Reading file..."))
            .await;
        let content = fs::read(path)
            .await
            .map_err(|err| ClientError::Operation(err.to_string()))?;

        let metadata = ContentMetadata {
            name: name.to_string(),
            size,
            content_type: content_type.to_string(),
            owner: owner.to_string(),
            created_at: unix_now(),
            expires_at: None,
            content_hash: None,
        };

        self.report(
            StatusArea::Upload,
            Status::success("Uploading content to dCDN..."),
        )
        .await;

        let response = self
            .backend
            .call(
                Request::Upload { content, metadata },
                self.config.upload_timeout(),
                cancel.clone(),
            )
            .await?;
        let content_id = match response {
            Response::Uploaded { content_id } => content_id,
            other => return Err(unexpected(other)),
        };

        info!(%content_id, size, "content uploaded");
        let status = Status::success(format!(
            "Content uploaded successfully! Content ID: {content_id}"
        ));
        self.report(StatusArea::Upload, status.clone()).await;
        self.load_metrics(cancel).await;
        Ok(status)
    }

    /// Requests a download of the identified content.
    pub async fn download_content(&self, content_id: &str, cancel: &CancelToken) -> Status {
        match self.try_download(content_id, cancel).await {
            Ok(status) => status,
            Err(err) => self.fail(StatusArea::Download, err).await,
        }
    }

    async fn try_download(
        &self,
        content_id: &str,
        cancel: &CancelToken,
    ) -> Result<Status, ClientError> {
        let content_id = required_content_id(content_id)?;
        self.report(
            StatusArea::Download,
            Status::success("Fetching content from dCDN..."),
        )
        .await;

        let response = self
            .backend
            .call(
                Request::Download {
                    content_id: content_id.to_string(),
                },
                self.config.request_timeout(),
                cancel.clone(),
            )
            .await?;
        let content_id = match response {
            Response::Downloaded { content_id } => content_id,
            other => return Err(unexpected(other)),
        };

        let status = Status::success(format!(
            "Content with ID {content_id} would be downloaded in a real implementation"
        ));
        self.report(StatusArea::Download, status.clone()).await;
        Ok(status)
    }

    /// Fetches the metadata record for the identified content and
    /// renders it into the metadata panel.
    pub async fn content_metadata(&self, content_id: &str, cancel: &CancelToken) -> Status {
        match self.try_content_metadata(content_id, cancel).await {
            Ok(status) => status,
            Err(err) => self.fail(StatusArea::Content, err).await,
        }
    }

    async fn try_content_metadata(
        &self,
        content_id: &str,
        cancel: &CancelToken,
    ) -> Result<Status, ClientError> {
        let content_id = required_content_id(content_id)?;
        self.report(
            StatusArea::Content,
            Status::success("Fetching content metadata..."),
        )
        .await;

        let response = self
            .backend
            .call(
                Request::GetContentMetadata {
                    content_id: content_id.to_string(),
                },
                self.config.request_timeout(),
                cancel.clone(),
            )
            .await?;
        let record = match response {
            Response::Metadata { record } => record,
            other => return Err(unexpected(other)),
        };

        self.board.show_metadata(record).await;
        let status = Status::success("Metadata loaded successfully");
        self.report(StatusArea::Content, status.clone()).await;
        Ok(status)
    }

    /// Registers a node from raw form inputs. `capacity_input` must
    /// parse to a positive integer byte count.
    pub async fn register_node(
        &self,
        node_id: &str,
        location: &str,
        capacity_input: &str,
        cancel: &CancelToken,
    ) -> Status {
        match self
            .try_register_node(node_id, location, capacity_input, cancel)
            .await
        {
            Ok(status) => status,
            Err(err) => self.fail(StatusArea::Node, err).await,
        }
    }

    async fn try_register_node(
        &self,
        node_id: &str,
        location: &str,
        capacity_input: &str,
        cancel: &CancelToken,
    ) -> Result<Status, ClientError> {
        let node_id = node_id.trim();
        let location = location.trim();
        let parsed = capacity_input
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|capacity| *capacity > 0);
        let capacity = match parsed {
            Some(capacity) if !node_id.is_empty() && !location.is_empty() => capacity,
            _ => return Err(ValidationError::InvalidNodeFields.into()),
        };

        self.report(
            StatusArea::Node,
            Status::success("Registering node with dCDN..."),
        )
        .await;

        let registration = NodeRegistration {
            node_id: node_id.to_string(),
            location: location.to_string(),
            capacity,
        };
        let response = self
            .backend
            .call(
                Request::RegisterNode { registration },
                self.config.request_timeout(),
                cancel.clone(),
            )
            .await?;
        let node_id = match response {
            Response::NodeRegistered { node_id } => node_id,
            other => return Err(unexpected(other)),
        };

        info!(%node_id, capacity, "node registered");
        let status = Status::success(format!(
            "Node {node_id} registered successfully with {} capacity",
            format_bytes(capacity)
        ));
        self.report(StatusArea::Node, status.clone()).await;
        self.load_metrics(cancel).await;
        Ok(status)
    }

    /// Asks which nodes currently hold the identified content and
    /// renders them into the availability panel.
    pub async fn check_content_availability(
        &self,
        content_id: &str,
        cancel: &CancelToken,
    ) -> Status {
        match self.try_check_availability(content_id, cancel).await {
            Ok(status) => status,
            Err(err) => self.fail(StatusArea::Availability, err).await,
        }
    }

    async fn try_check_availability(
        &self,
        content_id: &str,
        cancel: &CancelToken,
    ) -> Result<Status, ClientError> {
        let content_id = required_content_id(content_id)?;
        self.report(
            StatusArea::Availability,
            Status::success("Checking content availability..."),
        )
        .await;

        let response = self
            .backend
            .call(
                Request::GetContentNodes {
                    content_id: content_id.to_string(),
                },
                self.config.request_timeout(),
                cancel.clone(),
            )
            .await?;
        let (content_id, nodes) = match response {
            Response::ContentNodes { content_id, nodes } => (content_id, nodes),
            other => return Err(unexpected(other)),
        };

        let status = Status::success(format!("Content available on {} nodes", nodes.len()));
        self.board
            .show_availability(AvailabilityReport { content_id, nodes })
            .await;
        self.report(StatusArea::Availability, status.clone()).await;
        Ok(status)
    }

    /// Refreshes the dashboard counters. Failures are logged and leave
    /// the previous counters in place.
    pub async fn load_metrics(&self, cancel: &CancelToken) -> NetworkMetrics {
        match self
            .backend
            .call(
                Request::GetMetrics,
                self.config.request_timeout(),
                cancel.clone(),
            )
            .await
        {
            Ok(Response::Metrics { metrics }) => {
                self.board.record_metrics(metrics).await;
                metrics
            }
            Ok(other) => {
                warn!(response = ?other, "unexpected metrics reply");
                self.board.metrics().await
            }
            Err(err) => {
                warn!(error = %err, "failed to load metrics");
                self.board.metrics().await
            }
        }
    }

    async fn report(&self, area: StatusArea, status: Status) {
        self.board.set_status(area, status).await;
    }

    async fn fail(&self, area: StatusArea, err: ClientError) -> Status {
        warn!(error = %err, ?area, "operation rejected");
        let message = match &err {
            ClientError::Validation(validation) => validation.to_string(),
            other => format!("{}: {other}", area.failure_label()),
        };
        let status = Status::error(message);
        self.report(area, status.clone()).await;
        status
    }
}

fn required_content_id(content_id: &str) -> Result<&str, ValidationError> {
    let content_id = content_id.trim();
    if content_id.is_empty() {
        return Err(ValidationError::MissingContentId);
    }
    Ok(content_id)
}

fn unexpected(response: Response) -> ClientError {
    ClientError::Operation(format!("unexpected backend response: {response:?}"))
}
