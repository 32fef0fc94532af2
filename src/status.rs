//! Status reporting and rendered result panels.
//!
//! Each operation writes one final status into its own area; later
//! writes overwrite earlier ones with no history. The board is the
//! only state shared between operations, and the presentation layer
//! decides how to render it.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::protocol::{ContentRecord, NetworkMetrics};

/// The five per-operation status areas of the console.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusArea {
    Upload,
    Download,
    Node,
    Content,
    Availability,
}

impl StatusArea {
    /// Prefix used when an issued operation fails mid-flight.
    pub(crate) fn failure_label(self) -> &'static str {
        match self {
            StatusArea::Upload => "Upload failed",
            StatusArea::Download => "Download failed",
            StatusArea::Node => "Node registration failed",
            StatusArea::Content => "Failed to get metadata",
            StatusArea::Availability => "Failed to check availability",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// A single status message with its styling flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == StatusKind::Success
    }
}

/// Nodes currently serving a piece of content, as rendered by the
/// availability panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvailabilityReport {
    pub content_id: String,
    pub nodes: Vec<String>,
}

#[derive(Default)]
struct BoardState {
    statuses: HashMap<StatusArea, Status>,
    metadata_panel: Option<ContentRecord>,
    availability_panel: Option<AvailabilityReport>,
    metrics: NetworkMetrics,
    metrics_refreshes: u64,
}

/// Shared view of all statuses, panels, and dashboard counters.
#[derive(Clone, Default)]
pub struct StatusBoard {
    inner: Arc<RwLock<BoardState>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn status(&self, area: StatusArea) -> Option<Status> {
        self.inner.read().await.statuses.get(&area).cloned()
    }

    pub async fn metadata_panel(&self) -> Option<ContentRecord> {
        self.inner.read().await.metadata_panel.clone()
    }

    pub async fn availability_panel(&self) -> Option<AvailabilityReport> {
        self.inner.read().await.availability_panel.clone()
    }

    pub async fn metrics(&self) -> NetworkMetrics {
        self.inner.read().await.metrics
    }

    /// How many times the dashboard counters have been refreshed.
    pub async fn metrics_refreshes(&self) -> u64 {
        self.inner.read().await.metrics_refreshes
    }

    pub(crate) async fn set_status(&self, area: StatusArea, status: Status) {
        self.inner.write().await.statuses.insert(area, status);
    }

    pub(crate) async fn show_metadata(&self, record: ContentRecord) {
        self.inner.write().await.metadata_panel = Some(record);
    }

    pub(crate) async fn show_availability(&self, report: AvailabilityReport) {
        self.inner.write().await.availability_panel = Some(report);
    }

    pub(crate) async fn record_metrics(&self, metrics: NetworkMetrics) {
        let mut state = self.inner.write().await;
        state.metrics = metrics;
        state.metrics_refreshes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn later_status_overwrites_earlier() {
        let board = StatusBoard::new();
        board
            .set_status(StatusArea::Upload, Status::success("Reading file..."))
            .await;
        board
            .set_status(StatusArea::Upload, Status::error("Upload failed: io error"))
            .await;

        let visible = board.status(StatusArea::Upload).await.unwrap();
        assert_eq!(visible.kind, StatusKind::Error);
        assert!(visible.message.starts_with("Upload failed"));
        assert!(board.status(StatusArea::Download).await.is_none());
    }

    #[tokio::test]
    async fn metrics_refreshes_count_each_update() {
        let board = StatusBoard::new();
        assert_eq!(board.metrics_refreshes().await, 0);
        board.record_metrics(NetworkMetrics::default()).await;
        board.record_metrics(NetworkMetrics::default()).await;
        assert_eq!(board.metrics_refreshes().await, 2);
    }
}
