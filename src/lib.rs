//! Client-side interaction layer for a decentralized content-delivery
//! network (dCDN) running on a blockchain application platform.
//!
//! The crate validates user input against a static configuration,
//! speaks a typed request/response protocol toward the dCDN backend,
//! and reports results into a status board that a presentation layer
//! renders. The bundled backend is a simulation: it answers every
//! request with a fabricated but plausible reply after a realistic
//! delay, which makes the whole interaction contract exercisable
//! without a deployed chain.

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod protocol;
pub mod session;
pub mod status;

pub use backend::{cancel_pair, BackendHandle, CancelHandle, CancelToken, SimulatedBackend};
pub use config::{AppConfig, ContentConfig, UiConfig, PLACEHOLDER_APP_ID};
pub use controller::{InteractionController, UploadForm};
pub use error::{ClientError, ValidationError};
pub use format::{format_bytes, format_bytes_with};
pub use protocol::{
    ContentMetadata, ContentRecord, NetworkMetrics, NodeRegistration, Request, Response,
};
pub use session::Session;
pub use status::{AvailabilityReport, Status, StatusArea, StatusBoard, StatusKind};
