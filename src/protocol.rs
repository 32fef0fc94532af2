//! Wire contract toward the dCDN backend.
//!
//! Requests and responses travel as a query/mutation style envelope
//! over a single endpoint. The simulated backend speaks exactly this
//! contract, so swapping in a chain-backed transport is a matter of
//! replacing the task behind the channel.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Metadata describing an uploaded piece of content. Immutable once
/// constructed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentMetadata {
    pub name: String,
    /// Content size in bytes.
    pub size: u64,
    pub content_type: String,
    pub owner: String,
    /// Unix timestamp in seconds.
    pub created_at: u64,
    pub expires_at: Option<u64>,
    /// Hash of the content for integrity verification. Assigned by the
    /// backend, never by the client.
    pub content_hash: Option<String>,
}

/// A content record as returned by a metadata query.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentRecord {
    pub id: String,
    #[serde(flatten)]
    pub metadata: ContentMetadata,
}

/// A node joining the network with its identifier, location, and
/// storage capacity in bytes.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeRegistration {
    pub node_id: String,
    pub location: String,
    pub capacity: u64,
}

/// Network-wide counters displayed on the console dashboard.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkMetrics {
    pub node_count: u64,
    pub total_capacity: u64,
    pub total_data_served: u64,
    pub content_count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Upload {
        content: Vec<u8>,
        metadata: ContentMetadata,
    },
    Download {
        content_id: String,
    },
    GetContentMetadata {
        content_id: String,
    },
    RegisterNode {
        #[serde(flatten)]
        registration: NodeRegistration,
    },
    GetContentNodes {
        content_id: String,
    },
    GetMetrics,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Response {
    Uploaded {
        content_id: String,
    },
    Downloaded {
        content_id: String,
    },
    Metadata {
        record: ContentRecord,
    },
    NodeRegistered {
        node_id: String,
    },
    ContentNodes {
        content_id: String,
        nodes: Vec<String>,
    },
    Metrics {
        metrics: NetworkMetrics,
    },
    Error {
        message: String,
    },
}

/// Current wall-clock time as unix seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_envelope_carries_operation_tag() {
        let request = Request::Download {
            content_id: "abc".to_string(),
        };
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded["op"], "download");
        assert_eq!(encoded["content_id"], "abc");
    }

    #[test]
    fn register_node_envelope_flattens_the_registration() {
        let request = Request::RegisterNode {
            registration: NodeRegistration {
                node_id: "edge-ams-01".to_string(),
                location: "eu-west".to_string(),
                capacity: 1_073_741_824,
            },
        };
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded["op"], "register_node");
        assert_eq!(encoded["node_id"], "edge-ams-01");
        assert_eq!(encoded["capacity"], 1_073_741_824u64);
    }

    #[test]
    fn content_record_flattens_metadata_fields() {
        let record = ContentRecord {
            id: "id-1".to_string(),
            metadata: ContentMetadata {
                name: "report".to_string(),
                size: 512,
                content_type: "application/pdf".to_string(),
                owner: "alice".to_string(),
                created_at: 1_700_000_000,
                expires_at: None,
                content_hash: None,
            },
        };
        let encoded = serde_json::to_value(&record).unwrap();
        assert_eq!(encoded["id"], "id-1");
        assert_eq!(encoded["name"], "report");
        assert_eq!(encoded["size"], 512);
    }
}
