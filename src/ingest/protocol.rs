//! Ingest Wire Protocol
//!
//! Defines the API endpoints and Data Transfer Objects (DTOs) of the ingest
//! contract. The same two operations are served to external feeders and used
//! recursively for parent-to-child forwarding, so a node is both a server (to
//! its callers) and a client (to its children).
//!
//! Records are serialized as JSON. The streamed variant carries one JSON
//! record per line (NDJSON) in a single request body.

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Unary submission: one record per request.
pub const ENDPOINT_SUBMIT: &str = "/submit";
/// Streamed submission: an NDJSON body, one acknowledgment after it ends.
pub const ENDPOINT_SUBMIT_STREAM: &str = "/submit_stream";
/// Counter snapshot for observability.
pub const ENDPOINT_STATS: &str = "/stats";

// --- Data Transfer Objects ---

/// A single traffic-collision report.
///
/// `crash_date` (YYYYMMDD) and `crash_time` (HHMM) are the partition keys;
/// the routing layer reads nothing else. The eight counters are opaque
/// payload as far as routing is concerned, carried unmodified into storage.
/// Records are immutable value types: copied across the wire and into the
/// store, never shared mutably.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionRecord {
    /// Crash date as an integer, e.g. 20230101.
    pub crash_date: i64,
    /// Crash time as an integer, e.g. 800 for 08:00.
    pub crash_time: i64,
    pub persons_injured: u32,
    pub persons_killed: u32,
    pub pedestrians_injured: u32,
    pub pedestrians_killed: u32,
    pub cyclists_injured: u32,
    pub cyclists_killed: u32,
    pub motorists_injured: u32,
    pub motorists_killed: u32,
}

/// Acknowledgment returned for both submission operations.
///
/// For streamed submission the message embeds the count of records processed
/// in that stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
}

/// Snapshot of the node's counters, served at [`ENDPOINT_STATS`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Records this node has processed (stored or forwarded), in total.
    pub processed: u64,
    /// Records resting in this node's local store.
    pub stored_local: u64,
    /// Records successfully forwarded, per child, in topology order.
    pub forwarded: Vec<u64>,
}
