//! Error taxonomy for the routing core.
//!
//! Two classes of failure exist in this system:
//! - [`ConfigError`]: fatal at startup. The process must not begin serving
//!   with a broken topology.
//! - [`ForwardError`]: recoverable locally. Logged and counted, the record is
//!   dropped from that path, and the in-flight client request still succeeds.

use thiserror::Error;

/// Errors raised while loading or validating the topology configuration.
///
/// All of these are fatal: they are reported once at startup and the process
/// exits before binding the listener.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The topology file could not be read.
    #[error("could not open topology configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The topology file is not valid JSON (or does not match the schema).
    #[error("topology configuration file '{path}' is malformed: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// `total_partitions` must be at least 1; partitioning modulo zero is
    /// undefined.
    #[error("total_partitions must be at least 1")]
    NoPartitions,

    /// A route references a child index the topology does not define.
    #[error("insufficient child nodes defined in topology: route for bucket {bucket} names child {child}, but only {fan_out} children are configured")]
    InsufficientChildren {
        bucket: u32,
        child: usize,
        fan_out: usize,
    },

    /// A route names a bucket outside `[0, total_partitions)`.
    #[error("route bucket {bucket} is outside [0, {total_partitions})")]
    BucketOutOfRange { bucket: u32, total_partitions: u32 },

    /// Two routes claim the same bucket; destinations must be disjoint.
    #[error("bucket {bucket} is routed to more than one destination")]
    DuplicateBucket { bucket: u32 },

    /// A bucket has no destination; the routing table must be exhaustive.
    #[error("bucket {bucket} has no route")]
    UnmappedBucket { bucket: u32 },

    /// A node that has children must say which buckets go where.
    #[error("topology defines {fan_out} children but no routes")]
    MissingRoutes { fan_out: usize },
}

/// Errors raised while delivering a record to a child node.
///
/// Forwarding is at-most-once: a failed delivery is reported and the record is
/// dropped from that path, never requeued or retried.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The child could not be reached (connect failure, timeout, ...).
    #[error("forwarding to child {child} failed: {source}")]
    Unreachable {
        child: usize,
        #[source]
        source: reqwest::Error,
    },

    /// The child answered with a non-success HTTP status.
    #[error("child {child} rejected the record with status {status}")]
    Rejected {
        child: usize,
        status: reqwest::StatusCode,
    },
}
