//! Partition-and-Route Module
//!
//! Decides where every record rests, and gets it there.
//!
//! ## Core Concepts
//! - **Partitioning**: every record maps to a bucket in `[0, total_partitions)`
//!   via a fixed, documented hash over its two key fields. Every node in the
//!   tree computes the identical bucket for the identical record.
//! - **Routing table**: a static, exhaustive, disjoint mapping from buckets to
//!   destinations (this node, or one child subtree). Compiled once at startup
//!   from the topology configuration.
//! - **Forwarding**: a synchronous, at-most-once delivery of the full record
//!   to the chosen child, using the same ingest contract this node serves.

pub mod partition;
pub mod router;
pub mod table;
