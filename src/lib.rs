//! Collision Record Routing Cluster Library
//!
//! This library crate defines the core modules that make up a tree-structured
//! ingest cluster for traffic-collision records. It serves as the foundation
//! for the node binary (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of loosely coupled subsystems:
//!
//! - **`ingest`**: The service boundary. HTTP handlers for unary and streamed
//!   record submission, plus the wire protocol (DTOs and endpoint paths).
//! - **`routing`**: The partition function (a fixed FNV-1a hash), the static
//!   bucket-to-destination routing table, and the forwarding router that
//!   delivers records to child subtrees.
//! - **`storage`**: The node-local record store. An append-only, mutex-guarded
//!   sequence owned exclusively by this process.
//! - **`topology`**: Static cluster configuration. Loaded once at startup and
//!   immutable for the process lifetime.
//! - **`client`**: The outbound side of the ingest contract, used both for
//!   parent-to-child forwarding and by external feeders.
//! - **`node`**: The per-process context object tying the store, the router,
//!   and the counters together.

pub mod client;
pub mod error;
pub mod ingest;
pub mod node;
pub mod routing;
pub mod storage;
pub mod topology;
