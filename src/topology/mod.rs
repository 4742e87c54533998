//! Topology Module
//!
//! Static description of this node's position in the processing tree: an
//! ordered list of child addresses, the partition count, and the explicit
//! routing table. Constructed once at startup from a JSON file; immutable for
//! the process lifetime. No runtime topology changes.

pub mod config;
