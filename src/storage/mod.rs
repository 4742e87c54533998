//! Local Storage Module
//!
//! The node-local resting place for records: an in-memory, append-only
//! sequence behind a mutex. No persistence across restarts and no eviction;
//! lifetime equals process lifetime.

pub mod store;
