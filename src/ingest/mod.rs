//! Ingest Module
//!
//! The service boundary of a node. Exposes the two submission operations
//! (unary and streamed) over HTTP, decodes records, hands each one to the
//! routing layer exactly once, and acknowledges the caller.
//!
//! The runtime dispatches each unary call and each stream to its own task;
//! within one stream records are processed strictly sequentially.

pub mod handlers;
pub mod protocol;

#[cfg(test)]
mod tests;
