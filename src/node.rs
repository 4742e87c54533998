//! Per-process node context: the one object the service handlers share.
//!
//! Replaces what would otherwise be ambient globals (record counters, child
//! connection handles, the store) with an explicit context constructed once
//! at startup and injected into every handler.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::client::IngestClient;
use crate::error::ConfigError;
use crate::ingest::protocol::{CollisionRecord, StatsResponse};
use crate::routing::router::ForwardingRouter;
use crate::routing::table::Destination;
use crate::storage::store::LocalStore;
use crate::topology::config::TopologyConfig;

/// How often (in records) a progress summary is emitted, both for the global
/// total and per stream.
pub const PROGRESS_INTERVAL: u64 = 10_000;

/// Process-wide totals. Monotonically non-decreasing; mutated only via atomic
/// increment since they are the common contention point under high fan-in,
/// never through a coarser lock.
#[derive(Debug)]
pub struct NodeStats {
    processed: AtomicU64,
    stored_local: AtomicU64,
    forwarded: Vec<AtomicU64>,
}

impl NodeStats {
    pub fn new(fan_out: usize) -> Self {
        Self {
            processed: AtomicU64::new(0),
            stored_local: AtomicU64::new(0),
            forwarded: (0..fan_out).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    pub fn stored_local(&self) -> u64 {
        self.stored_local.load(Ordering::Relaxed)
    }

    /// Successfully forwarded records for one child.
    pub fn forwarded(&self, child: usize) -> u64 {
        self.forwarded[child].load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatsResponse {
        StatsResponse {
            processed: self.processed(),
            stored_local: self.stored_local(),
            forwarded: self
                .forwarded
                .iter()
                .map(|counter| counter.load(Ordering::Relaxed))
                .collect(),
        }
    }
}

/// Everything one node needs to process records: the local store, the
/// forwarding router, and the counters. Shared across handlers as
/// `Arc<NodeContext>`.
pub struct NodeContext {
    pub store: LocalStore,
    pub router: ForwardingRouter,
    pub stats: NodeStats,
}

impl NodeContext {
    /// Builds the context from a validated topology. Fatal on any
    /// configuration error; the process must not serve with a broken table.
    pub fn new(config: &TopologyConfig) -> Result<Self, ConfigError> {
        let table = config.build_routing_table()?;
        let children = config
            .children
            .iter()
            .map(|child| IngestClient::new(&child.addr(), config.forward_timeout()))
            .collect::<Vec<_>>();
        let fan_out = children.len();

        Ok(Self {
            store: LocalStore::new(),
            router: ForwardingRouter::new(table, children),
            stats: NodeStats::new(fan_out),
        })
    }

    /// Routes one record to its resting place: the local store, or one
    /// child's subtree.
    ///
    /// Never fails from the caller's perspective. A failed forward is logged
    /// and the record is dropped from that path (at-most-once, no requeue);
    /// the per-child forwarded counter is only incremented on success, so the
    /// loss stays visible in the stats.
    pub async fn process_record(&self, record: &CollisionRecord) {
        match self.router.route(record) {
            Destination::Local => {
                self.store.insert(record.clone());
                self.stats.stored_local.fetch_add(1, Ordering::Relaxed);
            }
            Destination::Child(child) => match self.router.deliver(record, child).await {
                Ok(()) => {
                    self.stats.forwarded[child].fetch_add(1, Ordering::Relaxed);
                }
                Err(err) => {
                    tracing::error!(
                        "dropping record bound for {}: {}",
                        self.router.child_url(child),
                        err
                    );
                }
            },
        }

        let processed = self.stats.processed.fetch_add(1, Ordering::Relaxed) + 1;
        if processed % PROGRESS_INTERVAL == 0 {
            let snapshot = self.stats.snapshot();
            tracing::info!(
                "processed {} records in total ({} stored locally, {:?} forwarded per child)",
                processed,
                snapshot.stored_local,
                snapshot.forwarded
            );
        }
    }
}
