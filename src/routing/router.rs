use super::partition::partition;
use super::table::{Destination, RoutingTable};
use crate::client::IngestClient;
use crate::error::ForwardError;
use crate::ingest::protocol::CollisionRecord;

/// Combines the partition function with the static routing table and executes
/// delivery to child subtrees.
///
/// From this node's perspective a child is just another implementor of the
/// ingest contract: delivery is a unary `/submit` call carrying the full
/// record, and the child runs the identical stack, so a record may cross
/// several hops before resting.
pub struct ForwardingRouter {
    table: RoutingTable,
    children: Vec<IngestClient>,
}

impl ForwardingRouter {
    /// Builds a router from a compiled table and one client per child.
    ///
    /// The table is validated against the child list at configuration time,
    /// so every `Destination::Child` index it can produce is in range.
    pub fn new(table: RoutingTable, children: Vec<IngestClient>) -> Self {
        Self { table, children }
    }

    /// Decides where a record rests. Pure; no I/O.
    pub fn route(&self, record: &CollisionRecord) -> Destination {
        let bucket = partition(
            record.crash_date,
            record.crash_time,
            self.table.total_partitions(),
        );
        self.table.target(bucket)
    }

    /// Delivers a record to the chosen child: one synchronous attempt with
    /// the configured per-call deadline, no retries (at-most-once).
    pub async fn deliver(&self, record: &CollisionRecord, child: usize) -> Result<(), ForwardError> {
        match self.children[child].submit(record).await {
            Ok(_ack) => Ok(()),
            Err(source) => match source.status() {
                Some(status) => Err(ForwardError::Rejected { child, status }),
                None => Err(ForwardError::Unreachable { child, source }),
            },
        }
    }

    /// Number of children this node forwards to.
    pub fn fan_out(&self) -> usize {
        self.children.len()
    }

    /// Base URL of a child, for logging.
    pub fn child_url(&self, child: usize) -> &str {
        self.children[child].base_url()
    }
}
