//! Static routing table: partition bucket -> destination.
//!
//! The table is compiled once at startup from the topology configuration and
//! never changes afterwards. It is dense (one entry per bucket), which makes
//! it exhaustive and disjoint by construction: every bucket maps to exactly
//! one destination, and lookup on the hot path is a bounds-checked index.

use crate::error::ConfigError;

/// Where a record rests: on this node, or in one child's subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Insert into this node's local store.
    Local,
    /// Forward to the child at this index in the topology's child list.
    Child(usize),
}

/// Dense bucket-to-destination mapping.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    targets: Vec<Destination>,
}

impl RoutingTable {
    /// Table for a node with no children: every bucket rests locally.
    ///
    /// This is the degenerate N-way local-sharding case, where each node of a
    /// flat deployment owns its disjoint subset of buckets with no forwarding.
    pub fn local_only(total_partitions: u32) -> Result<Self, ConfigError> {
        if total_partitions == 0 {
            return Err(ConfigError::NoPartitions);
        }
        Ok(Self {
            targets: vec![Destination::Local; total_partitions as usize],
        })
    }

    /// Compiles an explicit route list into a dense table.
    ///
    /// Fails if any bucket is out of range, routed twice, or not routed at
    /// all, or if a route names a child index `>= fan_out`.
    pub fn from_routes(
        total_partitions: u32,
        fan_out: usize,
        routes: &[(u32, Destination)],
    ) -> Result<Self, ConfigError> {
        if total_partitions == 0 {
            return Err(ConfigError::NoPartitions);
        }

        let mut targets: Vec<Option<Destination>> = vec![None; total_partitions as usize];
        for &(bucket, destination) in routes {
            if bucket >= total_partitions {
                return Err(ConfigError::BucketOutOfRange {
                    bucket,
                    total_partitions,
                });
            }
            if let Destination::Child(child) = destination {
                if child >= fan_out {
                    return Err(ConfigError::InsufficientChildren {
                        bucket,
                        child,
                        fan_out,
                    });
                }
            }
            let slot = &mut targets[bucket as usize];
            if slot.is_some() {
                return Err(ConfigError::DuplicateBucket { bucket });
            }
            *slot = Some(destination);
        }

        let targets = targets
            .into_iter()
            .enumerate()
            .map(|(bucket, slot)| {
                slot.ok_or(ConfigError::UnmappedBucket {
                    bucket: bucket as u32,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { targets })
    }

    /// Number of buckets this table covers.
    pub fn total_partitions(&self) -> u32 {
        self.targets.len() as u32
    }

    /// Destination for a bucket. Hot path; no allocation.
    pub fn target(&self, bucket: u32) -> Destination {
        self.targets[bucket as usize]
    }
}
