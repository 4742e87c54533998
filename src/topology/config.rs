use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::routing::table::{Destination, RoutingTable};

const DEFAULT_FORWARD_TIMEOUT_MS: u64 = 500;

fn default_forward_timeout_ms() -> u64 {
    DEFAULT_FORWARD_TIMEOUT_MS
}

/// One child descriptor: where a subtree is reachable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildNode {
    pub ip: String,
    pub port: u16,
}

impl ChildNode {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}

/// Destination of one bucket, as written in the topology file.
///
/// Serialized externally tagged: `"local"` or `{"child": 1}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteTarget {
    Local,
    Child(usize),
}

/// One routing rule: which destination a partition bucket belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSpec {
    pub bucket: u32,
    pub target: RouteTarget,
}

/// This node's static position in the tree, loaded once at startup.
///
/// Example file for a node with two children, where buckets 0..=2 belong to
/// child 0's subtree and bucket 3 to child 1:
///
/// ```json
/// {
///   "total_partitions": 4,
///   "children": [
///     { "ip": "127.0.0.1", "port": 50052 },
///     { "ip": "127.0.0.1", "port": 50053 }
///   ],
///   "routes": [
///     { "bucket": 0, "target": { "child": 0 } },
///     { "bucket": 1, "target": { "child": 0 } },
///     { "bucket": 2, "target": { "child": 0 } },
///     { "bucket": 3, "target": { "child": 1 } }
///   ]
/// }
/// ```
///
/// A leaf node omits `children` and `routes` entirely and keeps every bucket
/// local.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyConfig {
    /// Total partition buckets across the whole tree. Every node must agree
    /// on this value or routing diverges.
    pub total_partitions: u32,
    /// Ordered child descriptors. Empty for leaf nodes.
    #[serde(default)]
    pub children: Vec<ChildNode>,
    /// Explicit bucket routes. Required when `children` is non-empty; when
    /// both are absent every bucket rests locally.
    #[serde(default)]
    pub routes: Vec<RouteSpec>,
    /// Per-call deadline for forwarding to a child, in milliseconds.
    #[serde(default = "default_forward_timeout_ms")]
    pub forward_timeout_ms: u64,
}

impl TopologyConfig {
    /// Loads the topology file. Fatal on missing file or malformed JSON.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Malformed {
            path: path.to_string(),
            source,
        })
    }

    /// Compiles and validates the routing table for this node.
    ///
    /// Must succeed before the router is constructed; any error here is fatal
    /// at startup and never retried.
    pub fn build_routing_table(&self) -> Result<RoutingTable, ConfigError> {
        if self.routes.is_empty() {
            if !self.children.is_empty() {
                return Err(ConfigError::MissingRoutes {
                    fan_out: self.children.len(),
                });
            }
            return RoutingTable::local_only(self.total_partitions);
        }

        let routes: Vec<(u32, Destination)> = self
            .routes
            .iter()
            .map(|route| {
                let destination = match route.target {
                    RouteTarget::Local => Destination::Local,
                    RouteTarget::Child(child) => Destination::Child(child),
                };
                (route.bucket, destination)
            })
            .collect();

        RoutingTable::from_routes(self.total_partitions, self.children.len(), &routes)
    }

    pub fn forward_timeout(&self) -> Duration {
        Duration::from_millis(self.forward_timeout_ms)
    }
}
