//! Campus waypoint graph
//!
//! Immutable, in-memory directed graph of named waypoints and weighted
//! edges. The graph is the source of truth for adjacency: it is built once
//! from a [`GraphDefinition`], validated, and never mutated afterwards, so it
//! can be shared across concurrent readers (wrap in `Arc`) without locking.
//!
//! Edges are directed and are **not** symmetrized: a node may list a
//! neighbor that does not list it back (one-way corridors are legal map
//! authoring). [`CampusGraph::audit_asymmetry`] reports such pairs so map
//! authors can review them.
//!
//! # Example
//!
//! ```rust,ignore
//! use campusnav_library::algorithms::graph::CampusGraph;
//!
//! let graph = CampusGraph::from_json_str(json)?;
//! let edges = graph.neighbors("main gate").unwrap();
//! ```

use std::collections::{BTreeMap, HashMap};

use campusnav_core::error::{NavError, NavResult};
use serde::{Deserialize, Serialize};

/// Physical category of a waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Hallway,
    Room,
    Entrance,
    Stairs,
    Elevator,
    Outdoor,
}

/// Position on the campus map, in percent of map extent (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
}

/// Directed, weighted connection to another waypoint.
///
/// `direction` is an open vocabulary of turn tokens ("straight", "left",
/// "right", "back", "front", "exit", ...); `distance` is a positive weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(rename = "nodeId")]
    pub target: String,
    pub direction: String,
    pub distance: f64,
}

/// One node record in the persisted graph definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<MapPoint>,
    #[serde(default)]
    pub connections: Vec<Edge>,
}

/// Persisted graph format: lowercase node id -> node record.
pub type GraphDefinition = BTreeMap<String, NodeDefinition>;

/// A waypoint with its outgoing edges. Owned exclusively by [`CampusGraph`].
#[derive(Debug, Clone, PartialEq)]
pub struct NavNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub description: String,
    pub coordinates: Option<MapPoint>,
    pub edges: Vec<Edge>,
}

/// Immutable directed waypoint graph. Read-only after load.
#[derive(Debug, Clone)]
pub struct CampusGraph {
    nodes: HashMap<String, NavNode>,
}

impl CampusGraph {
    /// Build a graph from a definition, validating referential integrity.
    ///
    /// Node ids are case-normalized to lowercase keys. Every edge target must
    /// exist in the node set and every edge distance must be positive;
    /// violations fail the load so the engine never starts on a broken map.
    pub fn from_definition(definition: GraphDefinition) -> NavResult<Self> {
        let mut nodes = HashMap::with_capacity(definition.len());

        for (id, record) in definition {
            let id = normalize(&id);
            let edges: Vec<Edge> = record
                .connections
                .into_iter()
                .map(|edge| Edge {
                    target: normalize(&edge.target),
                    ..edge
                })
                .collect();

            nodes.insert(
                id.clone(),
                NavNode {
                    id,
                    name: record.name,
                    kind: record.kind,
                    description: record.description,
                    coordinates: record.coordinates,
                    edges,
                },
            );
        }

        // Integrity walk: every referenced target must be a known node.
        for node in nodes.values() {
            for edge in &node.edges {
                if !nodes.contains_key(&edge.target) {
                    return Err(NavError::Integrity {
                        node: node.id.clone(),
                        target: edge.target.clone(),
                    });
                }
                if edge.distance <= 0.0 {
                    return Err(NavError::Config(format!(
                        "Edge {} -> {} has non-positive distance {}",
                        node.id, edge.target, edge.distance
                    )));
                }
            }
        }

        Ok(Self { nodes })
    }

    /// Build a graph from its JSON definition.
    pub fn from_json_str(json: &str) -> NavResult<Self> {
        let definition: GraphDefinition = serde_json::from_str(json)
            .map_err(|e| NavError::Config(format!("Invalid graph definition: {}", e)))?;
        Self::from_definition(definition)
    }

    /// Export the graph back to its persisted definition form.
    pub fn to_definition(&self) -> GraphDefinition {
        self.nodes
            .values()
            .map(|node| {
                (
                    node.id.clone(),
                    NodeDefinition {
                        name: node.name.clone(),
                        kind: node.kind,
                        description: node.description.clone(),
                        coordinates: node.coordinates,
                        connections: node.edges.clone(),
                    },
                )
            })
            .collect()
    }

    /// Look up a node by id (case-insensitive).
    pub fn node(&self, id: &str) -> Option<&NavNode> {
        self.nodes.get(&normalize(id))
    }

    /// Outgoing edges of a node (case-insensitive id).
    pub fn neighbors(&self, id: &str) -> Option<&[Edge]> {
        self.node(id).map(|n| n.edges.as_slice())
    }

    /// Normalize a free-form label (e.g. a classifier class name) into the
    /// graph's id key space. Returns the canonical id, or `None` when the
    /// label matches no node; callers must treat that as "unavailable"
    /// rather than guessing.
    pub fn canonical_id(&self, label: &str) -> Option<&str> {
        self.nodes.get(&normalize(label)).map(|n| n.id.as_str())
    }

    /// True if the graph contains the given id (case-insensitive).
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(&normalize(id))
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all node ids in sorted order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Report directed edges with no reverse counterpart, sorted for
    /// deterministic output. The graph itself is never altered.
    pub fn audit_asymmetry(&self) -> Vec<(String, String)> {
        let mut findings = Vec::new();
        for node in self.nodes.values() {
            for edge in &node.edges {
                let reverse = self
                    .nodes
                    .get(&edge.target)
                    .map(|t| t.edges.iter().any(|e| e.target == node.id))
                    .unwrap_or(false);
                if !reverse {
                    findings.push((node.id.clone(), edge.target.clone()));
                }
            }
        }
        findings.sort();
        findings
    }
}

fn normalize(id: &str) -> String {
    id.trim().to_lowercase()
}
