//! Shortest-path search over the campus graph
//!
//! Uniform-cost (Dijkstra) search producing an ordered [`Route`]. Correct
//! for positive edge weights only. The frontier is a binary heap keyed by
//! cumulative distance with an insertion-sequence tiebreak, so repeated
//! queries against the same graph are deterministic.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use campusnav_library::algorithms::pathfinding::Pathfinder;
//!
//! let pathfinder = Pathfinder::new(Arc::new(graph));
//! match pathfinder.find_path("main gate", "library")? {
//!     Some(route) => println!("{} steps", route.steps.len()),
//!     None => println!("no path"),
//! }
//! ```

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::sync::Arc;

use campusnav_core::error::{NavError, NavResult};
use serde::{Deserialize, Serialize};

use super::graph::CampusGraph;
use super::instructions::{edge_instruction, ALREADY_HERE_INSTRUCTION, START_INSTRUCTION};

/// One step of a route: the node to reach and the instruction for reaching
/// it from the previous step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStep {
    pub node_id: String,
    pub instruction: String,
}

/// An ordered sequence of steps from a start node to a destination.
///
/// The first step is always the start node with the [`START_INSTRUCTION`]
/// sentinel (or [`ALREADY_HERE_INSTRUCTION`] for a self-route); consecutive
/// steps are connected by graph edges by construction. Immutable once
/// returned; owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub steps: Vec<RouteStep>,
    pub total_distance: f64,
}

impl Route {
    /// Final node of the route.
    pub fn destination(&self) -> Option<&str> {
        self.steps.last().map(|s| s.node_id.as_str())
    }

    /// Number of steps, including the start step.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True for a route with no steps (never produced by the pathfinder).
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Frontier entry: a candidate path and its cumulative distance.
struct Frontier {
    cost: f64,
    seq: u64,
    node: String,
    steps: Vec<RouteStep>,
}

// Min-ordering by cost, then by insertion sequence. BinaryHeap is a
// max-heap, so comparisons are reversed.
impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.seq == other.seq
    }
}

impl Eq for Frontier {}

/// Single-source shortest-path search over a shared campus graph.
pub struct Pathfinder {
    graph: Arc<CampusGraph>,
}

impl Pathfinder {
    /// Create a pathfinder over a loaded graph.
    pub fn new(graph: Arc<CampusGraph>) -> Self {
        Self { graph }
    }

    /// The graph this pathfinder searches.
    pub fn graph(&self) -> &Arc<CampusGraph> {
        &self.graph
    }

    /// Find the cheapest route from `start` to `end`.
    ///
    /// Returns `Err(NavError::UnknownNode)` if either id is absent,
    /// `Ok(None)` when the destination is unreachable (a routine outcome,
    /// not a failure), and `Ok(Some(route))` otherwise. Pure and
    /// synchronous; no blocking I/O.
    pub fn find_path(&self, start: &str, end: &str) -> NavResult<Option<Route>> {
        let start = self
            .graph
            .canonical_id(start)
            .ok_or_else(|| NavError::UnknownNode(start.to_string()))?
            .to_string();
        let end = self
            .graph
            .canonical_id(end)
            .ok_or_else(|| NavError::UnknownNode(end.to_string()))?
            .to_string();

        // Already at the destination: no search performed.
        if start == end {
            return Ok(Some(Route {
                steps: vec![RouteStep {
                    node_id: start,
                    instruction: ALREADY_HERE_INSTRUCTION.to_string(),
                }],
                total_distance: 0.0,
            }));
        }

        let mut frontier = BinaryHeap::new();
        let mut settled: HashMap<String, f64> = HashMap::new();
        let mut seq: u64 = 0;

        frontier.push(Frontier {
            cost: 0.0,
            seq,
            node: start.clone(),
            steps: vec![RouteStep {
                node_id: start,
                instruction: START_INSTRUCTION.to_string(),
            }],
        });

        while let Some(current) = frontier.pop() {
            // Skip entries obsoleted by a cheaper settled distance.
            if let Some(&best) = settled.get(&current.node) {
                if best <= current.cost {
                    continue;
                }
            }
            settled.insert(current.node.clone(), current.cost);

            // Distances settle in non-decreasing order, so the first
            // expansion of the goal is optimal.
            if current.node == end {
                return Ok(Some(Route {
                    steps: current.steps,
                    total_distance: current.cost,
                }));
            }

            let Some(edges) = self.graph.neighbors(&current.node) else {
                continue;
            };

            for edge in edges {
                let next_cost = current.cost + edge.distance;
                let improves = settled
                    .get(&edge.target)
                    .map_or(true, |&best| next_cost < best);
                if !improves {
                    continue;
                }

                seq += 1;
                let mut steps = current.steps.clone();
                steps.push(RouteStep {
                    node_id: edge.target.clone(),
                    instruction: edge_instruction(&edge.direction),
                });
                frontier.push(Frontier {
                    cost: next_cost,
                    seq,
                    node: edge.target.clone(),
                    steps,
                });
            }
        }

        // Frontier exhausted without reaching the destination.
        Ok(None)
    }
}
