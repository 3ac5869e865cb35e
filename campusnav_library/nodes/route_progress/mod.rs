//! Route Progress Tracker - arrival and divergence detection
//!
//! Compares current-node updates against the active route. Holds no graph
//! or search logic; it only compares ids. Divergence signals that callers
//! should request a fresh path from the new current node to the original
//! destination.

use crate::algorithms::pathfinding::Route;

/// Relation of the current node to the active route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteProgress {
    /// Current node matches a step of the route; `steps_remaining` counts
    /// the steps still ahead (0 would be arrival, reported separately).
    OnRoute { steps_remaining: usize },
    /// Current node equals the route's final step.
    Arrived,
    /// Current node is not on the route at all; replan required.
    Diverged,
}

/// Tracks progress of the current-node stream along one route.
pub struct RouteProgressTracker {
    route: Route,
    cursor: usize,
}

impl RouteProgressTracker {
    pub fn new(route: Route) -> Self {
        Self { route, cursor: 0 }
    }

    /// The route being tracked.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Index of the last matched step.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Instruction for reaching the next step from the current position, if
    /// any steps remain.
    pub fn upcoming_instruction(&self) -> Option<&str> {
        self.route
            .steps
            .get(self.cursor + 1)
            .map(|s| s.instruction.as_str())
    }

    /// Classify a current-node update against the route.
    pub fn observe(&mut self, node_id: &str) -> RouteProgress {
        let steps = &self.route.steps;

        let Some(position) = steps.iter().position(|s| s.node_id == node_id) else {
            return RouteProgress::Diverged;
        };

        self.cursor = position;
        if position + 1 == steps.len() {
            RouteProgress::Arrived
        } else {
            RouteProgress::OnRoute {
                steps_remaining: steps.len() - 1 - position,
            }
        }
    }
}
