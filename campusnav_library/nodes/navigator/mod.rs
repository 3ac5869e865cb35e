//! Navigator - route lifecycle over the location stream
//!
//! Session object tying the engine together: plans a route when a
//! destination is set, follows current-node updates through the progress
//! tracker, and replans from the new current node when the user diverges
//! from the active route. Holds no search logic of its own; planning is
//! delegated to the pathfinder.

use std::sync::Arc;

use campusnav_core::error::NavResult;

use super::route_progress::{RouteProgress, RouteProgressTracker};
use crate::algorithms::graph::CampusGraph;
use crate::algorithms::instructions::ARRIVED_INSTRUCTION;
use crate::algorithms::pathfinding::{Pathfinder, Route};
use crate::messages::LocationEstimate;

/// Result of feeding one location update into the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavUpdate {
    /// No destination set; nothing to track.
    Idle,
    /// Still on the active route.
    OnRoute { steps_remaining: usize },
    /// Reached the destination.
    Arrived,
    /// Diverged and a fresh route was computed from the new current node.
    Replanned,
    /// Diverged and no route exists from the new current node.
    Unreachable,
}

/// Navigation session over a shared campus graph.
pub struct Navigator {
    pathfinder: Pathfinder,
    current_node: String,
    destination: Option<String>,
    tracker: Option<RouteProgressTracker>,
}

impl Navigator {
    /// Create a session positioned at `start_node`.
    pub fn new(graph: Arc<CampusGraph>, start_node: &str) -> NavResult<Self> {
        let current_node = graph
            .canonical_id(start_node)
            .ok_or_else(|| {
                campusnav_core::NavError::UnknownNode(start_node.to_string())
            })?
            .to_string();

        Ok(Self {
            pathfinder: Pathfinder::new(graph),
            current_node,
            destination: None,
            tracker: None,
        })
    }

    /// Believed current node.
    pub fn current_node(&self) -> &str {
        &self.current_node
    }

    /// Active route, if a destination is set and reachable.
    pub fn route(&self) -> Option<&Route> {
        self.tracker.as_ref().map(|t| t.route())
    }

    /// Instruction to present right now: the upcoming turn while en route,
    /// the arrival announcement at the destination, none when idle.
    pub fn current_instruction(&self) -> Option<&str> {
        let tracker = self.tracker.as_ref()?;
        match tracker.upcoming_instruction() {
            Some(instruction) => Some(instruction),
            None => Some(ARRIVED_INSTRUCTION),
        }
    }

    /// Plan a route from the current node to `destination`.
    ///
    /// Returns the route, or `None` when the destination is valid but
    /// unreachable (the destination is remembered either way, so a later
    /// location change can retry).
    pub fn set_destination(&mut self, destination: &str) -> NavResult<Option<&Route>> {
        let route = self.pathfinder.find_path(&self.current_node, destination)?;
        // find_path validated the id; remember the canonical form.
        let canonical = self
            .pathfinder
            .graph()
            .canonical_id(destination)
            .unwrap_or(destination)
            .to_string();
        self.destination = Some(canonical);

        self.tracker = route.map(RouteProgressTracker::new);
        Ok(self.tracker.as_ref().map(|t| t.route()))
    }

    /// Drop the destination and active route.
    pub fn clear_destination(&mut self) {
        self.destination = None;
        self.tracker = None;
    }

    /// Consume one location update, replanning on divergence.
    pub fn on_location_update(&mut self, estimate: &LocationEstimate) -> NavResult<NavUpdate> {
        self.current_node = estimate.node_id.clone();

        let Some(destination) = self.destination.clone() else {
            return Ok(NavUpdate::Idle);
        };
        let Some(tracker) = self.tracker.as_mut() else {
            // Destination previously unreachable; retry from the new node.
            return self.replan(&destination);
        };

        match tracker.observe(&estimate.node_id) {
            RouteProgress::OnRoute { steps_remaining } => {
                Ok(NavUpdate::OnRoute { steps_remaining })
            }
            RouteProgress::Arrived => Ok(NavUpdate::Arrived),
            RouteProgress::Diverged => {
                tracing::info!(
                    node = %estimate.node_id,
                    destination = %destination,
                    "diverged from route, replanning"
                );
                self.replan(&destination)
            }
        }
    }

    fn replan(&mut self, destination: &str) -> NavResult<NavUpdate> {
        match self.pathfinder.find_path(&self.current_node, destination)? {
            Some(route) => {
                self.tracker = Some(RouteProgressTracker::new(route));
                Ok(NavUpdate::Replanned)
            }
            None => {
                tracing::warn!(
                    node = %self.current_node,
                    destination = %destination,
                    "no route from current node"
                );
                self.tracker = None;
                Ok(NavUpdate::Unreachable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // main gate -> admin block -> library, with a detour room off-route and
    // a disconnected island.
    const CAMPUS: &str = r#"{
        "main gate": {"name": "Main Gate", "type": "entrance", "connections": [
            {"nodeId": "admin block", "direction": "straight", "distance": 100}
        ]},
        "admin block": {"name": "Admin Block", "type": "room", "connections": [
            {"nodeId": "main gate", "direction": "straight", "distance": 100},
            {"nodeId": "library", "direction": "right", "distance": 30},
            {"nodeId": "auditorium", "direction": "left", "distance": 20}
        ]},
        "library": {"name": "Library", "type": "room", "connections": [
            {"nodeId": "admin block", "direction": "right", "distance": 30}
        ]},
        "auditorium": {"name": "Auditorium", "type": "room", "connections": [
            {"nodeId": "admin block", "direction": "back", "distance": 20}
        ]},
        "island": {"name": "Island", "type": "outdoor", "connections": []}
    }"#;

    fn navigator() -> Navigator {
        let graph = Arc::new(CampusGraph::from_json_str(CAMPUS).unwrap());
        Navigator::new(graph, "main gate").unwrap()
    }

    fn at(node: &str) -> LocationEstimate {
        LocationEstimate::new(node, 0.9)
    }

    #[test]
    fn test_follows_route_to_arrival() {
        let mut nav = navigator();
        let route = nav.set_destination("library").unwrap().unwrap();
        assert_eq!(route.steps.len(), 3);

        assert_eq!(
            nav.on_location_update(&at("main gate")).unwrap(),
            NavUpdate::OnRoute { steps_remaining: 2 }
        );
        assert_eq!(nav.current_instruction(), Some("Go straight"));

        assert_eq!(
            nav.on_location_update(&at("admin block")).unwrap(),
            NavUpdate::OnRoute { steps_remaining: 1 }
        );
        assert_eq!(nav.current_instruction(), Some("Go right"));

        assert_eq!(
            nav.on_location_update(&at("library")).unwrap(),
            NavUpdate::Arrived
        );
        assert_eq!(nav.current_instruction(), Some(ARRIVED_INSTRUCTION));
    }

    #[test]
    fn test_divergence_triggers_replan() {
        let mut nav = navigator();
        nav.set_destination("library").unwrap();
        nav.on_location_update(&at("admin block")).unwrap();

        // Wandered into the auditorium, which is not on the route.
        assert_eq!(
            nav.on_location_update(&at("auditorium")).unwrap(),
            NavUpdate::Replanned
        );
        let route = nav.route().unwrap();
        let ids: Vec<&str> = route.steps.iter().map(|s| s.node_id.as_str()).collect();
        assert_eq!(ids, ["auditorium", "admin block", "library"]);
    }

    #[test]
    fn test_unreachable_destination() {
        let mut nav = navigator();
        assert!(nav.set_destination("island").unwrap().is_none());
        assert!(nav.route().is_none());
        assert_eq!(
            nav.on_location_update(&at("admin block")).unwrap(),
            NavUpdate::Unreachable
        );
    }

    #[test]
    fn test_idle_without_destination() {
        let mut nav = navigator();
        assert_eq!(
            nav.on_location_update(&at("admin block")).unwrap(),
            NavUpdate::Idle
        );
        assert_eq!(nav.current_node(), "admin block");
        assert_eq!(nav.current_instruction(), None);
    }

    #[test]
    fn test_unknown_destination_is_error() {
        let mut nav = navigator();
        assert!(nav.set_destination("observatory").is_err());
    }
}
