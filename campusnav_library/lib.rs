//! # CampusNav Library
//!
//! Domain library for the CampusNav navigation engine.
//!
//! ## Structure
//!
//! ```text
//! campusnav_library/
//! ── algorithms/     # Pure computation: graph store, pathfinding, instructions
//! ── messages/       # Plain data types exchanged between components
//! ── nodes/          # Stateful components: estimator, tracker, navigator
//! ── maps/           # Built-in campus graph definition
//! ── apps/           # Demo applications
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use campusnav_library::{maps, Navigator, Pathfinder};
//!
//! let graph = Arc::new(maps::campus()?);
//! let pathfinder = Pathfinder::new(graph.clone());
//! let route = pathfinder.find_path("main gate", "library")?;
//! ```

pub mod algorithms;
pub mod maps;
pub mod messages;
pub mod nodes;

// Re-export message types at the crate root for convenience
pub use messages::*;

// Re-export the core building blocks
pub use algorithms::graph::{CampusGraph, Edge, GraphDefinition, NavNode, NodeKind};
pub use algorithms::instructions::Glyph;
pub use algorithms::pathfinding::{Pathfinder, Route, RouteStep};
pub use nodes::{
    EstimatorConfig, FrameSource, LocationClassifier, LocationEstimator, Navigator,
    ObstacleDetector, ObstacleSampler, RouteProgress, RouteProgressTracker,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::graph::CampusGraph;
    pub use crate::algorithms::instructions::{edge_instruction, Glyph};
    pub use crate::algorithms::pathfinding::{Pathfinder, Route, RouteStep};
    pub use crate::messages::{Detection, Frame, LocationEstimate, LocationSample};
    pub use crate::nodes::{
        EstimatorConfig, FrameSource, LocationClassifier, LocationEstimator, NavUpdate,
        Navigator, ObstacleDetector, ObstacleSampler, RouteProgress, RouteProgressTracker,
    };
    pub use campusnav_core::{NavError, NavResult};
}
