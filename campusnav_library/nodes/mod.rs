//! Stateful navigation components
//!
//! Nodes wrap the pure algorithms with state, collaborator seams, and
//! polling loops:
//!
//! - **location_estimator**: confidence-gated current-node belief
//! - **route_progress**: arrival/divergence detection over an active route
//! - **navigator**: route lifecycle, replanning on divergence
//! - **obstacle_detector**: sibling sampling loop for obstacle detections

pub mod location_estimator;
pub mod navigator;
pub mod obstacle_detector;
pub mod route_progress;

use crate::messages::Frame;

/// Source of camera frames (an external collaborator).
///
/// Returning `None` signals source loss and stops the consuming loop.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Option<Frame>;
}

pub use location_estimator::{
    BundleClassifier, EstimatorConfig, EstimatorHandle, EstimatorState, LocationClassifier,
    LocationEstimator, SampleVerdict,
};
pub use navigator::{NavUpdate, Navigator};
pub use obstacle_detector::{ObstacleDetector, ObstacleSampler};
pub use route_progress::{RouteProgress, RouteProgressTracker};
