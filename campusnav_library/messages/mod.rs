//! Message types for the CampusNav engine
//!
//! Plain data exchanged between nodes and their collaborators.
//!
//! - Location: classifier samples and the current-location belief
//! - Vision: camera frames and obstacle detections

pub mod location;
pub mod vision;

pub use location::{LocationEstimate, LocationSample};
pub use vision::{Detection, Frame};
