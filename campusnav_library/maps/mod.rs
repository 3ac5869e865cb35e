//! Bundled campus maps
//!
//! Graph definitions shipped with the library. The campus fixture is the
//! map the demo app and the integration tests run against; deployments
//! with their own floor plans load a [`GraphDefinition`] from disk instead.

use campusnav_core::error::NavResult;

use crate::algorithms::graph::CampusGraph;

/// Default campus map, embedded at compile time.
pub const CAMPUS_MAP_JSON: &str = include_str!("campus.json");

/// Build the bundled campus graph.
pub fn campus() -> NavResult<CampusGraph> {
    CampusGraph::from_json_str(CAMPUS_MAP_JSON)
}
