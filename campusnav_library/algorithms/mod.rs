//! Pure computational algorithms for campus navigation
//!
//! This module contains pure algorithmic implementations with no I/O
//! dependencies. All algorithms are fully tested and reusable across nodes
//! and applications.
//!
//! # Available Algorithms
//!
//! - **graph**: the immutable campus waypoint graph and its definition format
//! - **pathfinding**: uniform-cost shortest-path search producing routes
//! - **instructions**: edge-to-instruction mapping and AR glyph selection

pub mod graph;
pub mod instructions;
pub mod pathfinding;
