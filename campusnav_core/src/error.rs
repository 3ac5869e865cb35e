//! Error taxonomy for the CampusNav engine.
//!
//! Structural errors (`UnknownNode`, `Integrity`) are surfaced to callers as
//! failure values. Transient sampling failures (`ClassifierUnavailable`) are
//! absorbed inside the polling loops and never interrupt them. "No path
//! found" is a routine graph outcome, not an error: path queries return
//! `Ok(None)` for it.

use thiserror::Error;

/// Result alias used across the engine.
pub type NavResult<T> = Result<T, NavError>;

/// Engine-wide error type.
#[derive(Error, Debug)]
pub enum NavError {
    /// A node id was requested that does not exist in the graph.
    #[error("Unknown node: '{0}'")]
    UnknownNode(String),

    /// A graph definition references a node that is not in the node set.
    /// Fatal at load time; the engine must not start on such a graph.
    #[error("Graph integrity: node '{node}' references missing node '{target}'")]
    Integrity { node: String, target: String },

    /// The external classifier failed or produced an unusable sample.
    /// Recovered locally by retaining the previous estimate.
    #[error("Classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    /// Malformed configuration (graph definition, model bundle, ...).
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O failure while loading configuration or assets.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unexpected internal condition.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl NavError {
    /// Create a configuration error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        NavError::Config(msg.into())
    }

    /// Create an internal error from any displayable message.
    pub fn internal(msg: impl Into<String>) -> Self {
        NavError::Internal(msg.into())
    }
}
