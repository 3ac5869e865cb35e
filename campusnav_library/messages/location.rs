use serde::{Deserialize, Serialize};

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// One classification result from the external classifier collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    /// Class label, in the classifier's own vocabulary (not yet normalized
    /// to graph ids).
    pub label: String,
    /// Class probability in [0, 1].
    pub probability: f64,
}

impl LocationSample {
    pub fn new(label: impl Into<String>, probability: f64) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }
}

/// The engine's belief about the user's current node.
///
/// Replaced atomically as a whole value once per accepted poll cycle; never
/// partially updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationEstimate {
    /// Canonical graph node id.
    pub node_id: String,
    /// Confidence of the accepting sample, in [0, 1].
    pub confidence: f64,
    /// Milliseconds since the Unix epoch.
    pub stamp_ms: u64,
}

impl LocationEstimate {
    /// Create an estimate stamped with the current time.
    pub fn new(node_id: impl Into<String>, confidence: f64) -> Self {
        Self {
            node_id: node_id.into(),
            confidence,
            stamp_ms: now_ms(),
        }
    }

    /// Create an estimate with an explicit timestamp.
    pub fn with_timestamp(node_id: impl Into<String>, confidence: f64, stamp_ms: u64) -> Self {
        Self {
            node_id: node_id.into(),
            confidence,
            stamp_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_estimate_is_stamped() {
        let estimate = LocationEstimate::new("library", 0.92);
        assert_eq!(estimate.node_id, "library");
        assert_relative_eq!(estimate.confidence, 0.92);
        assert!(estimate.stamp_ms > 0);
    }

    #[test]
    fn test_estimate_with_timestamp() {
        let estimate = LocationEstimate::with_timestamp("canteen", 0.8, 123456789);
        assert_eq!(estimate.stamp_ms, 123456789);
    }
}
