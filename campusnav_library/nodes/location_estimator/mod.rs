//! Location Estimator - confidence-gated current-node belief
//!
//! Polls an external classifier collaborator at a fixed cadence and
//! maintains the engine's belief about the user's current node. A sample
//! only moves the belief when its probability clears the confidence gate
//! (default 0.7); sub-threshold and unmatched samples are kept for
//! diagnostics but never flicker the belief. Transient classifier failures
//! are absorbed by retaining the previous estimate.
//!
//! Lifecycle per activation: `Idle` (constructed) → `Polling` (started with
//! a frame source) → `Stopped` (source loss or cancellation, terminal). A
//! new activation is a fresh estimator with its own cancellation scope.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use campusnav_core::error::{NavError, NavResult};
use campusnav_core::ml::ModelBundle;
use campusnav_core::task::{spawn_poll_loop, PollHandle};
use tokio::sync::watch;

use super::FrameSource;
use crate::algorithms::graph::CampusGraph;
use crate::messages::{Frame, LocationEstimate, LocationSample};

/// External classifier collaborator.
///
/// Must tolerate repeated calls; the estimator guarantees no tighter cadence
/// than its configured poll period and never issues overlapping calls.
/// Returning `None` marks the sample as unavailable.
pub trait LocationClassifier: Send {
    fn classify(&mut self, frame: &Frame) -> Option<LocationSample>;
}

/// Inference function of a model backend: class index plus probability, or
/// `None` when the backend produced no usable prediction.
pub type InferFn = Box<dyn FnMut(&Frame) -> Option<(usize, f64)> + Send>;

/// Classifier backed by a loaded [`ModelBundle`].
///
/// The backend reports a raw class index; the bundle's class-name manifest
/// resolves it to a label. An index outside the manifest counts as
/// unavailable.
pub struct BundleClassifier {
    bundle: ModelBundle,
    infer: InferFn,
}

impl BundleClassifier {
    pub fn new(bundle: ModelBundle, infer: InferFn) -> Self {
        Self { bundle, infer }
    }

    /// The model artifacts backing this classifier.
    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }
}

impl LocationClassifier for BundleClassifier {
    fn classify(&mut self, frame: &Frame) -> Option<LocationSample> {
        let (index, probability) = (self.infer)(frame)?;
        let Some(label) = self.bundle.class_name(index) else {
            tracing::warn!(index, "prediction index outside class manifest");
            return None;
        };
        Some(LocationSample::new(label, probability))
    }
}

/// Estimator lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatorState {
    /// Constructed, not yet polling.
    Idle,
    /// Actively sampling the classifier.
    Polling,
    /// Terminal for this activation.
    Stopped,
}

/// Outcome of processing one classifier sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleVerdict {
    /// Belief replaced.
    Accepted,
    /// Probability did not clear the confidence gate; belief unchanged.
    LowConfidence,
    /// Label matched no graph node; treated as unavailable, never guessed.
    UnknownLabel,
    /// No usable sample this cycle; belief unchanged.
    Unavailable,
}

/// Estimator configuration.
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    /// Node the belief starts at before the first accepted sample.
    pub initial_node: String,
    /// Samples must exceed this probability to move the belief.
    pub confidence_threshold: f64,
    /// Fixed poll cadence.
    pub poll_period: Duration,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            initial_node: "main gate".to_string(),
            confidence_threshold: 0.7,
            poll_period: Duration::from_secs(2),
        }
    }
}

/// Confidence-gated location estimator.
pub struct LocationEstimator {
    graph: Arc<CampusGraph>,
    config: EstimatorConfig,
    estimate_tx: watch::Sender<LocationEstimate>,
    last_rejected: Option<LocationSample>,
}

impl LocationEstimator {
    /// Create an estimator in the `Idle` state.
    ///
    /// The initial node must exist in the graph. Returns the estimator and
    /// the receiver observers use to follow the belief; the estimate value
    /// is always replaced as a whole.
    pub fn new(
        graph: Arc<CampusGraph>,
        config: EstimatorConfig,
    ) -> NavResult<(Self, watch::Receiver<LocationEstimate>)> {
        let initial = graph
            .canonical_id(&config.initial_node)
            .ok_or_else(|| NavError::UnknownNode(config.initial_node.clone()))?
            .to_string();

        let (estimate_tx, estimate_rx) = watch::channel(LocationEstimate::new(initial, 1.0));

        Ok((
            Self {
                graph,
                config,
                estimate_tx,
                last_rejected: None,
            },
            estimate_rx,
        ))
    }

    /// Current belief.
    pub fn current(&self) -> LocationEstimate {
        self.estimate_tx.borrow().clone()
    }

    /// Most recent sample that failed the gate or matched no node, for
    /// diagnostics display only.
    pub fn last_rejected(&self) -> Option<&LocationSample> {
        self.last_rejected.as_ref()
    }

    /// Apply the confidence gate to one poll cycle's sample.
    ///
    /// `None` (classifier failure, degenerate frame) leaves the belief
    /// untouched. A returned sample replaces the belief only if its
    /// probability strictly exceeds the threshold and its label normalizes
    /// to a known graph node.
    pub fn process_sample(&mut self, sample: Option<LocationSample>) -> SampleVerdict {
        let Some(sample) = sample else {
            tracing::debug!("classifier sample unavailable, keeping previous estimate");
            return SampleVerdict::Unavailable;
        };

        if sample.probability <= self.config.confidence_threshold {
            tracing::debug!(
                label = %sample.label,
                probability = sample.probability,
                threshold = self.config.confidence_threshold,
                "sample below confidence gate"
            );
            self.last_rejected = Some(sample);
            return SampleVerdict::LowConfidence;
        }

        let Some(node_id) = self.graph.canonical_id(&sample.label) else {
            tracing::warn!(label = %sample.label, "confident label matches no graph node");
            self.last_rejected = Some(sample);
            return SampleVerdict::UnknownLabel;
        };

        let estimate = LocationEstimate::new(node_id.to_string(), sample.probability);
        tracing::info!(
            node = %estimate.node_id,
            confidence = estimate.confidence,
            "location belief updated"
        );
        let _ = self.estimate_tx.send(estimate);
        SampleVerdict::Accepted
    }

    /// Transition `Idle` → `Polling`: spawn the poll loop.
    ///
    /// Each cycle pulls one frame, requests one classification, and commits
    /// the result through the gate. The loop ends on source loss or
    /// cancellation; a result that completes after cancellation is discarded
    /// without touching the belief.
    pub fn start(
        mut self,
        mut frames: Box<dyn FrameSource>,
        mut classifier: Box<dyn LocationClassifier>,
    ) -> EstimatorHandle {
        let period = self.config.poll_period;
        let handle = spawn_poll_loop("location_estimator", period, move |token| {
            let Some(frame) = frames.next_frame() else {
                tracing::debug!("frame source exhausted, stopping estimator");
                return ControlFlow::Break(());
            };

            let sample = if frame.is_degenerate() {
                tracing::debug!("skipping classification: frame dimensions are 0x0");
                None
            } else {
                classifier.classify(&frame)
            };

            // An in-flight result that races a cancellation is dropped.
            if token.is_cancelled() {
                return ControlFlow::Break(());
            }

            self.process_sample(sample);
            ControlFlow::Continue(())
        });

        EstimatorHandle { handle }
    }
}

/// Owner of a running estimator activation.
pub struct EstimatorHandle {
    handle: PollHandle,
}

impl EstimatorHandle {
    /// Transition to `Stopped`. No belief mutation is observable afterwards.
    pub fn stop(&self) {
        self.handle.cancel();
    }

    /// Current lifecycle state of this activation.
    pub fn state(&self) -> EstimatorState {
        if self.handle.is_cancelled() || self.handle.is_finished() {
            EstimatorState::Stopped
        } else {
            EstimatorState::Polling
        }
    }

    /// Wait for the poll loop to exit.
    pub async fn stopped(self) {
        self.handle.join().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use campusnav_core::task::CancelSource;
    use std::collections::VecDeque;

    const CAMPUS: &str = r#"{
        "main gate": {"name": "Main Gate", "type": "entrance", "connections": [
            {"nodeId": "library", "direction": "straight", "distance": 50}
        ]},
        "library": {"name": "Library", "type": "room", "connections": [
            {"nodeId": "main gate", "direction": "back", "distance": 50},
            {"nodeId": "canteen", "direction": "left", "distance": 20}
        ]},
        "canteen": {"name": "Canteen", "type": "room", "connections": [
            {"nodeId": "library", "direction": "right", "distance": 20}
        ]},
        "admin block": {"name": "Admin Block", "type": "room", "connections": [
            {"nodeId": "main gate", "direction": "straight", "distance": 100}
        ]}
    }"#;

    fn estimator() -> (LocationEstimator, watch::Receiver<LocationEstimate>) {
        let graph = Arc::new(CampusGraph::from_json_str(CAMPUS).unwrap());
        LocationEstimator::new(graph, EstimatorConfig::default()).unwrap()
    }

    /// Replays a scripted list of frames; `None` entries are degenerate
    /// frames, exhaustion ends the source.
    struct ScriptedFrames {
        frames: VecDeque<Option<Frame>>,
    }

    impl ScriptedFrames {
        fn repeating(n: usize) -> Self {
            Self {
                frames: (0..n)
                    .map(|_| Some(Frame::new(640, 480, Vec::new())))
                    .collect(),
            }
        }
    }

    impl FrameSource for ScriptedFrames {
        fn next_frame(&mut self) -> Option<Frame> {
            self.frames.pop_front().flatten()
        }
    }

    /// Replays a scripted list of classification results.
    struct ScriptedClassifier {
        samples: VecDeque<Option<LocationSample>>,
    }

    impl LocationClassifier for ScriptedClassifier {
        fn classify(&mut self, _frame: &Frame) -> Option<LocationSample> {
            self.samples.pop_front().flatten()
        }
    }

    #[test]
    fn test_confidence_gate_sequence() {
        let (mut est, _rx) = estimator();

        // 0.9 "library" accepted, 0.5 "canteen" rejected, 0.95 "admin block"
        // accepted. The low-confidence sample must never surface.
        assert_eq!(
            est.process_sample(Some(LocationSample::new("library", 0.9))),
            SampleVerdict::Accepted
        );
        assert_eq!(est.current().node_id, "library");

        assert_eq!(
            est.process_sample(Some(LocationSample::new("canteen", 0.5))),
            SampleVerdict::LowConfidence
        );
        assert_eq!(est.current().node_id, "library");
        assert_eq!(est.last_rejected().unwrap().label, "canteen");

        assert_eq!(
            est.process_sample(Some(LocationSample::new("admin block", 0.95))),
            SampleVerdict::Accepted
        );
        assert_eq!(est.current().node_id, "admin block");
        assert_relative_eq!(est.current().confidence, 0.95);
    }

    #[test]
    fn test_threshold_is_strict() {
        let (mut est, _rx) = estimator();
        assert_eq!(
            est.process_sample(Some(LocationSample::new("library", 0.7))),
            SampleVerdict::LowConfidence
        );
        assert_eq!(est.current().node_id, "main gate");
    }

    #[test]
    fn test_unavailable_sample_keeps_belief() {
        let (mut est, _rx) = estimator();
        est.process_sample(Some(LocationSample::new("library", 0.9)));

        assert_eq!(est.process_sample(None), SampleVerdict::Unavailable);
        assert_eq!(est.current().node_id, "library");
    }

    #[test]
    fn test_unmatched_label_never_guessed() {
        let (mut est, _rx) = estimator();
        assert_eq!(
            est.process_sample(Some(LocationSample::new("observatory", 0.99))),
            SampleVerdict::UnknownLabel
        );
        assert_eq!(est.current().node_id, "main gate");
    }

    #[test]
    fn test_label_case_normalized_on_accept() {
        let (mut est, _rx) = estimator();
        est.process_sample(Some(LocationSample::new("Admin Block", 0.9)));
        assert_eq!(est.current().node_id, "admin block");
    }

    #[test]
    fn test_unknown_initial_node_rejected() {
        let graph = Arc::new(CampusGraph::from_json_str(CAMPUS).unwrap());
        let config = EstimatorConfig {
            initial_node: "observatory".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            LocationEstimator::new(graph, config),
            Err(NavError::UnknownNode(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_updates_belief_at_cadence() {
        let (est, rx) = estimator();

        let classifier = ScriptedClassifier {
            samples: VecDeque::from(vec![
                Some(LocationSample::new("library", 0.9)),
                Some(LocationSample::new("canteen", 0.5)),
                Some(LocationSample::new("admin block", 0.95)),
            ]),
        };

        let handle = est.start(
            Box::new(ScriptedFrames::repeating(8)),
            Box::new(classifier),
        );
        assert_eq!(handle.state(), EstimatorState::Polling);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(rx.borrow().node_id, "library");

        tokio::time::sleep(Duration::from_secs(2)).await;
        // Low-confidence canteen sample must not surface.
        assert_eq!(rx.borrow().node_id, "library");

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(rx.borrow().node_id, "admin block");

        handle.stop();
        handle.stopped().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_mutation_after_stop() {
        let (est, rx) = estimator();

        let classifier = ScriptedClassifier {
            samples: VecDeque::from(vec![
                Some(LocationSample::new("library", 0.9)),
                Some(LocationSample::new("canteen", 0.99)),
                Some(LocationSample::new("admin block", 0.99)),
            ]),
        };

        let handle = est.start(
            Box::new(ScriptedFrames::repeating(8)),
            Box::new(classifier),
        );

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(rx.borrow().node_id, "library");

        handle.stop();
        assert_eq!(handle.state(), EstimatorState::Stopped);
        handle.stopped().await;

        // Later cycles would have accepted canteen/admin block.
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(rx.borrow().node_id, "library");
    }

    #[tokio::test(start_paused = true)]
    async fn test_source_loss_stops_polling() {
        let (est, rx) = estimator();

        let classifier = ScriptedClassifier {
            samples: VecDeque::from(vec![Some(LocationSample::new("library", 0.9))]),
        };

        // One frame only, then the source disappears.
        let handle = est.start(
            Box::new(ScriptedFrames::repeating(1)),
            Box::new(classifier),
        );

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(handle.state(), EstimatorState::Stopped);
        assert_eq!(rx.borrow().node_id, "library");
    }

    fn bundle() -> ModelBundle {
        let dir = tempfile::tempdir().unwrap();
        let model_path = dir.path().join("model.onnx");
        std::fs::write(&model_path, b"fake model data").unwrap();
        std::fs::write(
            dir.path().join("class_names.json"),
            r#"["main gate", "library", "canteen", "admin block"]"#,
        )
        .unwrap();
        ModelBundle::load(model_path).unwrap()
    }

    #[test]
    fn test_bundle_classifier_resolves_index_to_label() {
        let mut classifier =
            BundleClassifier::new(bundle(), Box::new(|_frame| Some((1, 0.88))));

        let sample = classifier
            .classify(&Frame::new(640, 480, Vec::new()))
            .unwrap();
        assert_eq!(sample.label, "library");
        assert_relative_eq!(sample.probability, 0.88);
    }

    #[test]
    fn test_bundle_classifier_rejects_out_of_range_index() {
        let mut classifier =
            BundleClassifier::new(bundle(), Box::new(|_frame| Some((9, 0.99))));
        assert!(classifier
            .classify(&Frame::new(640, 480, Vec::new()))
            .is_none());
    }

    #[test]
    fn test_bundle_classifier_feeds_the_gate() {
        let (mut est, _rx) = estimator();
        let mut classifier =
            BundleClassifier::new(bundle(), Box::new(|_frame| Some((3, 0.9))));

        let sample = classifier.classify(&Frame::new(640, 480, Vec::new()));
        assert_eq!(est.process_sample(sample), SampleVerdict::Accepted);
        assert_eq!(est.current().node_id, "admin block");
    }

    #[test]
    fn test_inflight_result_discarded_after_cancel() {
        // Drives the commit check directly: a cycle whose classification
        // finishes after cancellation must not touch the belief.
        let (mut est, _rx) = estimator();
        let source = CancelSource::new();
        let token = source.token();

        let sample = Some(LocationSample::new("library", 0.95));
        source.cancel();

        // Mirrors the loop's commit order: check token, then commit.
        if !token.is_cancelled() {
            est.process_sample(sample);
        }
        assert_eq!(est.current().node_id, "main gate");
    }
}
