//! Obstacle sampler - periodic detector over the camera stream
//!
//! Runs an object detector on the latest camera frame on a fixed cadence
//! (500ms by default) and publishes the detection set through a watch
//! channel. Degenerate frames are skipped and the previous detections
//! stay published; results computed after a stop request are discarded.

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::sync::watch;

use campusnav_core::task::{spawn_poll_loop, PollHandle};

use super::FrameSource;
use crate::messages::{Detection, Frame};

/// Default sampling period.
pub const DEFAULT_SAMPLE_PERIOD: Duration = Duration::from_millis(500);

/// Object detector over a single frame.
pub trait ObstacleDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Vec<Detection>;
}

/// Periodic obstacle sampling task.
pub struct ObstacleSampler {
    period: Duration,
    detections_tx: watch::Sender<Vec<Detection>>,
}

impl ObstacleSampler {
    /// Create a sampler with the default 500ms period. The receiver starts
    /// with an empty detection set.
    pub fn new() -> (Self, watch::Receiver<Vec<Detection>>) {
        Self::with_period(DEFAULT_SAMPLE_PERIOD)
    }

    pub fn with_period(period: Duration) -> (Self, watch::Receiver<Vec<Detection>>) {
        let (detections_tx, detections_rx) = watch::channel(Vec::new());
        (
            Self {
                period,
                detections_tx,
            },
            detections_rx,
        )
    }

    /// Spawn the sampling loop. The loop ends when the frame source runs
    /// out or the returned handle is cancelled.
    pub fn start(
        self,
        mut source: Box<dyn FrameSource>,
        mut detector: Box<dyn ObstacleDetector>,
    ) -> PollHandle {
        let tx = self.detections_tx;
        spawn_poll_loop("obstacle_sampler", self.period, move |token| {
            let Some(frame) = source.next_frame() else {
                tracing::info!("frame source exhausted, stopping obstacle sampler");
                return ControlFlow::Break(());
            };
            if frame.is_degenerate() {
                tracing::debug!("skipping degenerate frame");
                return ControlFlow::Continue(());
            }

            let detections = detector.detect(&frame);
            if token.is_cancelled() {
                return ControlFlow::Break(());
            }
            let _ = tx.send(detections);
            ControlFlow::Continue(())
        })
    }
}
