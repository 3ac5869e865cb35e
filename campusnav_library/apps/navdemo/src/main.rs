//! Campus navigation demo.
//!
//! Plans a route across the bundled campus map, then simulates a walk along
//! it: a scripted camera feeds a scripted classifier, the location estimator
//! gates the samples, and the navigator turns accepted estimates into
//! guidance until arrival.
//!
//! A real deployment replaces the scripted classifier with a
//! `BundleClassifier` wrapping its inference backend and a loaded
//! `ModelBundle`; the rest of the wiring is identical.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use campusnav_library::algorithms::instructions::Glyph;
use campusnav_library::maps;
use campusnav_library::messages::{Frame, LocationSample};
use campusnav_library::nodes::{
    EstimatorConfig, FrameSource, LocationClassifier, LocationEstimator, NavUpdate, Navigator,
};

#[derive(Parser, Debug)]
#[command(name = "navdemo", about = "Plan and walk a route on the campus map")]
struct Args {
    /// Starting node id.
    #[arg(long, default_value = "main gate")]
    from: String,

    /// Destination node id.
    #[arg(long, default_value = "library")]
    to: String,

    /// Confidence threshold for accepting classifier fixes.
    #[arg(long, default_value_t = 0.7)]
    threshold: f64,
}

struct SyntheticCamera {
    remaining: usize,
}

impl FrameSource for SyntheticCamera {
    fn next_frame(&mut self) -> Option<Frame> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(Frame::new(640, 480, vec![0; 640 * 480 * 3]))
    }
}

/// Replays a fixed sequence of classifier outputs, then repeats the last.
struct ScriptedClassifier {
    script: VecDeque<LocationSample>,
    last: Option<LocationSample>,
}

impl LocationClassifier for ScriptedClassifier {
    fn classify(&mut self, _frame: &Frame) -> Option<LocationSample> {
        if let Some(sample) = self.script.pop_front() {
            self.last = Some(sample.clone());
            Some(sample)
        } else {
            self.last.clone()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let graph = Arc::new(maps::campus().context("loading bundled campus map")?);

    let mut navigator = Navigator::new(Arc::clone(&graph), &args.from)?;
    let Some(route) = navigator.set_destination(&args.to)? else {
        bail!("no route from '{}' to '{}'", args.from, args.to);
    };

    println!("Route ({} steps, {:.0}m):", route.steps.len(), route.total_distance);
    for step in &route.steps {
        let glyph = Glyph::for_instruction(&step.instruction)
            .map(|g| format!("{:?}", g))
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<20} {:<20} [{}]", step.node_id, step.instruction, glyph);
    }

    // Walk the route: one confident fix per node, with a noisy low-confidence
    // reading mixed in to show the gate holding the belief steady.
    let mut script: VecDeque<LocationSample> = route
        .steps
        .iter()
        .map(|step| LocationSample::new(&step.node_id, 0.92))
        .collect();
    script.insert(1, LocationSample::new("old canteen", 0.4));

    let config = EstimatorConfig {
        initial_node: args.from.clone(),
        confidence_threshold: args.threshold,
        poll_period: Duration::from_millis(100),
    };
    let (estimator, mut estimates) = LocationEstimator::new(Arc::clone(&graph), config)?;
    let handle = estimator.start(
        Box::new(SyntheticCamera {
            remaining: route.steps.len() + 4,
        }),
        Box::new(ScriptedClassifier {
            script,
            last: None,
        }),
    );

    while estimates.changed().await.is_ok() {
        let estimate = estimates.borrow_and_update().clone();
        let update = navigator.on_location_update(&estimate)?;
        match update {
            NavUpdate::OnRoute { steps_remaining } => {
                let instruction = navigator.current_instruction().unwrap_or("");
                println!(
                    "at {} ({:.2}) -> {} ({} to go)",
                    estimate.node_id, estimate.confidence, instruction, steps_remaining
                );
            }
            NavUpdate::Arrived => {
                println!(
                    "at {} ({:.2}) -> {}",
                    estimate.node_id,
                    estimate.confidence,
                    navigator.current_instruction().unwrap_or("")
                );
                break;
            }
            NavUpdate::Replanned => {
                println!("off route at {}, replanned", estimate.node_id);
            }
            NavUpdate::Unreachable => {
                bail!("no route from '{}' to '{}'", estimate.node_id, args.to);
            }
            NavUpdate::Idle => {}
        }
    }

    handle.stop();
    Ok(())
}
