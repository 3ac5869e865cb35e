//! # CampusNav Core
//!
//! Runtime plumbing for the CampusNav navigation engine.
//!
//! This crate provides the building blocks the domain library sits on:
//!
//! - **Errors**: the engine-wide error taxonomy ([`NavError`], [`NavResult`])
//! - **Tasks**: cancellable fixed-cadence polling loops ([`task`])
//! - **ML**: explicit model-bundle handles for classifier backends ([`ml`])
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use campusnav_core::task::spawn_poll_loop;
//! use std::ops::ControlFlow;
//! use std::time::Duration;
//!
//! let handle = spawn_poll_loop("sampler", Duration::from_secs(2), move |token| {
//!     // request one sample, check `token` before committing the result
//!     ControlFlow::Continue(())
//! });
//! handle.cancel();
//! ```

pub mod error;
pub mod ml;
pub mod task;

// Re-export commonly used types for easy access
pub use error::{NavError, NavResult};
pub use ml::ModelBundle;
pub use task::{spawn_poll_loop, CancelSource, CancelToken, PollHandle};
