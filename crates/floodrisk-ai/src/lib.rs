//! Object detection layer: the capability the scoring engine reads counts from.
//!
//! The model itself is external. This crate defines the [`Detector`] seam, a
//! lazily loaded [`SharedDetector`] handle, and a sidecar-file adapter.

mod detector;
mod shared;
mod sidecar;

pub use detector::{DetectError, Detector};
pub use shared::{DetectorLoader, LoadFuture, SharedDetector};
pub use sidecar::SidecarDetector;
