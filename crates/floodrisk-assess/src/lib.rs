//! Assessment entry points.
//!
//! Manual input is scored directly. Images go through a [`FallbackChain`]
//! that tries the remote analyser, then local detection, then a static
//! placeholder, and always ends with a result.

mod assessor;
mod chain;
mod error;

pub use assessor::{AssessConfig, Assessor};
pub use chain::{ChainOutcome, Degradation, FallbackChain, Stage};
pub use error::StageError;
