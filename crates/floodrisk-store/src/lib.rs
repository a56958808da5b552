//! Persistence collaborator: assessment history as JSON lines.

mod error;
mod history;

pub use error::StoreError;
pub use history::{HistoryFilter, HistoryStore, TimeWindow};
