//! Remote image analysis: HTTP client, structured-reply extraction, retry.

mod client;
mod data_url;
mod error;
mod reply;
pub mod retry;

pub use client::{AnalysisClient, AnalysisRequest, RemoteAnalyzer, RemoteConfig};
pub use data_url::{decode_data_url, encode_data_url};
pub use error::RemoteError;
pub use reply::{extract_json_object, parse_findings};
pub use retry::{RetryPolicy, retry};
