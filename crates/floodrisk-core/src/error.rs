use thiserror::Error;

/// Input problems that must block an assessment and be shown to the caller.
///
/// Every other failure mode (upstream, model, malformed reply) degrades through
/// the fallback chain instead of surfacing here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("{field} must be a number, got '{value}'")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("image is empty")]
    EmptyImage,

    #[error("image is {size} bytes, limit is {limit} bytes")]
    ImageTooLarge { size: usize, limit: usize },

    #[error("unsupported file type '{0}': only images can be assessed")]
    NotAnImage(String),
}
