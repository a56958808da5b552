use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("malformed analysis reply: {0}")]
    Malformed(String),
    #[error("analysis reply is missing required field: {0}")]
    MissingField(&'static str),
}

impl RemoteError {
    /// Transport failures, 5xx and 429 are worth another attempt. Other 4xx
    /// statuses and replies that could not be understood are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Server { status, .. } => *status >= 500 || *status == 429,
            Self::Malformed(_) | Self::MissingField(_) => false,
        }
    }
}
