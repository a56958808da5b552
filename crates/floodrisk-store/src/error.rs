use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("history I/O error on {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt history entry at line {line}: {source}")]
    Corrupt {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode assessment: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("unknown time window '{0}' (expected all, week or month)")]
    UnknownWindow(String),
}
