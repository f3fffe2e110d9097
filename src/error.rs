//! Error types.
//! Degenerate numeric inputs (empty collections, zero vectors, undefined metrics)
//! are not errors and never show up here.

/// Configuration problems, rejected before any computation starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid match strategy {0}: expected one of 0, 1, 2, 3")]
    InvalidStrategy(i64),

    #[error("failed to parse config {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid config value for {field}: {message}")]
    ValidationFailed { field: String, message: String },
}

/// Errors of a trace-link run.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("duplicate identifier {id:?} in {collection} collection")]
    DuplicateId { collection: String, id: String },

    #[error("malformed identifier {id:?} in {collection} collection")]
    MalformedId { collection: String, id: String },

    #[error("score row {id:?} has {found} entries, expected {expected}")]
    RowLength { id: String, expected: usize, found: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = TraceError> = std::result::Result<T, E>;
