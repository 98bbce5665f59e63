//! Error types for the data dictionary.

/// Errors that can occur during field-spec parsing or DDL generation.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    /// A field statement is malformed (missing NAME or TYPE, duplicate
    /// field names in strict mode, unrecognized attribute in strict mode).
    #[error("invalid field specification: {0}")]
    FieldSpec(String),

    /// No dialect is registered under the requested name.
    #[error("unknown dialect: {0}")]
    UnknownDialect(String),

    /// The live-metadata fetch failed or the connection is not established.
    /// No partial diff is produced.
    #[error("connection unavailable: {0}")]
    Connection(String),

    /// A statement failed during batch execution.
    #[error("statement failed: {sql}: {message}")]
    Execute {
        /// The statement that failed.
        sql: String,
        /// The underlying failure reported by the connection.
        message: String,
    },
}

/// Convenience result type for data dictionary operations.
pub type Result<T> = std::result::Result<T, DictError>;
