/// Structural errors while reading a wire document into core types.
///
/// Unreadable numeric cells are not errors; they travel into the core as
/// anomalies and surface as BLOCK rows.
///
/// `context` names the offending element, e.g. `record 3 'SKU-9'`,
/// `edit 'SKU-9'` or `action 2`.
#[derive(Debug, thiserror::Error)]
pub enum InterchangeError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document does not have the expected top-level shape.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("{context}: missing required field '{field}'")]
    MissingField { context: String, field: String },

    #[error("{context}: {message}")]
    Invalid { context: String, message: String },
}
