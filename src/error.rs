use thiserror::Error;

#[derive(Error, Debug)]
pub enum CreditReportError {
    #[error("Unparseable document: {0}")]
    UnparseableDocument(String),

    #[error("Unusable document root: {0}")]
    UnusableRoot(String),

    #[error("Extraction anomaly in field '{field}': {details}")]
    ExtractionAnomaly { field: String, details: String },

    #[error("Invalid normalizer options: {0}")]
    InvalidOptions(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CreditReportError {
    pub(crate) fn anomaly(field: impl Into<String>, details: impl Into<String>) -> Self {
        Self::ExtractionAnomaly {
            field: field.into(),
            details: details.into(),
        }
    }

    /// True for failures caused by the submitted document rather than by the caller's setup.
    /// Upload handlers map these to a client error.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnparseableDocument(_) | Self::UnusableRoot(_) | Self::ExtractionAnomaly { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CreditReportError>;
