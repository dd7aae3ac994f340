use thiserror::Error;

/// Error type that captures invoice workflow failures.
#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Submission failed: {0}")]
    Submission(String),
    #[error("Export failed: {0}")]
    Export(String),
    #[error("Account holder name `{holder}` does not match influencer name `{payee}`")]
    PayeeMismatch { holder: String, payee: String },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, InvoiceError>;
