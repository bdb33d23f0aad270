use thiserror::Error;

#[derive(Debug, Error)]
pub enum CertError {
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("No applicant found for {0}")]
    ApplicantNotFound(String),
    #[error("Unsupported certificate type: {0}")]
    UnsupportedCertificateType(String),
    #[error("Field not found: {0}")]
    FieldNotFound(String),
    #[error("Certificate not found: {0}")]
    CertificateNotFound(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<lopdf::Error> for CertError {
    fn from(err: lopdf::Error) -> Self {
        CertError::Pdf(err.to_string())
    }
}
