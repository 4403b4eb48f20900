use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Missing credentials: {0} is not set")]
    MissingCredentials(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
