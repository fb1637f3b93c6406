use thiserror::Error;

#[derive(Error, Debug)]
pub enum SalesReportError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing field '{0}' in input row")]
    MissingField(String),

    #[error("Invalid quarter label '{0}': expected YYYYQn with n between 1 and 4")]
    InvalidQuarterLabel(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SalesReportError>;
