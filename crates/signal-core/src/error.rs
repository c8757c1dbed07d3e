use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignalError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    #[error("Empty universe: summary statistics need at least one instrument")]
    EmptyUniverse,
}
