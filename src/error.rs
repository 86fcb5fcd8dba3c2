use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MarketError>;

/// Failure taxonomy shared by every marketplace operation.
///
/// Lifecycle operations return one of the five domain kinds; the CSV
/// interface layer adds the `Csv`/`Io` conversions. No operation partially
/// applies its effect: an error means the stored record is unchanged.
#[derive(Error, Diagnostic, Debug)]
pub enum MarketError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
