use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum UiError {
    #[error("'{0}' is not a number")]
    InvalidNumber(String),
    #[error("{value} is outside [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },
}
