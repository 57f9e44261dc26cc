//! Error types for the web server.

use thiserror::Error;

use crate::errors::CalculatorError;

/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors raised while configuring or running the server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Calculator rejected its configuration
    #[error("Calculator error: {0}")]
    Calculator(#[from] CalculatorError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Server configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ServerError::Calculator(CalculatorError::InvalidInput { .. }) => 400,
            ServerError::Calculator(CalculatorError::CalculationError { .. }) => 422,
            ServerError::Calculator(CalculatorError::InvalidConfiguration { .. })
            | ServerError::Io(_)
            | ServerError::Config(_)
            | ServerError::Internal(_) => 500,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ServerError::Calculator(_) => "calculator_error",
            ServerError::Io(_) => "io_error",
            ServerError::Config(_) => "config_error",
            ServerError::Internal(_) => "internal_error",
        }
    }
}
