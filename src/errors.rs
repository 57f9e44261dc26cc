use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("invalid {field}: {message}")]
    InvalidInput {
        field: &'static str,
        message: String,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

impl CalculatorError {
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }

    pub fn calculation(message: impl Into<String>) -> Self {
        Self::CalculationError {
            message: message.into(),
        }
    }

    /// message safe to show to the person who submitted the form
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput { message, .. } => message.clone(),
            Self::CalculationError { .. } => {
                "These values could not be computed. Try a smaller amount or rate.".to_string()
            }
            Self::InvalidConfiguration { .. } => {
                "The calculator is not available right now.".to_string()
            }
        }
    }

    /// form field the error refers to, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CalculatorError>;
