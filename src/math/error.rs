// src/math/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient points for operation: expected at least {expected}, got {actual}")]
    InsufficientPoints { expected: usize, actual: usize },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Numerical calculation failed: {operation}")]
    NumericalFailure { operation: String },

    #[error("Field shapes do not match: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
}

impl MathError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    pub(crate) fn numerical(operation: impl Into<String>) -> Self {
        Self::NumericalFailure {
            operation: operation.into(),
        }
    }

    /// `true` für Fehler, die durch fehlerhafte Eingaben des Aufrufers entstehen.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InsufficientPoints { .. }
                | Self::InvalidInput { .. }
                | Self::InvalidConfiguration { .. }
                | Self::ShapeMismatch { .. }
        )
    }
}

pub type MathResult<T> = Result<T, MathError>;
