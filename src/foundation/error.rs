use crate::numeric::quadrature::IntegrationError;

/// Convenience result type used across fourierline.
pub type FourierResult<T> = Result<T, FourierError>;

/// Top-level error taxonomy used by the approximation APIs.
#[derive(thiserror::Error, Debug)]
pub enum FourierError {
    /// Invalid caller-provided data (domains, periods, tables, settings).
    #[error("validation error: {0}")]
    Validation(String),

    /// Quadrature failure, surfaced unchanged.
    #[error(transparent)]
    Integration(#[from] IntegrationError),

    /// A series was evaluated past the end of its coefficient sequences.
    #[error("index range error: degree {degree} exceeds available coefficients (a_n: {a_len}, b_n: {b_len})")]
    IndexRange {
        degree: usize,
        a_len: usize,
        b_len: usize,
    },

    /// A piecewise target has no rule for the wrapped coordinate.
    #[error("undefined domain error: no rule covers x = {x} (wrapped to {wrapped})")]
    UndefinedDomain { x: f64, wrapped: f64 },

    /// Errors while rasterizing or writing charts.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FourierError {
    /// Build a [`FourierError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FourierError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`FourierError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`FourierError::IndexRange`] for `degree` against the given sequences.
    pub fn index_range(degree: usize, a_len: usize, b_len: usize) -> Self {
        Self::IndexRange {
            degree,
            a_len,
            b_len,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
