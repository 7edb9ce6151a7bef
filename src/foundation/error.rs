/// Convenience result type used across chartsnap.
pub type ChartResult<T> = Result<T, ChartError>;

/// Top-level error taxonomy for snapshot rendering.
///
/// Only hard failures surface through this type. Per-bar data defects, missing fonts and a
/// non-functional text backend are recovered where they happen and never reach the caller.
#[derive(thiserror::Error, Debug)]
pub enum ChartError {
    /// Invalid caller-provided data or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Font discovery, registration or download failure.
    #[error("font error: {0}")]
    Font(String),

    /// Rasterization failure inside a drawing backend.
    #[error("render error: {0}")]
    Render(String),

    /// Image encoding failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChartError {
    /// Build a [`ChartError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ChartError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`ChartError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ChartError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
