/// Convenience result type used across netevo.
pub type NetevoResult<T> = Result<T, NetevoError>;

/// Top-level error taxonomy used by library APIs.
#[derive(thiserror::Error, Debug)]
pub enum NetevoError {
    /// Invalid user-provided options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed snapshot contents.
    #[error("parse error: {0}")]
    Parse(String),

    /// Errors while drawing or rasterizing a network figure.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while assembling the output animation.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NetevoError {
    /// Build a [`NetevoError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`NetevoError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`NetevoError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`NetevoError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
