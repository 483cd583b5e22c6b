/// Convenience result type used across slidewave.
pub type SlidewaveResult<T> = Result<T, SlidewaveError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// Configuration defects that have a documented fallback never reach this type; they are
/// logged and replaced at the point of use.
#[derive(thiserror::Error, Debug)]
pub enum SlidewaveError {
    /// Invalid configuration or caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterizing or persisting a slide.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while synthesizing, loading or writing audio.
    #[error("audio error: {0}")]
    Audio(String),

    /// Errors while assembling frames and audio into a video file.
    #[error("encode error: {0}")]
    Encode(String),

    /// The scratch space is held by another pipeline invocation.
    #[error("scratch busy: {0}")]
    Busy(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlidewaveError {
    /// Build a [`SlidewaveError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SlidewaveError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SlidewaveError::Audio`] value.
    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }

    /// Build a [`SlidewaveError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`SlidewaveError::Busy`] value.
    pub fn busy(msg: impl Into<String>) -> Self {
        Self::Busy(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
