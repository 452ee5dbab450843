use crate::provider::error::ProviderError;

/// Convenience result type used across slidereel.
pub type SlideResult<T> = Result<T, SlideError>;

/// Top-level error taxonomy used by library APIs.
///
/// Faults that are recovered locally (missing slide markup, unplayable audio, zero-size
/// containers) never surface here; see [`crate::Recovery`].
#[derive(thiserror::Error, Debug)]
pub enum SlideError {
    /// The generation service returned a shape that has no usable slides collection.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Invalid caller-provided data (requests, configuration, ids).
    #[error("validation error: {0}")]
    Validation(String),

    /// A failure reported by an external generation or synthesis provider.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The rendering surface rejected an operation.
    #[error("surface error: {0}")]
    Surface(String),

    /// The audio backend rejected an operation.
    #[error("audio error: {0}")]
    Audio(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlideError {
    /// Build a [`SlideError::MalformedResponse`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Build a [`SlideError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SlideError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`SlideError::Audio`] value.
    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }

    /// Build a [`SlideError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Human-readable message suitable for showing to an end user.
    ///
    /// Provider failures map to one message per kind; everything else uses the display form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Provider(p) => p.user_message().to_owned(),
            other => other.to_string(),
        }
    }
}

/// A fault that was absorbed locally instead of being propagated.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Recovery {
    /// A slide had no usable markup; the placeholder document was shown.
    ContentMissing {
        /// Id of the affected slide.
        slide_id: u32,
    },
    /// The audio asset could not be attached or decoded; playback continues silently.
    AudioBindFailure {
        /// Backend-provided reason.
        reason: String,
    },
    /// The container had no area yet; scaling waits for the next resize.
    ScaleComputeSkipped,
    /// Content injection failed twice; the placeholder document was shown.
    LoadFallback {
        /// Id of the affected slide.
        slide_id: u32,
    },
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
