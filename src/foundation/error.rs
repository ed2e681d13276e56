use crate::animation::keyframe::Axis;

/// Convenience result type used across keyplay.
pub type KeyplayResult<T> = Result<T, KeyplayError>;

/// Top-level error taxonomy used by loader, stage and playback APIs.
#[derive(thiserror::Error, Debug)]
pub enum KeyplayError {
    /// A config or asset could not be fetched, or its contents were not valid JSON.
    #[error("fetch failed for '{location}': {reason}")]
    FetchFailed {
        /// Path or URL that was requested.
        location: String,
        /// Status line, IO error or parse error text.
        reason: String,
    },

    /// An animation selector did not resolve to any element of the loaded SVG.
    #[error("element not found: {0}")]
    ElementNotFound(String),

    /// A keyframe entry is malformed for its axis.
    #[error("invalid {axis} keyframe at index {index}: {reason}")]
    InvalidKeyframe {
        /// Axis the keyframe list drives.
        axis: Axis,
        /// Position of the offending entry in its list.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// Invalid user-provided options or selector syntax.
    #[error("validation error: {0}")]
    Validation(String),

    /// SVG parse, geometry or raster failure.
    #[error("svg error: {0}")]
    Svg(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KeyplayError {
    /// Build a [`KeyplayError::FetchFailed`] value.
    pub fn fetch_failed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FetchFailed {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`KeyplayError::ElementNotFound`] value.
    pub fn element_not_found(selector: impl Into<String>) -> Self {
        Self::ElementNotFound(selector.into())
    }

    /// Build a [`KeyplayError::InvalidKeyframe`] value.
    pub fn invalid_keyframe(axis: Axis, index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidKeyframe {
            axis,
            index,
            reason: reason.into(),
        }
    }

    /// Build a [`KeyplayError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`KeyplayError::Svg`] value.
    pub fn svg(msg: impl Into<String>) -> Self {
        Self::Svg(msg.into())
    }

    /// Build a [`KeyplayError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
