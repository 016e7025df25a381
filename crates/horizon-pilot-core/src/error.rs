//! Error types for Horizon Pilot core.

/// Result type alias for frame operations.
pub type FrameResult<T> = std::result::Result<T, FrameError>;

/// Errors that can occur while working with frames.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// A frame was downcast to a type it is not.
    #[error("frame type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// The type the caller asked for.
        expected: &'static str,
        /// The frame's runtime type.
        got: &'static str,
    },
}

impl FrameError {
    /// Create a type mismatch error.
    pub fn type_mismatch(expected: &'static str, got: &'static str) -> Self {
        Self::TypeMismatch { expected, got }
    }
}
