//! Error types for frame-to-view resolution.
//!
//! Every error here reports a programming or setup mistake. Nothing is
//! transient, so nothing is retried: errors surface at the call site that
//! detects them. "This handler does not present that frame" is not an error;
//! it is `Ok(false)` from [`present_if_handled`](crate::FrameViewHandler::present_if_handled).

use std::path::PathBuf;

use horizon_pilot_core::{FrameError, FrameType};

/// Boxed error returned by view constructors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for configuration-time operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for presentation and lifecycle operations.
pub type PilotResult<T> = std::result::Result<T, PilotError>;

/// Setup mistakes: bad view classes, bad mappings, bad configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A top-level view class has no frame-backed constructor.
    #[error("view class '{view}' does not implement the frame-backed view contract")]
    NotFrameBacked { view: &'static str },

    /// No class in the base chain declares a frame type.
    #[error("view class '{view}' declares no frame type anywhere in its base chain")]
    MissingFrameParameter { view: &'static str },

    /// The nearest declaration in the base chain is still generic.
    #[error("view class '{view}' leaves frame parameter '{param}' of '{declared_by}' unbound")]
    UnboundFrameParameter {
        view: &'static str,
        declared_by: &'static str,
        param: &'static str,
    },

    /// Two top-level view classes resolve to the same frame type.
    #[error("frame type '{frame}' is mapped by both '{existing}' and '{duplicate}'")]
    DuplicateFrameType {
        frame: FrameType,
        existing: &'static str,
        duplicate: &'static str,
    },

    /// The view's constructor failed.
    #[error("failed to construct view '{view}': {source}")]
    Construction {
        view: &'static str,
        #[source]
        source: BoxError,
    },

    /// The frame handed to a view is not the type the view is backed by.
    #[error("view '{view}' cannot be bound: {source}")]
    FrameTypeMismatch {
        view: &'static str,
        #[source]
        source: FrameError,
    },

    /// A configuration names a view the catalog does not know.
    #[error("no view named '{name}' in the catalog")]
    UnknownView { name: String },

    /// A configuration refers to a view that is not top-level in this handler.
    #[error("view '{name}' is not a top-level view of this handler")]
    NotTopLevel { name: String },

    /// Malformed configuration text.
    #[error("invalid handler configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration could not be serialized.
    #[error("failed to serialize handler configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Configuration file could not be read.
    #[error("failed to read handler configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create a construction error.
    pub fn construction(view: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Construction {
            view,
            source: source.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Misuse of the view lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    /// A view was attached before any backing frame was set.
    #[error("view '{view}' was attached before a backing frame was set")]
    AttachedWithoutFrame { view: &'static str },

    /// A second frame was bound to an already bound view.
    #[error("view '{view}' is already bound to a frame")]
    AlreadyBound { view: &'static str },
}

/// The umbrella error for presentation.
#[derive(Debug, thiserror::Error)]
pub enum PilotError {
    /// Configuration error surfaced at use.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Lifecycle misuse.
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// No handler in a chain presents this frame type.
    #[error("no handler presents frames of type '{frame}'")]
    Unhandled { frame: FrameType },
}

impl PilotError {
    /// Whether this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Whether this is a lifecycle usage error.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}
