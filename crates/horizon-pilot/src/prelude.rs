//! Prelude module for Horizon Pilot.
//!
//! ```ignore
//! use horizon_pilot::prelude::*;
//! ```
//!
//! This provides access to:
//! - Frames and their observer lists (`Frame`, `FrameObservers`, `FrameType`)
//! - The view contracts (`View`, `FrameBackedView`, `FrameLayout`, `FrameContent`)
//! - Type handlers and display strategies (`FrameViewHandler`, `DefaultDisplayer`)

// ============================================================================
// Frames
// ============================================================================

pub use crate::{downcast_frame, Frame, FrameObserver, FrameObservers, FrameType, Subscription};

// ============================================================================
// Views
// ============================================================================

pub use crate::layout::{FrameContent, FrameLayout};
pub use crate::view::{CreateView, DisplayContext, FrameBackedView, View};

// ============================================================================
// Resolution and Display
// ============================================================================

pub use crate::backing::{Backing, ViewClass};
pub use crate::chain::HandlerChain;
pub use crate::container::{RootContainer, ViewContainer};
pub use crate::displayer::{DefaultDisplayer, Displayer};
pub use crate::handler::{FrameTypeHandler, FrameViewHandler};

// ============================================================================
// Errors
// ============================================================================

pub use crate::error::{BoxError, ConfigError, PilotError, PilotResult, UsageError};
