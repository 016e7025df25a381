//! Horizon Pilot - frame-to-view resolution for stack-based UI navigation.
//!
//! Application state lives in *frames*; a frame stack decides which frame is
//! on top. This crate decides which *view* shows it. A [`FrameViewHandler`]
//! maps each frame type to a view class, reuses the visible view while its
//! frame type stays on top, and otherwise builds a new view, binds it to the
//! frame and swaps it in through a [`Displayer`].
//!
//! Views bound to a frame observe it only while attached to a container.
//! [`FrameLayout`] implements that lifecycle; applications supply a
//! [`FrameContent`] with the frame type and the drawing hooks.
//!
//! This crate re-exports everything from `horizon-pilot-core`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_pilot::prelude::*;
//!
//! struct CounterFrame {
//!     observers: FrameObservers,
//! }
//!
//! impl Frame for CounterFrame {
//!     fn observers(&self) -> &FrameObservers {
//!         &self.observers
//!     }
//! }
//!
//! struct CounterContent;
//!
//! impl FrameContent for CounterContent {
//!     type Frame = CounterFrame;
//!
//!     fn create(_context: &DisplayContext) -> Result<Self, BoxError> {
//!         Ok(CounterContent)
//!     }
//! }
//!
//! let mut handler = FrameViewHandler::new(
//!     [ViewClass::of::<FrameLayout<CounterContent>>()],
//!     DefaultDisplayer::with_root("main"),
//! )?;
//!
//! let frame: Arc<dyn Frame> = Arc::new(CounterFrame { observers: FrameObservers::new() });
//! assert!(handler.present_if_handled(&frame)?);
//! assert!(handler.displayer().is_view_visible_for_frame_type(frame.frame_type()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use horizon_pilot_core::*;

pub mod backing;
pub mod chain;
pub mod config;
pub mod container;
pub mod debug;
pub mod displayer;
mod error;
pub mod handler;
pub mod layout;
pub mod prelude;
pub mod view;

pub use backing::{resolve_frame_type, resolve_view_frame_type, Backing, ViewClass};
pub use chain::HandlerChain;
pub use config::{HandlerConfig, ViewCatalog, DEFAULT_CONTAINER};
pub use container::{RootContainer, ViewContainer};
pub use debug::{MappingDebug, MappingFormatOptions, MappingStyle};
pub use displayer::{DefaultDisplayer, Displayer};
pub use error::{BoxError, ConfigError, ConfigResult, PilotError, PilotResult, UsageError};
pub use handler::{FrameTypeHandler, FrameViewHandler};
pub use layout::{FrameContent, FrameLayout};
pub use view::{CreateView, DisplayContext, FrameBackedView, View, ViewState};
