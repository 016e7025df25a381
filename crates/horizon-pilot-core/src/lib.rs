//! Core systems for Horizon Pilot.
//!
//! This crate provides the foundations the view layer builds on:
//!
//! - **Frames**: application state objects and their runtime type identity
//! - **Observer Lists**: per-frame "updated" notification with scoped subscriptions
//! - **Signal/Slot System**: the notification primitive observer lists use
//! - **Thread Affinity**: checks that presentation state stays on the UI thread
//! - **Logging**: `tracing` targets and span names shared by all crates
//!
//! # Frame Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_pilot_core::{Frame, FrameObservers, FrameType};
//!
//! struct SettingsFrame {
//!     observers: FrameObservers,
//! }
//!
//! impl Frame for SettingsFrame {
//!     fn observers(&self) -> &FrameObservers {
//!         &self.observers
//!     }
//! }
//!
//! let frame: Arc<dyn Frame> = Arc::new(SettingsFrame { observers: FrameObservers::new() });
//! assert_eq!(frame.frame_type(), FrameType::of::<SettingsFrame>());
//! ```

mod error;
pub mod frame;
pub mod logging;
pub mod signal;
pub mod thread_check;

pub use error::{FrameError, FrameResult};
pub use frame::{downcast_frame, short_type_name, Frame, FrameObserver, FrameObservers, FrameType, Subscription};
pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use thread_check::{are_thread_checks_enabled, set_thread_checks_enabled, ThreadAffinity};
