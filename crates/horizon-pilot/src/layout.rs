//! [`FrameLayout`], the convenience base for frame-backed views.
//!
//! A `FrameLayout<C>` owns the bookkeeping every frame-backed view needs:
//! the set-once backing frame and the observer subscription that exists
//! exactly while the view is attached. The application supplies `C`, a
//! [`FrameContent`], with the frame type and the hooks.
//!
//! # Lifecycle
//!
//! ```text
//!   Unbound ──set_backing_frame──▶ BoundDetached ──attached──▶ BoundAttached
//!                                        ▲                          │
//!                                        └─────────detached─────────┘
//! ```
//!
//! On attach the layout subscribes to its frame with notify-immediately, so
//! the content receives one synchronous `updated` to draw its initial state.
//! On detach the subscription is released. Attaching while unbound fails
//! with [`UsageError::AttachedWithoutFrame`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_pilot::{BoxError, DisplayContext, FrameContent, FrameLayout};
//! use horizon_pilot::{Frame, FrameObservers};
//!
//! struct InboxFrame {
//!     observers: FrameObservers,
//! }
//!
//! impl Frame for InboxFrame {
//!     fn observers(&self) -> &FrameObservers {
//!         &self.observers
//!     }
//! }
//!
//! struct InboxContent;
//!
//! impl FrameContent for InboxContent {
//!     type Frame = InboxFrame;
//!
//!     fn create(_context: &DisplayContext) -> Result<Self, BoxError> {
//!         Ok(InboxContent)
//!     }
//! }
//!
//! pub type InboxView = FrameLayout<InboxContent>;
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use horizon_pilot_core::logging::targets;
use horizon_pilot_core::{Frame, FrameObserver, FrameType, Subscription};
use parking_lot::Mutex;

use crate::error::{BoxError, PilotResult, UsageError};
use crate::view::{CreateView, DisplayContext, FrameBackedView, View, ViewState};

/// The application-specific part of a [`FrameLayout`].
pub trait FrameContent: Send + Sync + 'static {
    /// The frame type this content presents.
    type Frame: Frame;

    /// Build the content from the display context.
    fn create(context: &DisplayContext) -> Result<Self, BoxError>
    where
        Self: Sized;

    /// The backing frame was just set.
    fn backing_frame_set(&self, _frame: &Arc<Self::Frame>) {}

    /// The backing frame changed, or the view was just attached.
    fn updated(&self, _frame: &Arc<Self::Frame>) {}
}

/// A frame-backed view built from a [`FrameContent`].
pub struct FrameLayout<C: FrameContent> {
    content: C,
    context: DisplayContext,
    frame: OnceLock<Arc<C::Frame>>,
    subscription: Mutex<Option<Subscription>>,
}

impl<C: FrameContent> FrameLayout<C> {
    /// Wrap already-built content.
    pub fn new(content: C, context: DisplayContext) -> Self {
        Self {
            content,
            context,
            frame: OnceLock::new(),
            subscription: Mutex::new(None),
        }
    }

    /// The application content.
    pub fn content(&self) -> &C {
        &self.content
    }

    /// The context this view was built with.
    pub fn context(&self) -> &DisplayContext {
        &self.context
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ViewState {
        if self.frame.get().is_none() {
            ViewState::Unbound
        } else if self.subscription.lock().is_some() {
            ViewState::BoundAttached
        } else {
            ViewState::BoundDetached
        }
    }

    /// Whether the view is attached and observing its frame.
    pub fn is_attached(&self) -> bool {
        self.state() == ViewState::BoundAttached
    }

    fn name() -> &'static str {
        std::any::type_name::<C>()
    }
}

impl<C: FrameContent> View for FrameLayout<C> {
    fn attached(self: Arc<Self>) -> PilotResult<()> {
        self.context.affinity().check("FrameLayout::attached");
        let frame = self.frame.get().cloned().ok_or(UsageError::AttachedWithoutFrame {
            view: Self::name(),
        })?;

        let observer: Weak<dyn FrameObserver> = Arc::downgrade(&self) as Weak<dyn FrameObserver>;
        let subscription = frame.observers().subscribe(observer, true);
        let previous = self.subscription.lock().replace(subscription);
        if let Some(previous) = previous {
            tracing::warn!(target: targets::VIEW, view = Self::name(), "view attached twice; replacing subscription");
            previous.release();
        }
        tracing::trace!(target: targets::VIEW, view = Self::name(), "view attached");
        Ok(())
    }

    fn detached(&self) {
        self.context.affinity().check("FrameLayout::detached");
        let subscription = self.subscription.lock().take();
        if let Some(subscription) = subscription {
            subscription.release();
            tracing::trace!(target: targets::VIEW, view = Self::name(), "view detached");
        }
    }

    fn backing_frame_type(&self) -> Option<FrameType> {
        Some(FrameType::of::<C::Frame>())
    }

    fn view_name(&self) -> &'static str {
        Self::name()
    }
}

impl<C: FrameContent> FrameObserver for FrameLayout<C> {
    fn updated(&self) {
        if let Some(frame) = self.frame.get() {
            self.content.updated(frame);
        }
    }
}

impl<C: FrameContent> FrameBackedView for FrameLayout<C> {
    type Frame = C::Frame;

    fn set_backing_frame(&self, frame: Arc<C::Frame>) -> PilotResult<&Self> {
        self.frame
            .set(frame)
            .map_err(|_| UsageError::AlreadyBound { view: Self::name() })?;
        tracing::trace!(target: targets::VIEW, view = Self::name(), "backing frame set");
        Ok(self)
    }

    fn backing_frame(&self) -> Option<Arc<C::Frame>> {
        self.frame.get().cloned()
    }

    fn backing_frame_set(&self, frame: &Arc<C::Frame>) {
        self.content.backing_frame_set(frame);
    }

    fn updated(&self) {
        FrameObserver::updated(self);
    }
}

impl<C: FrameContent> CreateView for FrameLayout<C> {
    fn create(context: &DisplayContext) -> Result<Self, BoxError> {
        C::create(context).map(|content| Self::new(content, context.clone()))
    }
}

impl<C: FrameContent> Drop for FrameLayout<C> {
    fn drop(&mut self) {
        if self.subscription.get_mut().is_some() {
            tracing::debug!(target: targets::VIEW, view = Self::name(), "view dropped while attached; releasing subscription");
        }
    }
}

impl<C: FrameContent> fmt::Debug for FrameLayout<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameLayout")
            .field("content", &Self::name())
            .field("state", &self.state())
            .finish()
    }
}
