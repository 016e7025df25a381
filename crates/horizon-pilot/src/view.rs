//! The view contracts.
//!
//! - [`View`]: anything a container can attach and detach.
//! - [`FrameBackedView`]: a view driven by exactly one backing frame.
//! - [`CreateView`]: the single-argument constructor the type handler uses.
//!
//! Most views do not implement these by hand; see
//! [`FrameLayout`](crate::FrameLayout).

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use horizon_pilot_core::{Frame, FrameType, ThreadAffinity};

use crate::error::{BoxError, PilotResult};

/// Context handed to view constructors by the display strategy.
#[derive(Clone, PartialEq, Eq)]
pub struct DisplayContext {
    container: Arc<str>,
    affinity: ThreadAffinity,
}

impl DisplayContext {
    /// Create a context for the named container, owned by the current thread.
    pub fn new(container: impl Into<Arc<str>>) -> Self {
        Self {
            container: container.into(),
            affinity: ThreadAffinity::current(),
        }
    }

    /// Name of the container views built with this context are shown in.
    pub fn container_name(&self) -> &str {
        &self.container
    }

    /// The UI thread this context belongs to.
    pub fn affinity(&self) -> ThreadAffinity {
        self.affinity
    }

    /// This context with affinity checks forced on or off for the views
    /// built with it.
    pub fn with_thread_checks(mut self, enabled: bool) -> Self {
        self.affinity = self.affinity.with_checks(enabled);
        self
    }
}

impl fmt::Debug for DisplayContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayContext")
            .field("container", &&*self.container)
            .finish()
    }
}

/// Lifecycle state of a frame-backed view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// No backing frame yet.
    Unbound,
    /// Bound, not in a container.
    BoundDetached,
    /// Bound and attached; subscribed to its frame.
    BoundAttached,
}

/// An element a [`ViewContainer`](crate::ViewContainer) can hold.
///
/// Containers call [`attached`](Self::attached) and
/// [`detached`](Self::detached) exactly once per transition.
pub trait View: Any + Send + Sync {
    /// The view was added to an attached container.
    fn attached(self: Arc<Self>) -> PilotResult<()> {
        Ok(())
    }

    /// The view was removed from its container.
    fn detached(&self) {}

    /// The frame type this view is backed by, if it is frame-backed.
    fn backing_frame_type(&self) -> Option<FrameType> {
        None
    }

    /// Name used in diagnostics.
    fn view_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl dyn View {
    /// Borrow this view as its concrete type.
    pub fn downcast_ref<V: View>(&self) -> Option<&V> {
        (self as &dyn Any).downcast_ref::<V>()
    }
}

impl fmt::Debug for dyn View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("View").field(&self.view_name()).finish()
    }
}

/// A view bound to exactly one frame for its lifetime.
pub trait FrameBackedView: View {
    /// The frame type this view presents.
    type Frame: Frame;

    /// Bind the backing frame. Returns the view for chaining.
    ///
    /// Binding twice is a [`UsageError::AlreadyBound`](crate::UsageError::AlreadyBound).
    fn set_backing_frame(&self, frame: Arc<Self::Frame>) -> PilotResult<&Self>;

    /// The bound frame, if any.
    fn backing_frame(&self) -> Option<Arc<Self::Frame>>;

    /// Called once right after binding. Pull child-frame references here.
    fn backing_frame_set(&self, _frame: &Arc<Self::Frame>) {}

    /// The backing frame reported a change.
    fn updated(&self) {}
}

/// Construction from a display context alone.
pub trait CreateView: Sized {
    /// Build an unbound view.
    fn create(context: &DisplayContext) -> Result<Self, BoxError>;
}
