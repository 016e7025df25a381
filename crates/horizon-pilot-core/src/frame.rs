//! Frames and their observer lists.
//!
//! A frame is an application state object representing one logical
//! navigation destination (a login screen's controller, a detail page's
//! presenter). Frames are created and destroyed by the application's frame
//! stack and shared as `Arc<dyn Frame>`. Views observe the frame that backs
//! them and refresh when it reports an update.
//!
//! # Key Types
//!
//! - [`Frame`] - Trait every state object implements
//! - [`FrameType`] - Runtime identity of a concrete frame type
//! - [`FrameObservers`] - Observer list owned by each frame
//! - [`Subscription`] - RAII handle that unsubscribes on release or drop
//!
//! # Example
//!
//! ```
//! use std::sync::{Arc, Weak};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use horizon_pilot_core::{Frame, FrameObserver, FrameObservers};
//!
//! struct LoginFrame {
//!     observers: FrameObservers,
//! }
//!
//! impl Frame for LoginFrame {
//!     fn observers(&self) -> &FrameObservers {
//!         &self.observers
//!     }
//! }
//!
//! struct Refreshes(AtomicUsize);
//!
//! impl FrameObserver for Refreshes {
//!     fn updated(&self) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let frame = LoginFrame { observers: FrameObservers::new() };
//! let observer = Arc::new(Refreshes(AtomicUsize::new(0)));
//! let weak: Weak<dyn FrameObserver> = Arc::downgrade(&observer) as Weak<dyn FrameObserver>;
//!
//! let subscription = frame.observers().subscribe(weak, true);
//! frame.observers().notify_updated();
//! assert_eq!(observer.0.load(Ordering::SeqCst), 2);
//!
//! subscription.release();
//! assert_eq!(frame.observers().observer_count(), 0);
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use crate::error::{FrameError, FrameResult};
use crate::logging::targets;
use crate::signal::{ConnectionGuard, Signal};

/// Strip the module path from a full type name, keeping generic arguments
/// as written.
pub fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    let start = base.rfind("::").map(|i| i + 2).unwrap_or(0);
    &full[start..]
}

/// Runtime identity of a concrete frame type.
///
/// Two `FrameType`s are equal when they describe the same Rust type. The type
/// name is carried for diagnostics only.
#[derive(Clone, Copy)]
pub struct FrameType {
    id: TypeId,
    name: &'static str,
}

impl FrameType {
    /// The frame type of `F`.
    pub fn of<F: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<F>(),
            name: std::any::type_name::<F>(),
        }
    }

    /// The underlying `TypeId`.
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The full type name, including the module path.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type name without its module path.
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.name)
    }

    /// Whether this is the frame type of `F`.
    #[inline]
    pub fn is<F: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<F>()
    }
}

impl PartialEq for FrameType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FrameType {}

impl Hash for FrameType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameType({})", self.name)
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Receiver of a frame's "updated" notifications.
pub trait FrameObserver: Send + Sync {
    /// The observed frame changed; refresh from it.
    fn updated(&self);
}

/// An application state object that views can be bound to.
///
/// Implementors only provide access to their observer list. The runtime type
/// is what the view registry keys on; [`frame_type`](Self::frame_type) should
/// not be overridden.
pub trait Frame: Any + Send + Sync {
    /// The observer list of this frame.
    fn observers(&self) -> &FrameObservers;

    /// The runtime type of this frame.
    fn frame_type(&self) -> FrameType {
        FrameType::of::<Self>()
    }
}

impl dyn Frame {
    /// Whether this frame is an `F`.
    pub fn is<F: Frame>(&self) -> bool {
        self.frame_type().is::<F>()
    }

    /// Borrow this frame as its concrete type.
    pub fn downcast_ref<F: Frame>(&self) -> Option<&F> {
        (self as &dyn Any).downcast_ref::<F>()
    }

    /// Notify every observer of this frame.
    pub fn notify_updated(&self) -> usize {
        self.observers().notify_updated()
    }
}

/// Recover the concrete type of a shared frame.
pub fn downcast_frame<F: Frame>(frame: Arc<dyn Frame>) -> FrameResult<Arc<F>> {
    let got = frame.frame_type().name();
    let any: Arc<dyn Any + Send + Sync> = frame;
    any.downcast::<F>()
        .map_err(|_| FrameError::type_mismatch(std::any::type_name::<F>(), got))
}

#[derive(Debug, Default)]
struct ObserverStats {
    subscribed: AtomicUsize,
    released: AtomicUsize,
}

/// The observer list carried by every frame.
///
/// Observers are held weakly: a frame never keeps a view alive. Each
/// subscription is returned as a [`Subscription`] that unsubscribes when
/// released or dropped, so teardown on any path leaves no stale registration.
pub struct FrameObservers {
    updated: Signal<()>,
    stats: Arc<ObserverStats>,
}

impl Default for FrameObservers {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameObservers {
    /// Create an empty observer list.
    pub fn new() -> Self {
        Self {
            updated: Signal::new(),
            stats: Arc::new(ObserverStats::default()),
        }
    }

    /// Subscribe an observer.
    ///
    /// With `notify_immediately`, the observer receives one synchronous
    /// `updated()` before this returns so it can synchronize its initial
    /// state.
    pub fn subscribe(
        &self,
        observer: Weak<dyn FrameObserver>,
        notify_immediately: bool,
    ) -> Subscription {
        let target = observer.clone();
        let guard = self.updated.connect_scoped(move |_| {
            if let Some(observer) = target.upgrade() {
                observer.updated();
            }
        });
        self.stats.subscribed.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(
            target: targets::FRAME,
            connection = ?guard.id(),
            observer_count = self.observer_count(),
            "observer subscribed"
        );

        if notify_immediately {
            if let Some(observer) = observer.upgrade() {
                observer.updated();
            }
        }

        Subscription {
            guard: Some(guard),
            stats: self.stats.clone(),
        }
    }

    /// Notify all observers that the frame changed.
    ///
    /// Returns the number of observers notified.
    #[tracing::instrument(skip_all, target = "horizon_pilot_core::frame", level = "trace")]
    pub fn notify_updated(&self) -> usize {
        self.updated.emit(())
    }

    /// Number of live subscriptions.
    pub fn observer_count(&self) -> usize {
        self.updated.connection_count()
    }

    /// Total subscriptions ever made on this list.
    pub fn subscription_count(&self) -> usize {
        self.stats.subscribed.load(Ordering::SeqCst)
    }

    /// Total subscriptions released from this list.
    pub fn release_count(&self) -> usize {
        self.stats.released.load(Ordering::SeqCst)
    }

    /// Suppress notifications while `blocked` is true.
    pub fn set_blocked(&self, blocked: bool) {
        self.updated.set_blocked(blocked);
    }
}

impl fmt::Debug for FrameObservers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameObservers")
            .field("observers", &self.observer_count())
            .field("subscribed", &self.subscription_count())
            .field("released", &self.release_count())
            .finish()
    }
}

/// A live observer registration on a frame.
///
/// Unsubscribes exactly once: on [`release`](Self::release) or on drop,
/// whichever comes first.
pub struct Subscription {
    guard: Option<ConnectionGuard<()>>,
    stats: Arc<ObserverStats>,
}

impl Subscription {
    /// Whether this subscription still holds a registration.
    pub fn is_active(&self) -> bool {
        self.guard.is_some()
    }

    /// Unsubscribe now.
    ///
    /// Returns `false` if the frame's observer list no longer exists.
    pub fn release(mut self) -> bool {
        self.unsubscribe()
    }

    fn unsubscribe(&mut self) -> bool {
        let Some(guard) = self.guard.take() else {
            return false;
        };
        let connection = guard.id();
        let removed = guard.disconnect();
        if removed {
            self.stats.released.fetch_add(1, Ordering::SeqCst);
        }
        tracing::trace!(target: targets::FRAME, ?connection, removed, "observer released");
        removed
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

static_assertions::assert_impl_all!(FrameObservers: Send, Sync);
static_assertions::assert_impl_all!(Subscription: Send, Sync);
