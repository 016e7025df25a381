//! Thread affinity verification for Horizon Pilot.
//!
//! Presentation state (the current view of a display strategy, view
//! lifecycle) is owned by a single UI thread. [`ThreadAffinity`] records the
//! thread an object was created on and lets later calls verify they run on
//! that same thread.
//!
//! ```
//! use horizon_pilot_core::thread_check::ThreadAffinity;
//!
//! struct Slot {
//!     affinity: ThreadAffinity,
//!     value: std::cell::Cell<i32>,
//! }
//!
//! impl Slot {
//!     fn set(&self, v: i32) {
//!         self.affinity.check("Slot::set");
//!         self.value.set(v);
//!     }
//! }
//!
//! let slot = Slot { affinity: ThreadAffinity::current(), value: std::cell::Cell::new(0) };
//! slot.set(3);
//! ```
//!
//! Checks are enabled by default in debug builds and disabled in release
//! builds. [`set_thread_checks_enabled`] overrides that for the whole
//! process; [`ThreadAffinity::with_checks`] overrides it for one owner and
//! everything that copies its affinity.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::ThreadId;

/// Flag to enable/disable runtime thread checks globally.
static THREAD_CHECKS_ENABLED: AtomicBool = AtomicBool::new(cfg!(debug_assertions));

/// Enable or disable runtime thread checks.
pub fn set_thread_checks_enabled(enabled: bool) {
    THREAD_CHECKS_ENABLED.store(enabled, Ordering::SeqCst);
}

/// Check if runtime thread checks are currently enabled.
#[inline]
pub fn are_thread_checks_enabled() -> bool {
    THREAD_CHECKS_ENABLED.load(Ordering::Relaxed)
}

/// Thread affinity tracker.
///
/// Records the thread on which an object was created and verifies that
/// subsequent operations occur on the same thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
    /// Per-owner override of the global flag.
    checks: Option<bool>,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Create a new thread affinity tracker for the current thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
            checks: None,
        }
    }

    /// This affinity with checks forced on or off, ignoring the global flag.
    #[inline]
    pub fn with_checks(self, enabled: bool) -> Self {
        Self {
            checks: Some(enabled),
            ..self
        }
    }

    /// Whether [`check`](Self::check) asserts for this affinity.
    #[inline]
    pub fn checks_enabled(&self) -> bool {
        self.checks.unwrap_or_else(are_thread_checks_enabled)
    }

    /// Get the thread ID this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Check if the current thread matches this affinity.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Assert that we are on the same thread as the affinity, regardless of
    /// the global flag.
    ///
    /// # Panics
    ///
    /// Panics with a descriptive message if called from a different thread.
    pub fn assert_same_thread(&self, operation: &str) {
        if !self.is_same_thread() {
            self.panic_wrong_thread(operation);
        }
    }

    /// Assert thread affinity only when thread checks are enabled.
    ///
    /// # Panics
    ///
    /// Panics if checks are enabled and called from a different thread.
    #[inline]
    pub fn check(&self, operation: &str) {
        if self.checks_enabled() {
            self.assert_same_thread(operation);
        }
    }

    #[cold]
    #[inline(never)]
    fn panic_wrong_thread(&self, operation: &str) -> ! {
        let current = std::thread::current();
        let current_name = current.name().unwrap_or("<unnamed>");
        let current_id = current.id();

        panic!(
            "\n\
            ══════════════════════════════════════════════════════════════════════\n\
            THREAD AFFINITY VIOLATION\n\
            ══════════════════════════════════════════════════════════════════════\n\
            \n\
            {operation} must run on the UI thread.\n\
            \n\
            Owner was created on thread: {:?}\n\
            Current thread: \"{current_name}\" (ID: {current_id:?})\n\
            \n\
            Frame presentation, display strategy swaps and view attach/detach\n\
            all mutate single-threaded state. Serialize these calls onto the\n\
            thread that built the handler.\n\
            \n\
            ══════════════════════════════════════════════════════════════════════",
            self.thread_id
        )
    }
}
