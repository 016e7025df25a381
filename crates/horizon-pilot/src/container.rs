//! Root containers: where views are attached.
//!
//! [`ViewContainer`] is the seam to the windowing system. A container owns an
//! ordered list of child views and is responsible for firing
//! [`View::attached`] and [`View::detached`] exactly once per transition.
//! [`RootContainer`] is the in-process implementation used by the default
//! display strategy.

use std::fmt;
use std::sync::Arc;

use horizon_pilot_core::logging::targets;
use horizon_pilot_core::Signal;

use crate::error::PilotResult;
use crate::view::{DisplayContext, View};

/// A container of views, attached to the screen.
pub trait ViewContainer: Send {
    /// Context used to construct views shown in this container.
    fn context(&self) -> DisplayContext;

    /// Number of children.
    fn child_count(&self) -> usize;

    /// Child at `index`, in insertion order.
    fn child_at(&self, index: usize) -> Option<Arc<dyn View>>;

    /// Append and attach a child.
    ///
    /// If the view refuses to attach, it is not added.
    fn add_view(&mut self, view: Arc<dyn View>) -> PilotResult<()>;

    /// Detach and remove every child.
    fn remove_all_views(&mut self);
}

/// In-process root container.
///
/// # Signals
///
/// - `child_added(usize)`: emitted with the new child's index after it attached
/// - `children_cleared(usize)`: emitted with the number of children removed
pub struct RootContainer {
    context: DisplayContext,
    children: Vec<Arc<dyn View>>,

    /// Signal emitted after a child is attached.
    pub child_added: Signal<usize>,

    /// Signal emitted after all children were removed.
    pub children_cleared: Signal<usize>,
}

impl RootContainer {
    /// Create an empty root container.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self::with_context(DisplayContext::new(name))
    }

    /// Create an empty root container handing out `context` to its views.
    pub fn with_context(context: DisplayContext) -> Self {
        Self {
            context,
            children: Vec::new(),
            child_added: Signal::new(),
            children_cleared: Signal::new(),
        }
    }

    /// Whether the container has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterate over children in order.
    pub fn children(&self) -> impl Iterator<Item = &Arc<dyn View>> {
        self.children.iter()
    }
}

impl ViewContainer for RootContainer {
    fn context(&self) -> DisplayContext {
        self.context.clone()
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child_at(&self, index: usize) -> Option<Arc<dyn View>> {
        self.children.get(index).cloned()
    }

    fn add_view(&mut self, view: Arc<dyn View>) -> PilotResult<()> {
        view.clone().attached()?;
        tracing::debug!(
            target: targets::DISPLAY,
            container = self.context.container_name(),
            view = view.view_name(),
            "view attached to container"
        );
        self.children.push(view);
        self.child_added.emit(self.children.len() - 1);
        Ok(())
    }

    fn remove_all_views(&mut self) {
        let removed = std::mem::take(&mut self.children);
        for view in &removed {
            view.detached();
        }
        if !removed.is_empty() {
            tracing::debug!(
                target: targets::DISPLAY,
                container = self.context.container_name(),
                removed = removed.len(),
                "container cleared"
            );
            self.children_cleared.emit(removed.len());
        }
    }
}

impl fmt::Debug for RootContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.children.iter().map(|v| v.view_name()).collect();
        f.debug_struct("RootContainer")
            .field("context", &self.context)
            .field("children", &names)
            .finish()
    }
}

static_assertions::assert_impl_all!(RootContainer: Send, Sync);
