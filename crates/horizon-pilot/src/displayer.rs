//! Display strategies.
//!
//! A [`Displayer`] knows what is on screen and performs the swap when the
//! type handler has a new view to show. Integrators can supply their own or
//! use [`DefaultDisplayer`].
//!
//! # Custom strategies
//!
//! A strategy that animates or staggers swaps must keep "current" equal to
//! the most recently requested view, even while an older transition is still
//! running. The type handler decides between reusing and rebuilding a view by
//! asking [`Displayer::is_view_visible_for_frame_type`]; if that answer lags
//! behind back-to-back requests the decision races.

use std::sync::Arc;

use horizon_pilot_core::logging::{span_names, targets};
use horizon_pilot_core::{FrameType, PerfSpan, ThreadAffinity};

use crate::backing::resolve_view_frame_type;
use crate::config::HandlerConfig;
use crate::container::{RootContainer, ViewContainer};
use crate::error::PilotResult;
use crate::view::{DisplayContext, View};

/// Where views currently appear on screen.
pub trait Displayer {
    /// Whether the current view is backed by `frame_type`.
    ///
    /// Returns `false` when nothing is displayed.
    fn is_view_visible_for_frame_type(&self, frame_type: FrameType) -> bool;

    /// Replace whatever is displayed with `view`, backed by a frame of
    /// `frame_type`.
    ///
    /// Exactly one view is present afterwards, unless `view` refused to
    /// attach, in which case nothing is. The type handler passes the frame
    /// type it resolved for the view's class, so strategies need not ask the
    /// view for it.
    fn make_visible(&mut self, view: Arc<dyn View>, frame_type: FrameType) -> PilotResult<()>;

    /// Context for constructing the next view.
    fn display_context(&self) -> DisplayContext;

    /// Remove all displayed content.
    fn clear_all(&mut self);
}

/// Single-slot display strategy over a root container.
///
/// The current view is whatever the container holds at slot 0. Swaps remove
/// every child and add the new one, without animation.
#[derive(Debug)]
pub struct DefaultDisplayer<C: ViewContainer = RootContainer> {
    root: C,
    affinity: ThreadAffinity,
    shown: Option<(Arc<dyn View>, FrameType)>,
}

impl DefaultDisplayer<RootContainer> {
    /// Create a displayer over a new, empty root container.
    pub fn with_root(name: impl Into<Arc<str>>) -> Self {
        Self::new(RootContainer::new(name))
    }

    /// Create a displayer over the root container named in `config`.
    ///
    /// A `thread_checks` override applies to this displayer and to the views
    /// it displays, not to the rest of the process.
    pub fn from_config(config: &HandlerConfig) -> Self {
        let mut context = DisplayContext::new(config.container.as_str());
        if let Some(enabled) = config.thread_checks {
            context = context.with_thread_checks(enabled);
        }
        Self::new(RootContainer::with_context(context))
    }
}

impl<C: ViewContainer> DefaultDisplayer<C> {
    /// Create a displayer managing `root`, sharing its context's affinity.
    pub fn new(root: C) -> Self {
        let affinity = root.context().affinity();
        Self {
            root,
            affinity,
            shown: None,
        }
    }

    /// The managed container.
    pub fn root(&self) -> &C {
        &self.root
    }

    /// The managed container, mutably.
    pub fn root_mut(&mut self) -> &mut C {
        &mut self.root
    }

    /// The view currently displayed.
    pub fn current_view(&self) -> Option<Arc<dyn View>> {
        self.root.child_at(0)
    }

    /// The frame type of the view currently displayed.
    ///
    /// This is the type recorded when the view was made visible. A view put
    /// into the container by other means is asked for its own frame type.
    pub fn current_frame_type(&self) -> Option<FrameType> {
        let current = self.current_view()?;
        match &self.shown {
            Some((view, frame_type)) if same_view(view, &current) => Some(*frame_type),
            _ => resolve_view_frame_type(current.as_ref()),
        }
    }

    /// Swap the displayed view for `view`, backed by a frame of `frame_type`.
    pub fn set_current_view(&mut self, view: Arc<dyn View>, frame_type: FrameType) -> PilotResult<()> {
        self.affinity.check("DefaultDisplayer::set_current_view");
        let _perf = PerfSpan::new(span_names::DISPLAY);

        let previous = self.current_view().map(|v| v.view_name());
        self.shown = None;
        self.root.remove_all_views();
        let next = view.view_name();
        self.root.add_view(view.clone())?;
        self.shown = Some((view, frame_type));
        tracing::debug!(
            target: targets::DISPLAY,
            ?previous,
            next,
            frame = frame_type.short_name(),
            "current view replaced"
        );
        Ok(())
    }
}

fn same_view(a: &Arc<dyn View>, b: &Arc<dyn View>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl<C: ViewContainer> Displayer for DefaultDisplayer<C> {
    fn is_view_visible_for_frame_type(&self, frame_type: FrameType) -> bool {
        self.current_frame_type() == Some(frame_type)
    }

    fn make_visible(&mut self, view: Arc<dyn View>, frame_type: FrameType) -> PilotResult<()> {
        self.set_current_view(view, frame_type)
    }

    fn display_context(&self) -> DisplayContext {
        self.root.context()
    }

    fn clear_all(&mut self) {
        self.affinity.check("DefaultDisplayer::clear_all");
        if self.root.child_count() == 0 {
            tracing::trace!(target: targets::DISPLAY, "clear_all on empty container");
        }
        self.shown = None;
        self.root.remove_all_views();
    }
}
