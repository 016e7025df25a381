//! The frame-to-view type handler.
//!
//! [`FrameViewHandler`] owns the mapping from frame type to view class and,
//! for each frame the stack asks about, decides whether the view on screen
//! already serves it or a new view must be built, bound and displayed.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_pilot::{
//!     BoxError, DefaultDisplayer, DisplayContext, Frame, FrameContent, FrameLayout,
//!     FrameObservers, FrameViewHandler, ViewClass, ViewContainer,
//! };
//!
//! struct HomeFrame {
//!     observers: FrameObservers,
//! }
//!
//! impl Frame for HomeFrame {
//!     fn observers(&self) -> &FrameObservers {
//!         &self.observers
//!     }
//! }
//!
//! struct HomeContent;
//!
//! impl FrameContent for HomeContent {
//!     type Frame = HomeFrame;
//!
//!     fn create(_context: &DisplayContext) -> Result<Self, BoxError> {
//!         Ok(HomeContent)
//!     }
//! }
//!
//! let mut handler = FrameViewHandler::new(
//!     [ViewClass::of::<FrameLayout<HomeContent>>()],
//!     DefaultDisplayer::with_root("main"),
//! )?;
//!
//! let home: Arc<dyn Frame> = Arc::new(HomeFrame { observers: FrameObservers::new() });
//! assert!(handler.present_if_handled(&home)?);
//! assert_eq!(handler.displayer().root().child_count(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use horizon_pilot_core::logging::{span_names, targets};
use horizon_pilot_core::{Frame, FrameType, PerfSpan};

use crate::backing::{resolve_frame_type, ViewClass};
use crate::config::{HandlerConfig, ViewCatalog};
use crate::displayer::{DefaultDisplayer, Displayer};
use crate::error::{ConfigError, ConfigResult, PilotResult};

/// The surface the frame stack drives.
///
/// Handlers compose: `Ok(false)` from
/// [`present_if_handled`](Self::present_if_handled) means "not mine, try the
/// next handler", never failure.
pub trait FrameTypeHandler {
    /// Present `frame` if this handler maps its type.
    fn present_if_handled(&mut self, frame: &Arc<dyn Frame>) -> PilotResult<bool>;

    /// Whether `frame`'s view fully covers the screen.
    fn is_frame_opaque(&self, _frame: &dyn Frame) -> bool {
        true
    }

    /// Remove everything this handler displays.
    fn clear_all(&mut self);

    /// Whether this handler maps `frame_type`.
    fn handles(&self, frame_type: FrameType) -> bool;
}

/// Maps frame types to view classes and presents frames through a [`Displayer`].
pub struct FrameViewHandler<D: Displayer = DefaultDisplayer> {
    displayer: D,
    mappings: HashMap<FrameType, ViewClass>,
    /// Frame types in registration order.
    order: Vec<FrameType>,
    translucent: HashSet<FrameType>,
}

impl<D: Displayer> FrameViewHandler<D> {
    /// Build a handler from top-level view classes and a display strategy.
    ///
    /// Fails if a class is not frame-backed, does not resolve to a frame type,
    /// or resolves to a frame type an earlier class already maps.
    pub fn new<I>(top_level_views: I, displayer: D) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = ViewClass>,
    {
        let mut mappings: HashMap<FrameType, ViewClass> = HashMap::new();
        let mut order = Vec::new();

        for class in top_level_views {
            if !class.is_frame_backed() {
                return Err(ConfigError::NotFrameBacked { view: class.name() });
            }
            let frame_type = resolve_frame_type(&class)?;
            if let Some(existing) = mappings.get(&frame_type) {
                return Err(ConfigError::DuplicateFrameType {
                    frame: frame_type,
                    existing: existing.name(),
                    duplicate: class.name(),
                });
            }
            tracing::debug!(
                target: targets::HANDLER,
                frame = frame_type.short_name(),
                view = class.name(),
                "registered top-level view"
            );
            order.push(frame_type);
            mappings.insert(frame_type, class);
        }

        Ok(Self {
            displayer,
            mappings,
            order,
            translucent: HashSet::new(),
        })
    }

    /// Build a handler from configuration, resolving view names in `catalog`.
    pub fn from_config(
        config: &HandlerConfig,
        catalog: &ViewCatalog,
        displayer: D,
    ) -> ConfigResult<Self> {
        let classes = config
            .top_level_views
            .iter()
            .map(|name| catalog.get(name).cloned())
            .collect::<ConfigResult<Vec<_>>>()?;
        let mut handler = Self::new(classes, displayer)?;

        for name in &config.translucent_frames {
            let frame_type = resolve_frame_type(catalog.get(name)?)?;
            if !handler.handles(frame_type) {
                return Err(ConfigError::NotTopLevel { name: name.clone() });
            }
            handler.mark_translucent_type(frame_type);
        }

        tracing::info!(
            target: targets::CONFIG,
            container = config.container.as_str(),
            views = handler.mapping_len(),
            translucent = handler.translucent.len(),
            "handler configured"
        );
        Ok(handler)
    }

    /// Present `frame` if its type is mapped.
    ///
    /// Returns `Ok(false)` without touching the displayer if the type is not
    /// mapped. If the displayer already shows a view for this frame *type*,
    /// nothing is built or rebound, even when `frame` is a different instance
    /// than the one the visible view is bound to. Otherwise a new view is
    /// built with the displayer's context, bound to `frame`, and made visible.
    #[tracing::instrument(
        skip_all,
        target = "horizon_pilot::handler",
        level = "trace",
        fields(frame = %frame.frame_type().short_name())
    )]
    pub fn present_if_handled(&mut self, frame: &Arc<dyn Frame>) -> PilotResult<bool> {
        let frame_type = frame.frame_type();
        let Some(class) = self.mappings.get(&frame_type) else {
            tracing::trace!(target: targets::HANDLER, "frame type not handled");
            return Ok(false);
        };

        if self.displayer.is_view_visible_for_frame_type(frame_type) {
            tracing::trace!(target: targets::HANDLER, "view for frame type already visible");
            return Ok(true);
        }

        let _perf = PerfSpan::new(span_names::PRESENT);
        let context = self.displayer.display_context();
        let view = class.create_bound(&context, frame)?;
        tracing::debug!(target: targets::HANDLER, view = class.name(), "created and bound view");

        self.displayer.make_visible(view, frame_type)?;
        Ok(true)
    }

    /// Whether `frame`'s view fully covers the screen.
    ///
    /// True unless the frame's type was marked translucent.
    pub fn is_frame_opaque(&self, frame: &dyn Frame) -> bool {
        !self.is_type_translucent(frame.frame_type())
    }

    /// Whether frames of `frame_type` were marked translucent.
    pub fn is_type_translucent(&self, frame_type: FrameType) -> bool {
        self.translucent.contains(&frame_type)
    }

    /// Report frames of type `F` as not covering the screen.
    pub fn mark_translucent<F: Frame>(&mut self) {
        self.mark_translucent_type(FrameType::of::<F>());
    }

    /// Report frames of `frame_type` as not covering the screen.
    pub fn mark_translucent_type(&mut self, frame_type: FrameType) {
        self.translucent.insert(frame_type);
    }

    /// Remove all displayed content.
    pub fn clear_all(&mut self) {
        tracing::debug!(target: targets::HANDLER, "clearing all views");
        self.displayer.clear_all();
    }

    /// Whether `frame_type` is mapped.
    pub fn handles(&self, frame_type: FrameType) -> bool {
        self.mappings.contains_key(&frame_type)
    }

    /// The view class mapped for `frame_type`.
    pub fn view_class_for(&self, frame_type: FrameType) -> Option<&ViewClass> {
        self.mappings.get(&frame_type)
    }

    /// Number of mapped frame types.
    pub fn mapping_len(&self) -> usize {
        self.mappings.len()
    }

    /// Mappings in registration order.
    pub fn mappings(&self) -> impl Iterator<Item = (FrameType, &ViewClass)> {
        self.order
            .iter()
            .filter_map(|frame_type| self.mappings.get(frame_type).map(|class| (*frame_type, class)))
    }

    /// The display strategy.
    pub fn displayer(&self) -> &D {
        &self.displayer
    }

    /// The display strategy, mutably.
    pub fn displayer_mut(&mut self) -> &mut D {
        &mut self.displayer
    }
}

impl<D: Displayer> FrameTypeHandler for FrameViewHandler<D> {
    fn present_if_handled(&mut self, frame: &Arc<dyn Frame>) -> PilotResult<bool> {
        FrameViewHandler::present_if_handled(self, frame)
    }

    fn is_frame_opaque(&self, frame: &dyn Frame) -> bool {
        FrameViewHandler::is_frame_opaque(self, frame)
    }

    fn clear_all(&mut self) {
        FrameViewHandler::clear_all(self);
    }

    fn handles(&self, frame_type: FrameType) -> bool {
        FrameViewHandler::handles(self, frame_type)
    }
}

impl<D: Displayer> fmt::Debug for FrameViewHandler<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameViewHandler")
            .field("mappings", &self.mapping_len())
            .field("translucent", &self.translucent.len())
            .finish()
    }
}
