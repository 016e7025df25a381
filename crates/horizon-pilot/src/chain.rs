//! Ordered composition of type handlers.
//!
//! A frame stack usually owns several handlers, one per region of the
//! screen. [`HandlerChain`] offers each frame to its handlers in order and
//! stops at the first that takes it.

use std::fmt;
use std::sync::Arc;

use horizon_pilot_core::logging::targets;
use horizon_pilot_core::{Frame, FrameType};

use crate::error::{PilotError, PilotResult};
use crate::handler::FrameTypeHandler;

/// Handlers consulted in insertion order.
#[derive(Default)]
pub struct HandlerChain {
    handlers: Vec<Box<dyn FrameTypeHandler>>,
}

impl HandlerChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler.
    pub fn push(&mut self, handler: impl FrameTypeHandler + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, handler: impl FrameTypeHandler + 'static) -> Self {
        self.push(handler);
        self
    }

    /// Number of handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the chain has no handlers.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Present `frame` with the first handler that takes it.
    ///
    /// Returns the index of that handler, or [`PilotError::Unhandled`] if
    /// none does.
    pub fn present(&mut self, frame: &Arc<dyn Frame>) -> PilotResult<usize> {
        for (index, handler) in self.handlers.iter_mut().enumerate() {
            if handler.present_if_handled(frame)? {
                tracing::trace!(target: targets::HANDLER, index, "frame presented by handler");
                return Ok(index);
            }
        }
        Err(PilotError::Unhandled {
            frame: frame.frame_type(),
        })
    }

    /// Opacity as reported by the first handler that maps the frame's type.
    ///
    /// Frames no handler maps are opaque.
    pub fn is_frame_opaque(&self, frame: &dyn Frame) -> bool {
        let frame_type = frame.frame_type();
        self.handlers
            .iter()
            .find(|handler| handler.handles(frame_type))
            .is_none_or(|handler| handler.is_frame_opaque(frame))
    }

    /// Clear every handler.
    pub fn clear_all(&mut self) {
        for handler in &mut self.handlers {
            handler.clear_all();
        }
    }
}

impl FrameTypeHandler for HandlerChain {
    fn present_if_handled(&mut self, frame: &Arc<dyn Frame>) -> PilotResult<bool> {
        match self.present(frame) {
            Ok(_) => Ok(true),
            Err(PilotError::Unhandled { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn is_frame_opaque(&self, frame: &dyn Frame) -> bool {
        HandlerChain::is_frame_opaque(self, frame)
    }

    fn clear_all(&mut self) {
        HandlerChain::clear_all(self);
    }

    fn handles(&self, frame_type: FrameType) -> bool {
        self.handlers.iter().any(|handler| handler.handles(frame_type))
    }
}

impl fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerChain")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
