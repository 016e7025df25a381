//! Logging and tracing facilities for Horizon Pilot.
//!
//! Horizon Pilot uses the `tracing` crate for instrumentation. The library
//! never installs a subscriber; to see logs, install one in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_pilot=debug,horizon_pilot_core=trace")
//!         .init();
//! }
//! ```
//!
//! Use the constants in [`targets`] to filter by subsystem.

/// Span names used throughout Horizon Pilot for tracing.
pub mod span_names {
    /// Frame presentation (resolve, create, bind, display).
    pub const PRESENT: &str = "horizon_pilot::present";
    /// Display strategy swap.
    pub const DISPLAY: &str = "horizon_pilot::display";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "horizon_pilot_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_pilot_core::signal";
    /// Frame observer lists.
    pub const FRAME: &str = "horizon_pilot_core::frame";
    /// Frame-to-view type handler.
    pub const HANDLER: &str = "horizon_pilot::handler";
    /// Display strategies and root containers.
    pub const DISPLAY: &str = "horizon_pilot::displayer";
    /// View lifecycle (bind, attach, detach).
    pub const VIEW: &str = "horizon_pilot::view";
    /// Configuration loading.
    pub const CONFIG: &str = "horizon_pilot::config";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Useful for tracking the duration of an operation.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span named after `operation`.
    pub fn new(operation: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_pilot::perf", "perf", operation);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_are_namespaced() {
        for target in [targets::SIGNAL, targets::FRAME] {
            assert!(target.starts_with(targets::CORE));
        }
        for target in [targets::HANDLER, targets::DISPLAY, targets::VIEW, targets::CONFIG] {
            assert!(target.starts_with("horizon_pilot::"));
        }
    }

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new(span_names::PRESENT);
    }
}
