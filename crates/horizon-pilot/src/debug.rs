//! Human-readable dumps of a handler's frame-to-view table.

use std::fmt;

use horizon_pilot_core::{short_type_name, FrameType};

use crate::backing::{Backing, ViewClass};
use crate::displayer::Displayer;
use crate::handler::FrameViewHandler;

/// Characters used to draw base-class chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingStyle {
    /// ASCII characters.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// One line per mapping, no chains.
    Compact,
}

/// Configuration for [`MappingDebug`] output.
#[derive(Debug, Clone)]
pub struct MappingFormatOptions {
    /// The style of chain visualization.
    pub style: MappingStyle,
    /// Whether to print each view class's base chain.
    pub show_lineage: bool,
    /// Whether to print full type paths instead of bare type names.
    pub full_names: bool,
}

impl Default for MappingFormatOptions {
    fn default() -> Self {
        Self {
            style: MappingStyle::default(),
            show_lineage: true,
            full_names: false,
        }
    }
}

impl MappingFormatOptions {
    /// Options for a one-line-per-mapping summary.
    pub fn minimal() -> Self {
        Self {
            style: MappingStyle::Compact,
            show_lineage: false,
            full_names: false,
        }
    }
}

/// Formats the mappings of a [`FrameViewHandler`], in registration order.
///
/// ```text
/// Frame mappings (2):
///   LoginFrame -> LoginView
///   HomeFrame -> HomeView [translucent]
///   └── GenericPage<P> (unbound P)
/// ```
#[derive(Debug, Clone, Default)]
pub struct MappingDebug {
    options: MappingFormatOptions,
}

impl MappingDebug {
    /// Create a formatter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a formatter with custom options.
    pub fn with_options(options: MappingFormatOptions) -> Self {
        Self { options }
    }

    /// Format `handler`'s table into a string.
    pub fn format<D: Displayer>(&self, handler: &FrameViewHandler<D>) -> String {
        self.display(handler).to_string()
    }

    /// A [`fmt::Display`] adapter over `handler`'s table.
    pub fn display<'a, D: Displayer>(
        &'a self,
        handler: &'a FrameViewHandler<D>,
    ) -> impl fmt::Display + 'a {
        MappingTable {
            options: &self.options,
            handler,
        }
    }
}

struct MappingTable<'a, D: Displayer> {
    options: &'a MappingFormatOptions,
    handler: &'a FrameViewHandler<D>,
}

impl<D: Displayer> MappingTable<'_, D> {
    fn type_name(&self, full: &'static str) -> &'static str {
        if self.options.full_names {
            return full;
        }
        short_type_name(full)
    }

    fn frame_name(&self, frame_type: FrameType) -> &'static str {
        if self.options.full_names {
            frame_type.name()
        } else {
            frame_type.short_name()
        }
    }

    fn write_lineage(&self, f: &mut fmt::Formatter<'_>, class: &ViewClass) -> fmt::Result {
        let bases: Vec<&ViewClass> = class.lineage().skip(1).collect();
        let (branch, last) = match self.options.style {
            MappingStyle::Ascii => ("+--", "`--"),
            MappingStyle::Unicode => ("\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            MappingStyle::Compact => return Ok(()),
        };

        for (i, base) in bases.iter().enumerate() {
            let connector = if i + 1 == bases.len() { last } else { branch };
            write!(f, "  {connector} {}", self.type_name(base.name()))?;
            match base.backing() {
                Backing::Undeclared => {}
                Backing::Unbound(param) => write!(f, " (unbound {param})")?,
                Backing::Bound(frame_type) => write!(f, " (bound {})", self.frame_name(frame_type))?,
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<D: Displayer> fmt::Display for MappingTable<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Frame mappings ({}):", self.handler.mapping_len())?;
        if self.handler.mapping_len() == 0 {
            return writeln!(f, "  (empty)");
        }

        for (frame_type, class) in self.handler.mappings() {
            write!(
                f,
                "  {} -> {}",
                self.frame_name(frame_type),
                self.type_name(class.name())
            )?;
            if self.handler.is_type_translucent(frame_type) {
                f.write_str(" [translucent]")?;
            }
            writeln!(f)?;
            if self.options.show_lineage {
                self.write_lineage(f, class)?;
            }
        }
        Ok(())
    }
}
