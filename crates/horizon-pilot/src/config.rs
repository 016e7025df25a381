//! Handler configuration.
//!
//! A [`HandlerConfig`] names the views a handler presents; a [`ViewCatalog`]
//! maps those names to [`ViewClass`] descriptors registered in code.
//!
//! ```toml
//! container = "main"
//! top_level_views = ["login", "home"]
//! translucent_frames = ["home"]
//! thread_checks = true
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use horizon_pilot_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::backing::ViewClass;
use crate::error::{ConfigError, ConfigResult};
use crate::view::{CreateView, FrameBackedView};

/// Name of the root container when none is configured.
pub const DEFAULT_CONTAINER: &str = "root";

/// Serializable description of a type handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// Name of the root container views are shown in.
    pub container: String,
    /// Catalog names of the top-level views, in registration order.
    pub top_level_views: Vec<String>,
    /// Catalog names of top-level views whose frames do not cover the screen.
    pub translucent_frames: Vec<String>,
    /// Overrides whether thread-affinity checks run for the displayer built
    /// from this configuration and its views. Unset keeps the process default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_checks: Option<bool>,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            container: DEFAULT_CONTAINER.to_string(),
            top_level_views: Vec::new(),
            translucent_frames: Vec::new(),
            thread_checks: None,
        }
    }
}

impl HandlerConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(
            target: targets::CONFIG,
            path = %path.display(),
            views = config.top_level_views.len(),
            "loaded handler configuration"
        );
        Ok(config)
    }

    /// Serialize to pretty-printed TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Named view classes that configurations can refer to.
#[derive(Debug, Clone, Default)]
pub struct ViewCatalog {
    classes: BTreeMap<String, ViewClass>,
}

impl ViewCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed frame-backed view under `name`.
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register<V>(&mut self, name: impl Into<String>) -> &mut Self
    where
        V: FrameBackedView + CreateView,
    {
        self.register_class(name, ViewClass::of::<V>())
    }

    /// Register an explicit descriptor under `name`.
    pub fn register_class(&mut self, name: impl Into<String>, class: ViewClass) -> &mut Self {
        let name = name.into();
        if let Some(previous) = self.classes.insert(name.clone(), class) {
            tracing::warn!(
                target: targets::CONFIG,
                name = name.as_str(),
                previous = previous.name(),
                "catalog entry replaced"
            );
        }
        self
    }

    /// Look up the class registered under `name`.
    pub fn get(&self, name: &str) -> ConfigResult<&ViewClass> {
        self.classes.get(name).ok_or_else(|| ConfigError::UnknownView {
            name: name.to_string(),
        })
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }
}
