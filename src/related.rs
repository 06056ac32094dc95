//! Related-record plugins ("similar items", "other editions", ...).
//!
//! A record config lists plugin specs such as `Similar` or `Editions:5`. The
//! [`RelatedPluginManager`] maps plugin names to constructors; a driver resolves
//! each spec, builds the plugin and initializes it with the spec's parameters
//! and the record itself.

use crate::error::Result;
use crate::record_driver::RecordDriver;
use indexmap::IndexMap;
use std::fmt;

/// A related-record plugin instance.
pub trait RelatedPlugin: fmt::Debug + Send {
    /// Prepare the plugin for `driver`. `params` is the part of the spec after
    /// the first colon, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the plugin cannot be set up for this record.
    fn init(&mut self, params: Option<&str>, driver: &dyn RecordDriver) -> Result<()>;

    /// Plugin name as registered.
    fn name(&self) -> &str;
}

/// Constructor for a related-record plugin.
pub type RelatedPluginConstructor = dyn Fn() -> Box<dyn RelatedPlugin> + Send + Sync;

/// Registry of related-record plugins by name.
#[derive(Default)]
pub struct RelatedPluginManager {
    constructors: IndexMap<String, Box<RelatedPluginConstructor>>,
}

impl fmt::Debug for RelatedPluginManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelatedPluginManager")
            .field("plugins", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl RelatedPluginManager {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin constructor under `name`, replacing any earlier one.
    #[must_use]
    pub fn with_plugin<F>(mut self, name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn() -> Box<dyn RelatedPlugin> + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Box::new(constructor));
        self
    }

    /// Whether a plugin is registered under `name`.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Build a fresh, uninitialized plugin.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Box<dyn RelatedPlugin>> {
        self.constructors.get(name).map(|construct| construct())
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }
}

/// Split a plugin spec into its name and parameters.
///
/// Only the segment between the first and second colon is kept as the
/// parameters: `Editions:5:extra` yields `("Editions", Some("5"))`.
#[must_use]
pub fn split_spec(spec: &str) -> (&str, Option<&str>) {
    let mut parts = spec.split(':');
    let name = parts.next().unwrap_or_default();
    (name, parts.next())
}
