//! The record driver contract.
//!
//! A record driver wraps the raw field data of one record and exposes it
//! through a uniform interface, whatever schema the data came from. The
//! [`RecordDriver`] trait holds the shared behavior as default methods; each
//! variant ([`DefaultRecord`](crate::default_driver::DefaultRecord),
//! [`MissingRecord`](crate::missing_driver::MissingRecord), ...) supplies its
//! identity and breadcrumb and overrides what it does differently.
//!
//! Drivers are built empty by a
//! [`RecordDriverFactory`](crate::driver_factory::RecordDriverFactory), filled
//! once through [`RecordDriver::set_raw_data`] and treated as read-only after
//! that, apart from extra details.

use crate::capability::{base_capability, Capability};
use crate::config::Config;
use crate::error::{Result, SearchError};
use crate::import::strip_articles;
use crate::related::{split_spec, RelatedPlugin, RelatedPluginManager};
use crate::storage::{Comment, ResourceKey, Storage, TagCount, TagQuery, User, UserList};
use crate::tags::parse_tags;
use crate::translator::Translator;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared handle to a record driver.
pub type RecordRef = Arc<dyn RecordDriver>;

/// Source tag of records from the main index.
pub const DEFAULT_RESOURCE_SOURCE: &str = "VuFind";

/// List parameter value asking for a new list.
pub const NEW_LIST: &str = "NEW";

/// Collaborators and configuration shared by every driver of a request.
#[derive(Debug, Default)]
pub struct DriverContext {
    main_config: Arc<Config>,
    record_config: Option<Arc<Config>>,
    storage: Option<Arc<dyn Storage>>,
    translator: Option<Arc<dyn Translator>>,
    related: Option<Arc<RelatedPluginManager>>,
}

impl DriverContext {
    /// Create a context around the main configuration.
    #[must_use]
    pub fn new(main_config: Arc<Config>) -> Self {
        DriverContext {
            main_config,
            ..Self::default()
        }
    }

    /// Use a separate record configuration (defaults to the main config).
    #[must_use]
    pub fn with_record_config(mut self, config: Arc<Config>) -> Self {
        self.record_config = Some(config);
        self
    }

    /// Attach the storage gateway.
    #[must_use]
    pub fn with_storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Attach a translator.
    #[must_use]
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Attach the related-record plugin registry.
    #[must_use]
    pub fn with_related_plugins(mut self, manager: Arc<RelatedPluginManager>) -> Self {
        self.related = Some(manager);
        self
    }

    /// The main configuration.
    #[must_use]
    pub fn main_config(&self) -> &Config {
        &self.main_config
    }

    /// The record configuration, or the main configuration if none was set.
    #[must_use]
    pub fn record_config(&self) -> &Config {
        self.record_config.as_deref().unwrap_or(&*self.main_config)
    }

    /// The storage gateway.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::MissingService`] if none is attached.
    pub fn storage(&self) -> Result<&dyn Storage> {
        self.storage
            .as_deref()
            .ok_or(SearchError::MissingService("storage"))
    }

    /// The related-record plugin registry.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::MissingService`] if none is attached.
    pub fn related_plugins(&self) -> Result<&RelatedPluginManager> {
        self.related
            .as_deref()
            .ok_or(SearchError::MissingService("related plugin manager"))
    }

    /// Translate `key`, or return it unchanged without a translator.
    #[must_use]
    pub fn translate(&self, key: &str) -> String {
        match &self.translator {
            Some(translator) => translator.translate(key),
            None => key.to_string(),
        }
    }
}

/// State common to every driver: raw fields, source tag and extra details.
#[derive(Debug, Clone)]
pub struct DriverCore {
    context: Arc<DriverContext>,
    fields: Value,
    resource_source: String,
    extra_details: IndexMap<String, Value>,
}

impl DriverCore {
    /// Create empty driver state tagged with `resource_source`.
    #[must_use]
    pub fn new(context: Arc<DriverContext>, resource_source: impl Into<String>) -> Self {
        DriverCore {
            context,
            fields: Value::Object(serde_json::Map::new()),
            resource_source: resource_source.into(),
            extra_details: IndexMap::new(),
        }
    }

    /// The shared context.
    #[must_use]
    pub fn context(&self) -> &DriverContext {
        &self.context
    }

    /// Raw field data.
    #[must_use]
    pub fn fields(&self) -> &Value {
        &self.fields
    }

    /// First value of a field: the string itself, or the first string of a
    /// multi-valued field.
    #[must_use]
    pub fn first_value(&self, name: &str) -> Option<&str> {
        match self.fields.get(name)? {
            Value::String(s) => Some(s.as_str()),
            Value::Array(items) => items.iter().find_map(Value::as_str),
            _ => None,
        }
    }

    /// All string values of a field.
    #[must_use]
    pub fn values(&self, name: &str) -> Vec<&str> {
        match self.fields.get(name) {
            Some(Value::String(s)) => vec![s.as_str()],
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn set_resource_source(&mut self, source: impl Into<String>) {
        self.resource_source = source.into();
    }
}

/// Parameters of a "save to favorites" request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteParams {
    /// Target list ID; `None`, empty, `"0"` or `"NEW"` creates a new list
    pub list: Option<String>,
    /// Space-separated tags, quoted phrases allowed
    pub mytags: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Access to a driver as a trait object from default methods.
pub trait AsRecordDriver {
    /// This driver as `&dyn RecordDriver`.
    fn as_record_driver(&self) -> &dyn RecordDriver;
}

impl<T: RecordDriver> AsRecordDriver for T {
    fn as_record_driver(&self) -> &dyn RecordDriver {
        self
    }
}

/// Uniform contract over records of any schema.
pub trait RecordDriver: AsRecordDriver + fmt::Debug + Send + Sync {
    /// Shared driver state.
    fn core(&self) -> &DriverCore;

    /// Shared driver state, mutable.
    fn core_mut(&mut self) -> &mut DriverCore;

    /// Unique ID of the record within its source.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidRecord`] if the raw data carries no ID.
    fn unique_id(&self) -> Result<String>;

    /// Short text identifying the record in breadcrumbs.
    fn breadcrumb(&self) -> String;

    /// Replace the raw field data. This is the only way to populate a driver.
    fn set_raw_data(&mut self, data: Value) {
        self.core_mut().fields = data;
    }

    /// Raw field data.
    fn raw_data(&self) -> &Value {
        self.core().fields()
    }

    /// Source tag scoping this record's storage keys.
    fn resource_source(&self) -> &str {
        &self.core().resource_source
    }

    /// Storage key `(unique ID, source tag)`.
    ///
    /// # Errors
    ///
    /// Fails when [`unique_id`](Self::unique_id) fails.
    fn resource_key(&self) -> Result<ResourceKey> {
        Ok(ResourceKey::new(self.unique_id()?, self.resource_source()))
    }

    /// Breadcrumb lower-cased with one leading article removed.
    fn sort_title(&self) -> String {
        strip_articles(&self.breadcrumb())
    }

    /// Comments on this record.
    ///
    /// # Errors
    ///
    /// Returns storage errors, or [`SearchError::MissingService`] without storage.
    fn comments(&self) -> Result<Vec<Comment>> {
        self.core()
            .context()
            .storage()?
            .comments_for_resource(&self.resource_key()?)
    }

    /// Tags on this record.
    ///
    /// # Errors
    ///
    /// Returns storage errors, or [`SearchError::MissingService`] without storage.
    fn tags(&self, query: &TagQuery) -> Result<Vec<TagCount>> {
        self.core()
            .context()
            .storage()?
            .tags_for_resource(&self.resource_key()?, query)
    }

    /// Tag this record on behalf of `user`. `tags` is a raw tag string.
    ///
    /// # Errors
    ///
    /// Returns storage errors, or [`SearchError::MissingService`] without storage.
    fn add_tags(&self, user: &User, tags: &str) -> Result<()> {
        let storage = self.core().context().storage()?;
        let key = self.resource_key()?;
        let resource = storage
            .find_resource(&key, true, Some(self.as_record_driver()))?
            .ok_or_else(|| SearchError::Storage(format!("could not create resource {key}")))?;
        for tag in parse_tags(tags) {
            storage.add_tag(&resource, &tag, user)?;
        }
        Ok(())
    }

    /// Save this record to one of `user`'s lists.
    ///
    /// Resolves the list (creating a "My Favorites" list when `params.list` is
    /// absent, empty, `"0"` or `"NEW"`), finds or creates the stored resource, then
    /// saves it with the parsed tags and notes. The steps are not undone if a
    /// later one fails.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::LoginRequired`] without a user,
    /// [`SearchError::InvalidArgument`] for a malformed list ID, and any
    /// storage error.
    fn save_to_favorites(&self, params: &FavoriteParams, user: Option<&User>) -> Result<()> {
        let user =
            user.ok_or_else(|| SearchError::LoginRequired("You must be logged in first".into()))?;
        let storage = self.core().context().storage()?;

        let list = match params.list.as_deref() {
            None | Some("" | "0" | NEW_LIST) => {
                storage.create_list(user, &self.translate("My Favorites"))?
            }
            Some(list_id) => {
                let list_id = list_id.trim().parse::<u64>().map_err(|_| {
                    SearchError::InvalidArgument(format!("invalid list id: {list_id}"))
                })?;
                let list = storage.existing_list(list_id)?;
                storage.remember_last_used(&list)?;
                list
            }
        };

        let key = self.resource_key()?;
        let resource = storage
            .find_resource(&key, true, Some(self.as_record_driver()))?
            .ok_or_else(|| SearchError::Storage(format!("could not create resource {key}")))?;

        let tags = params
            .mytags
            .as_deref()
            .map(|tags| parse_tags(tags.trim()))
            .unwrap_or_default();
        let notes = params.notes.as_deref().unwrap_or("");
        debug!(%key, list = list.id, tags = tags.len(), "saving record to list");
        storage.save_resource(user, &resource, &list, &tags, notes)
    }

    /// Non-empty notes saved with this record.
    ///
    /// # Errors
    ///
    /// Returns storage errors, or [`SearchError::MissingService`] without storage.
    fn list_notes(&self, list_id: Option<u64>, user_id: Option<u64>) -> Result<Vec<String>> {
        let saved = self
            .core()
            .context()
            .storage()?
            .saved_data(&self.resource_key()?, list_id, user_id)?;
        Ok(saved
            .into_iter()
            .filter(|entry| !entry.notes.is_empty())
            .map(|entry| entry.notes)
            .collect())
    }

    /// Lists containing this record.
    ///
    /// # Errors
    ///
    /// Returns storage errors, or [`SearchError::MissingService`] without storage.
    fn containing_lists(&self, user_id: Option<u64>) -> Result<Vec<UserList>> {
        self.core()
            .context()
            .storage()?
            .lists_containing_resource(&self.resource_key()?, user_id)
    }

    /// Build and initialize related-record plugins.
    ///
    /// `types` defaults to the record config's `Record.related` list. Each spec
    /// is `name` or `name:params`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnknownPluginType`] for an unregistered name,
    /// [`SearchError::MissingService`] if plugins are requested without a
    /// registry, or any error from a plugin's `init`.
    fn related(&self, types: Option<&[String]>) -> Result<Vec<Box<dyn RelatedPlugin>>> {
        let configured;
        let types = if let Some(types) = types {
            types
        } else {
            configured = self.core().context().record_config().related_types();
            configured.as_slice()
        };

        let mut plugins = Vec::with_capacity(types.len());
        for spec in types {
            let (name, params) = split_spec(spec);
            let manager = self.core().context().related_plugins()?;
            let Some(mut plugin) = manager.get(name) else {
                warn!(plugin = name, "unknown related record plugin");
                return Err(SearchError::UnknownPluginType(name.to_string()));
            };
            plugin.init(params, self.as_record_driver())?;
            debug!(plugin = name, "initialized related record plugin");
            plugins.push(plugin);
        }
        Ok(plugins)
    }

    /// Whether OpenURL links should show in `area` (`results`, `record`,
    /// `holdings`, ...).
    ///
    /// False when no resolver is configured; otherwise `OpenURL.show_in_<area>`
    /// if set; otherwise true only for `results`.
    fn open_url_active(&self, area: &str) -> bool {
        let config = self.core().context().main_config();
        if config.open_url_url().is_none() {
            return false;
        }
        if let Some(flag) = config.open_url_flag(&format!("show_in_{area}")) {
            return flag;
        }
        area == "results"
    }

    /// Whether OpenURL links replace the record's other links
    /// (`OpenURL.replace_other_urls`, default false).
    fn replace_urls_with_open_url(&self) -> bool {
        self.core()
            .context()
            .main_config()
            .open_url_flag("replace_other_urls")
            .unwrap_or(false)
    }

    /// Whether item status can be loaded asynchronously.
    fn supports_ajax_status(&self) -> bool {
        false
    }

    /// Citation formats this record can be rendered in.
    fn citation_formats(&self) -> Vec<String> {
        Vec::new()
    }

    /// Attach a request-scoped annotation.
    fn set_extra_detail(&mut self, key: &str, value: Value) {
        self.core_mut().extra_details.insert(key.to_string(), value);
    }

    /// Read a request-scoped annotation.
    fn extra_detail(&self, key: &str) -> Option<&Value> {
        self.core().extra_details.get(key)
    }

    /// Translate `key` through the context's translator.
    fn translate(&self, key: &str) -> String {
        self.core().context().translate(key)
    }

    /// Answer a capability query. Drivers override this to add
    /// schema-specific capabilities and delegate the rest to
    /// [`base_capability`].
    fn capability(&self, capability: Capability, args: &[Value]) -> Option<Value> {
        base_capability(self.as_record_driver(), capability, args)
    }

    /// Look up a capability by name; unknown names and unsupported capabilities
    /// yield `None`.
    fn try_method(&self, name: &str, args: &[Value]) -> Option<Value> {
        let capability = name.parse::<Capability>().ok()?;
        self.capability(capability, args)
    }
}
