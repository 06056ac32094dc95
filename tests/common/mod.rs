//! Common test helpers and utilities shared across test suite.

use findcore::error::{BackendError, Result, SearchError};
use findcore::{
    BrowsePage, BrowseResponse, Comment, DriverContext, QueryNode, RecordDriver, RelatedPlugin,
    RelatedPluginManager, Resource, ResourceKey, SavedData, SearchBackend, Storage, TagCount,
    TagQuery, User, UserList,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// A storage call as seen by [`InMemoryStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum StorageCall {
    CreateList(String),
    ExistingList(u64),
    RememberLastUsed(u64),
    FindResource { key: ResourceKey, create: bool },
    AddTag(String),
    SaveResource {
        list_id: u64,
        tags: Vec<String>,
        notes: String,
    },
}

/// In-memory storage gateway that records every write.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    pub calls: Mutex<Vec<StorageCall>>,
    pub resources: Mutex<Vec<Resource>>,
    pub lists: Mutex<Vec<UserList>>,
    pub saved: Mutex<Vec<(ResourceKey, SavedData)>>,
    pub comments: Mutex<Vec<(ResourceKey, Comment)>>,
    /// Name of a storage operation that fails with [`SearchError::Storage`].
    pub failing: Option<&'static str>,
}

#[allow(dead_code)]
impl InMemoryStorage {
    /// Pre-populate a resource row, e.g. to remember a title.
    pub fn with_resource(self, key: ResourceKey, title: &str) -> Self {
        {
            let mut resources = self.resources.lock().unwrap();
            let id = resources.len() as u64 + 1;
            resources.push(Resource {
                id,
                key,
                title: title.to_string(),
            });
        }
        self
    }

    /// Pre-populate a list.
    pub fn with_list(self, id: u64, user_id: u64, title: &str) -> Self {
        self.lists.lock().unwrap().push(UserList {
            id,
            user_id,
            title: title.to_string(),
        });
        self
    }

    /// Pre-populate a saved entry.
    pub fn with_saved(self, key: ResourceKey, list_id: u64, user_id: u64, notes: &str) -> Self {
        self.saved.lock().unwrap().push((
            key,
            SavedData {
                list_id,
                user_id,
                notes: notes.to_string(),
            },
        ));
        self
    }

    pub fn calls(&self) -> Vec<StorageCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Make the named operation (e.g. `"find_resource"`) fail.
    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.failing = Some(operation);
        self
    }

    fn record(&self, call: StorageCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, operation: &str) -> Result<()> {
        match self.failing {
            Some(failing) if failing == operation => {
                Err(SearchError::Storage(format!("{operation} unavailable")))
            }
            _ => Ok(()),
        }
    }
}

impl Storage for InMemoryStorage {
    fn comments_for_resource(&self, key: &ResourceKey) -> Result<Vec<Comment>> {
        Ok(self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, c)| c.clone())
            .collect())
    }

    fn tags_for_resource(&self, key: &ResourceKey, _query: &TagQuery) -> Result<Vec<TagCount>> {
        let resources = self.resources.lock().unwrap();
        let Some(resource) = resources.iter().find(|r| &r.key == key) else {
            return Ok(Vec::new());
        };
        let mut counts: Vec<TagCount> = Vec::new();
        for call in self.calls.lock().unwrap().iter() {
            if let StorageCall::AddTag(entry) = call {
                let (id, tag) = entry.split_once(':').unwrap();
                if id.parse::<u64>().unwrap() != resource.id {
                    continue;
                }
                match counts.iter_mut().find(|c| c.tag == tag) {
                    Some(count) => count.count += 1,
                    None => counts.push(TagCount {
                        tag: tag.to_string(),
                        count: 1,
                    }),
                }
            }
        }
        Ok(counts)
    }

    fn find_resource(
        &self,
        key: &ResourceKey,
        create: bool,
        driver: Option<&dyn RecordDriver>,
    ) -> Result<Option<Resource>> {
        self.record(StorageCall::FindResource {
            key: key.clone(),
            create,
        });
        self.check("find_resource")?;
        if let Some(found) = self.resources.lock().unwrap().iter().find(|r| &r.key == key) {
            return Ok(Some(found.clone()));
        }
        if !create {
            return Ok(None);
        }
        // Title lookup may re-enter storage, so it runs before locking.
        let title = driver.map(|d| d.breadcrumb()).unwrap_or_default();
        let mut resources = self.resources.lock().unwrap();
        let resource = Resource {
            id: resources.len() as u64 + 1,
            key: key.clone(),
            title,
        };
        resources.push(resource.clone());
        Ok(Some(resource))
    }

    fn add_tag(&self, resource: &Resource, tag: &str, _user: &User) -> Result<()> {
        self.record(StorageCall::AddTag(format!("{}:{tag}", resource.id)));
        Ok(())
    }

    fn create_list(&self, user: &User, title: &str) -> Result<UserList> {
        self.record(StorageCall::CreateList(title.to_string()));
        let mut lists = self.lists.lock().unwrap();
        let list = UserList {
            id: lists.len() as u64 + 100,
            user_id: user.id,
            title: title.to_string(),
        };
        lists.push(list.clone());
        Ok(list)
    }

    fn existing_list(&self, list_id: u64) -> Result<UserList> {
        self.record(StorageCall::ExistingList(list_id));
        self.lists
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == list_id)
            .cloned()
            .ok_or_else(|| SearchError::Storage(format!("no list {list_id}")))
    }

    fn remember_last_used(&self, list: &UserList) -> Result<()> {
        self.record(StorageCall::RememberLastUsed(list.id));
        Ok(())
    }

    fn save_resource(
        &self,
        user: &User,
        resource: &Resource,
        list: &UserList,
        tags: &[String],
        notes: &str,
    ) -> Result<()> {
        self.record(StorageCall::SaveResource {
            list_id: list.id,
            tags: tags.to_vec(),
            notes: notes.to_string(),
        });
        self.check("save_resource")?;
        self.saved.lock().unwrap().push((
            resource.key.clone(),
            SavedData {
                list_id: list.id,
                user_id: user.id,
                notes: notes.to_string(),
            },
        ));
        Ok(())
    }

    fn saved_data(
        &self,
        key: &ResourceKey,
        list_id: Option<u64>,
        user_id: Option<u64>,
    ) -> Result<Vec<SavedData>> {
        Ok(self
            .saved
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, s)| {
                k == key
                    && list_id.map_or(true, |id| s.list_id == id)
                    && user_id.map_or(true, |id| s.user_id == id)
            })
            .map(|(_, s)| s.clone())
            .collect())
    }

    fn lists_containing_resource(
        &self,
        key: &ResourceKey,
        user_id: Option<u64>,
    ) -> Result<Vec<UserList>> {
        let saved = self.saved.lock().unwrap();
        Ok(self
            .lists
            .lock()
            .unwrap()
            .iter()
            .filter(|list| user_id.map_or(true, |id| list.user_id == id))
            .filter(|list| saved.iter().any(|(k, s)| k == key && s.list_id == list.id))
            .cloned()
            .collect())
    }
}

/// Search backend double returning scripted browse pages.
#[derive(Debug, Default)]
pub struct FakeBackend {
    pub browse_pages: Mutex<Vec<std::result::Result<BrowseResponse, BackendError>>>,
    pub browse_calls: Mutex<Vec<(String, String, i64, usize)>>,
    pub search_response: Mutex<Option<Value>>,
}

#[allow(dead_code)]
impl FakeBackend {
    pub fn with_pages(pages: Vec<std::result::Result<BrowseResponse, BackendError>>) -> Self {
        FakeBackend {
            browse_pages: Mutex::new(pages),
            ..Self::default()
        }
    }

    pub fn with_search_response(response: Value) -> Self {
        FakeBackend {
            search_response: Mutex::new(Some(response)),
            ..Self::default()
        }
    }

    pub fn browse_calls(&self) -> Vec<(String, String, i64, usize)> {
        self.browse_calls.lock().unwrap().clone()
    }
}

impl SearchBackend for FakeBackend {
    fn query(
        &self,
        _collection: &str,
        _query: &QueryNode,
        _page: usize,
        _page_size: usize,
    ) -> std::result::Result<Value, BackendError> {
        self.search_response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| BackendError::Http {
                status: 500,
                message: "no response scripted".to_string(),
            })
    }

    fn alphabetic_browse(
        &self,
        source: &str,
        from: &str,
        page: i64,
        page_size: usize,
    ) -> std::result::Result<BrowseResponse, BackendError> {
        self.browse_calls
            .lock()
            .unwrap()
            .push((source.to_string(), from.to_string(), page, page_size));
        let mut pages = self.browse_pages.lock().unwrap();
        if pages.is_empty() {
            return Err(BackendError::Other("no page scripted".to_string()));
        }
        pages.remove(0)
    }
}

/// Creates a browse response with no headings.
#[allow(dead_code)]
pub fn browse_page(total_count: u64, offset: i64, start_row: i64) -> BrowseResponse {
    BrowseResponse {
        browse: BrowsePage {
            total_count,
            offset,
            start_row,
            items: Vec::new(),
        },
    }
}

/// Related-record plugin that remembers what it was initialized with.
#[derive(Debug, Default)]
pub struct RecordingPlugin {
    pub name: String,
    pub params: Option<String>,
    pub record_id: Option<String>,
}

impl RelatedPlugin for RecordingPlugin {
    fn init(&mut self, params: Option<&str>, driver: &dyn RecordDriver) -> Result<()> {
        self.params = params.map(str::to_string);
        self.record_id = Some(driver.unique_id()?);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Registry with `Similar` and `Editions` recording plugins.
#[allow(dead_code)]
pub fn plugin_manager() -> RelatedPluginManager {
    RelatedPluginManager::new()
        .with_plugin("Similar", || {
            Box::new(RecordingPlugin {
                name: "Similar".to_string(),
                ..RecordingPlugin::default()
            })
        })
        .with_plugin("Editions", || {
            Box::new(RecordingPlugin {
                name: "Editions".to_string(),
                ..RecordingPlugin::default()
            })
        })
}

/// A logged-in test user.
#[allow(dead_code)]
pub fn test_user() -> User {
    User {
        id: 7,
        username: "reader".to_string(),
    }
}

/// Context backed by `storage` and the default plugins.
#[allow(dead_code)]
pub fn context_with(storage: Arc<InMemoryStorage>) -> Arc<DriverContext> {
    Arc::new(
        DriverContext::default()
            .with_storage(storage)
            .with_related_plugins(Arc::new(plugin_manager())),
    )
}
