//! In-memory collaborators. They back the integration tests and the bench,
//! and make a convenient stand-in when no backend is reachable.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::collaborator::{DetailBackend, MasterData, ProfileStore, SavedSearchStore, SearchBackend};
use crate::error::{Result, SearchError};
use crate::model::{Bucket, Channel, EntityKey, Location, Product, Row, SavedSearch, SearchResult};
use crate::profile::{CleanseConfig, CleanseProfile};

fn fail_if(failure: &Option<String>) -> Result<()> {
    match failure {
        Some(message) => Err(SearchError::Collaborator(message.clone())),
        None => Ok(()),
    }
}

/// Answers fixed queries with fixed keys; anything else matches nothing.
#[derive(Debug, Default)]
pub struct StaticSearch {
    answers: HashMap<String, std::result::Result<Vec<EntityKey>, String>>,
    issued: Mutex<Vec<String>>,
}

impl StaticSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, query: impl Into<String>, keys: Vec<EntityKey>) -> Self {
        self.answers.insert(query.into(), Ok(keys));
        self
    }

    pub fn fail(mut self, query: impl Into<String>, message: impl Into<String>) -> Self {
        self.answers.insert(query.into(), Err(message.into()));
        self
    }

    /// Queries received so far, oldest first.
    pub fn issued(&self) -> Vec<String> {
        self.issued.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl SearchBackend for StaticSearch {
    async fn search(&self, query: &str, limit: usize, offset: usize) -> Result<SearchResult> {
        self.issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.to_string());
        let keys = match self.answers.get(query) {
            Some(Ok(keys)) => keys.iter().skip(offset).take(limit).cloned().collect::<Vec<_>>(),
            Some(Err(message)) => return Err(SearchError::Collaborator(message.clone())),
            None => Vec::new(),
        };
        Ok(SearchResult {
            query: query.to_string(),
            count: keys.len() as u64,
            keys,
        })
    }
}

fn triple<R: Row>(row: &R) -> (String, String, String) {
    let column = |name| row.value(name).unwrap_or_default().to_string();
    (column("ProductID"), column("ChannelID"), column("LocationID"))
}

/// History or forecast rows per bucket, matched on the key triple.
#[derive(Debug)]
pub struct MemoryDetail<R> {
    rows: HashMap<Bucket, Vec<R>>,
    failure: Option<String>,
    requests: Mutex<Vec<(Bucket, usize)>>,
}

impl<R> Default for MemoryDetail<R> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            failure: None,
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl<R: Row> MemoryDetail<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, bucket: Bucket, rows: Vec<R>) -> Self {
        self.rows.entry(bucket).or_default().extend(rows);
        self
    }

    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// `(bucket, key count)` of every bulk request received.
    pub fn requests(&self) -> Vec<(Bucket, usize)> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl<R: Row> DetailBackend<R> for MemoryDetail<R> {
    async fn fetch_by_keys(&self, bucket: Bucket, keys: &[EntityKey]) -> Result<Vec<R>> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((bucket, keys.len()));
        fail_if(&self.failure)?;
        let wanted: HashSet<(String, String, String)> = keys.iter().map(triple).collect();
        Ok(self
            .rows
            .get(&bucket)
            .map(|rows| rows.iter().filter(|row| wanted.contains(&triple(*row))).cloned().collect())
            .unwrap_or_default())
    }
}

#[derive(Debug, Default)]
pub struct MemorySavedSearches {
    saved: Mutex<Vec<SavedSearch>>,
    failure: Option<String>,
}

impl MemorySavedSearches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, name: &str, query: &str) -> Self {
        {
            let mut saved = self.saved.lock().unwrap_or_else(PoisonError::into_inner);
            let id = saved.len() as i64 + 1;
            saved.push(SavedSearch {
                id: Some(id),
                created_at: Some(Utc::now()),
                ..SavedSearch::new(name, query)
            });
        }
        self
    }

    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }
}

#[async_trait]
impl SavedSearchStore for MemorySavedSearches {
    async fn list(&self) -> Result<Vec<SavedSearch>> {
        fail_if(&self.failure)?;
        Ok(self.saved.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    async fn create(&self, name: &str, query: &str) -> Result<SavedSearch> {
        fail_if(&self.failure)?;
        let mut saved = self.saved.lock().unwrap_or_else(PoisonError::into_inner);
        let created = SavedSearch {
            id: Some(saved.len() as i64 + 1),
            created_at: Some(Utc::now()),
            ..SavedSearch::new(name, query)
        };
        saved.push(created.clone());
        Ok(created)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryMasterData {
    pub products: Vec<Product>,
    pub channels: Vec<Channel>,
    pub locations: Vec<Location>,
    pub failure: Option<String>,
}

#[async_trait]
impl MasterData for MemoryMasterData {
    async fn list_products(&self) -> Result<Vec<Product>> {
        fail_if(&self.failure)?;
        Ok(self.products.clone())
    }
    async fn list_channels(&self) -> Result<Vec<Channel>> {
        fail_if(&self.failure)?;
        Ok(self.channels.clone())
    }
    async fn list_locations(&self) -> Result<Vec<Location>> {
        fail_if(&self.failure)?;
        Ok(self.locations.clone())
    }
}

#[derive(Debug, Default)]
pub struct MemoryProfiles {
    profiles: Mutex<Vec<CleanseProfile>>,
    failure: Option<String>,
}

impl MemoryProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }
}

#[async_trait]
impl ProfileStore for MemoryProfiles {
    async fn list(&self) -> Result<Vec<CleanseProfile>> {
        fail_if(&self.failure)?;
        Ok(self.profiles.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    async fn create(&self, name: &str, config: &CleanseConfig) -> Result<CleanseProfile> {
        fail_if(&self.failure)?;
        let mut profiles = self.profiles.lock().unwrap_or_else(PoisonError::into_inner);
        let profile = CleanseProfile {
            id: Some(profiles.len() as i64 + 1),
            name: name.to_string(),
            config: config.clone(),
            created_at: Some(Utc::now()),
        };
        profiles.push(profile.clone());
        Ok(profile)
    }
}
