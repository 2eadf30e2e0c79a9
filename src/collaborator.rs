//! Contracts of the external services the engine talks to.
//!
//! Transport is not modelled here; implementations report any failure as
//! [`SearchError::Collaborator`](crate::error::SearchError::Collaborator)
//! carrying the detail the user should see.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Bucket, Channel, EntityKey, Location, MasterRow, Product, SavedSearch, SearchResult};
use crate::profile::{CleanseConfig, CleanseProfile};

/// Resolves a compiled query string to the matching key triples.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str, limit: usize, offset: usize) -> Result<SearchResult>;
}

/// Bulk retrieval of history or forecast rows for a batch of keys.
#[async_trait]
pub trait DetailBackend<R: Send + 'static>: Send + Sync {
    async fn fetch_by_keys(&self, bucket: Bucket, keys: &[EntityKey]) -> Result<Vec<R>>;
}

#[async_trait]
pub trait SavedSearchStore: Send + Sync {
    async fn list(&self) -> Result<Vec<SavedSearch>>;
    async fn create(&self, name: &str, query: &str) -> Result<SavedSearch>;
}

/// Full snapshots of the three master tables.
#[async_trait]
pub trait MasterData: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>>;
    async fn list_channels(&self) -> Result<Vec<Channel>>;
    async fn list_locations(&self) -> Result<Vec<Location>>;
}

/// Picks the matching listing for a master row type.
#[async_trait]
pub trait MasterTable: MasterRow + Sized {
    async fn list_from(source: &dyn MasterData) -> Result<Vec<Self>>;
}

#[async_trait]
impl MasterTable for Product {
    async fn list_from(source: &dyn MasterData) -> Result<Vec<Self>> {
        source.list_products().await
    }
}

#[async_trait]
impl MasterTable for Channel {
    async fn list_from(source: &dyn MasterData) -> Result<Vec<Self>> {
        source.list_channels().await
    }
}

#[async_trait]
impl MasterTable for Location {
    async fn list_from(source: &dyn MasterData) -> Result<Vec<Self>> {
        source.list_locations().await
    }
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn list(&self) -> Result<Vec<CleanseProfile>>;
    async fn create(&self, name: &str, config: &CleanseConfig) -> Result<CleanseProfile>;
}
