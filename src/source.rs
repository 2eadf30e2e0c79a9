//! Where a screen's rows come from once the search backend has answered.

use std::sync::Arc;

use async_trait::async_trait;

use crate::collaborator::{DetailBackend, MasterData, MasterTable};
use crate::error::Result;
use crate::model::{Bucket, EntityKey, MasterRow, Row};
use crate::reconcile;
use crate::registry::Domain;

#[async_trait]
pub trait RowSource: Send + Sync + 'static {
    type Row: Row;
    /// The master domain a screen is bound to, if any. Saved searches and
    /// typed searches are checked against it.
    fn domain(&self) -> Option<Domain> {
        None
    }
    async fn resolve(&self, keys: Vec<EntityKey>, bucket: Bucket) -> Result<Vec<Self::Row>>;
}

/// Filter mode over a master snapshot held for the screen's lifetime.
#[derive(Debug, Clone)]
pub struct MasterSource<R: MasterRow> {
    rows: Vec<R>,
}

impl<R: MasterRow> MasterSource<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self { rows }
    }
    pub fn rows(&self) -> &[R] {
        &self.rows
    }
}

impl<R: MasterTable> MasterSource<R> {
    pub async fn load(master: &dyn MasterData) -> Result<Self> {
        Ok(Self::new(R::list_from(master).await?))
    }
}

impl<R: MasterRow> Default for MasterSource<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl<R: MasterRow> RowSource for MasterSource<R> {
    type Row = R;
    fn domain(&self) -> Option<Domain> {
        Some(R::DOMAIN)
    }
    async fn resolve(&self, keys: Vec<EntityKey>, _bucket: Bucket) -> Result<Vec<R>> {
        Ok(reconcile::filter_master(&keys, &self.rows))
    }
}

/// Projection mode: the returned keys are the rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeySource;

#[async_trait]
impl RowSource for KeySource {
    type Row = EntityKey;
    async fn resolve(&self, keys: Vec<EntityKey>, _bucket: Bucket) -> Result<Vec<EntityKey>> {
        Ok(reconcile::project_keys(&keys))
    }
}

/// Projection mode seeding one bulk detail request with the full key set.
pub struct DetailSource<R: Row> {
    backend: Arc<dyn DetailBackend<R>>,
}

impl<R: Row> DetailSource<R> {
    pub fn new(backend: Arc<dyn DetailBackend<R>>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<R: Row> RowSource for DetailSource<R> {
    type Row = R;
    async fn resolve(&self, keys: Vec<EntityKey>, bucket: Bucket) -> Result<Vec<R>> {
        let keys = reconcile::project_keys(&keys);
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        self.backend.fetch_by_keys(bucket, &keys).await
    }
}
