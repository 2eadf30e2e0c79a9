//! Authoring of saved searches: pick a domain and field, add criteria with
//! their operators, then store the compiled query under a name.

use futures_util::try_join;
use tracing::info;

use crate::collaborator::{MasterData, SavedSearchStore};
use crate::compiler::{self, CompiledQuery};
use crate::criterion::{Criterion, Operator};
use crate::error::{Result, SearchError};
use crate::model::{Channel, Location, MasterRow, Product, SavedSearch};
use crate::registry::{self, Domain, FieldEntry};
use crate::view::distinct;

/// The three master tables, used to offer values for a field.
#[derive(Debug, Clone, Default)]
pub struct MasterCatalog {
    pub products: Vec<Product>,
    pub channels: Vec<Channel>,
    pub locations: Vec<Location>,
}

impl MasterCatalog {
    pub async fn load(source: &dyn MasterData) -> Result<Self> {
        let (products, channels, locations) =
            try_join!(source.list_products(), source.list_channels(), source.list_locations())?;
        info!(products = products.len(), channels = channels.len(), locations = locations.len(), "master catalog loaded");
        Ok(Self { products, channels, locations })
    }

    /// Sorted distinct non-blank values of the column behind `token`.
    pub fn field_values(&self, domain: Domain, token: &str) -> Vec<String> {
        fn values_of<R: MasterRow>(rows: &[R], token: &str) -> Vec<String> {
            distinct(rows.iter().filter_map(|row| row.value_for(token)))
        }
        match domain {
            Domain::Product => values_of(&self.products, token),
            Domain::Channel => values_of(&self.channels, token),
            Domain::Location => values_of(&self.locations, token),
        }
    }
}

/// Field choices offered for a domain, in display order.
pub fn field_options(domain: Domain) -> &'static [FieldEntry] {
    domain.fields()
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    domain: Domain,
    field: &'static str,
    next_operator: Operator,
    criteria: Vec<Criterion>,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self {
            domain: Domain::Product,
            field: "businessunit",
            next_operator: Operator::And,
            criteria: Vec::new(),
        }
    }
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Switching domain selects its first field.
    pub fn set_domain(&mut self, domain: Domain) {
        self.domain = domain;
        self.field = domain.fields()[0].token;
    }

    pub fn set_field(&mut self, token: &str) -> Result<()> {
        let entry = registry::entry_for_token(self.domain, token).ok_or_else(|| SearchError::UnknownField {
            domain: self.domain,
            field: token.to_string(),
        })?;
        self.field = entry.token;
        Ok(())
    }

    /// Operator placed before the next criterion added.
    pub fn set_next_operator(&mut self, operator: Operator) {
        self.next_operator = operator;
    }

    /// Add `value` for the selected field. Blank values and exact
    /// duplicates are ignored.
    pub fn add(&mut self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        if self.criteria.iter().any(|c| c.field == self.field && c.value == value) {
            return false;
        }
        self.criteria
            .push(Criterion::new(self.field, value).with_operator(self.next_operator));
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<Criterion> {
        (index < self.criteria.len()).then(|| self.criteria.remove(index))
    }

    pub fn set_operator(&mut self, index: usize, operator: Operator) -> bool {
        match self.criteria.get_mut(index) {
            Some(criterion) => {
                criterion.operator = Some(operator);
                true
            }
            None => false,
        }
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn clear(&mut self) {
        self.criteria.clear();
    }

    pub fn query(&self) -> Option<CompiledQuery> {
        compiler::compile(&self.criteria)
    }

    /// Store the current query under `name`.
    pub async fn save(&self, name: &str, store: &dyn SavedSearchStore) -> Result<SavedSearch> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SearchError::Validation("Please enter a name.".to_string()));
        }
        let Some(query) = self.query() else {
            return Err(SearchError::Validation("Please add at least one criterion.".to_string()));
        };
        let saved = store.create(name, query.as_str()).await?;
        info!(name, query = %query, "saved search created");
        Ok(saved)
    }
}
