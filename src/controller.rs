//! Per-screen orchestration: compose a query, run it, reconcile the returned
//! keys and expose the result through a [`ViewState`].
//!
//! A screen moves `Idle -> Loading -> (Loaded | Failed)` on every search.
//! Validation and collaborator failures leave the current rows untouched and
//! only set a user-visible message; nothing here is fatal.
//!
//! Searches run in three steps so that a newer search can overtake an older
//! one: [`ViewController::prepare`] takes a ticket, [`PendingSearch::run`]
//! talks to the collaborators without touching the screen, and
//! [`ViewController::apply`] drops the outcome if its ticket was superseded.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::collaborator::{MasterData, MasterTable, SavedSearchStore, SearchBackend};
use crate::compiler;
use crate::criterion::Criterion;
use crate::error::{Result, SearchError};
use crate::interface::{SearchInterface, Ticket};
use crate::model::{Bucket, Row, SavedSearch};
use crate::registry::{self, Domain};
use crate::source::{DetailSource, KeySource, MasterSource, RowSource};
use crate::view::{CsvExport, ViewState, distinct};

const NO_MATCHES: &str = "No matches for this saved query.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Product,
    Channel,
    Location,
    History,
    Forecast,
    ForecastElement,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Product => "Product",
            Screen::Channel => "Channel",
            Screen::Location => "Location",
            Screen::History => "History",
            Screen::Forecast => "Forecast",
            Screen::ForecastElement => "Forecast Element",
        }
    }
    pub fn is_master(&self) -> bool {
        matches!(self, Screen::Product | Screen::Channel | Screen::Location)
    }
    /// Fixed download name; detail screens include the bucket.
    pub fn export_filename(&self, bucket: Bucket) -> String {
        match self {
            Screen::Product => "Product_Search_Results.csv".to_string(),
            Screen::Channel => "Channel_Search_Results.csv".to_string(),
            Screen::Location => "Location_Search_Results.csv".to_string(),
            Screen::History => format!("Filtered_History_{bucket}.csv"),
            Screen::Forecast => format!("Filtered_Forecast_{bucket}.csv"),
            Screen::ForecastElement => "Filtered_ForecastElement.csv".to_string(),
        }
    }
    fn missing_saved_prompt(&self) -> &'static str {
        match self {
            Screen::History | Screen::Forecast => "Please choose a saved search first.",
            _ => "Please choose a saved search.",
        }
    }
    fn failure_fallback(&self) -> &'static str {
        match self {
            Screen::History => "Failed to load history.",
            Screen::Forecast => "Failed to load forecast.",
            _ => "Search failed.",
        }
    }
}

/// Construction-time configuration of one screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSettings {
    pub screen: Screen,
    pub items_per_page: usize,
    pub search_limit: usize,
    /// Report "no matches" when a saved-search replay returns zero keys.
    pub flag_empty_saved: bool,
    pub export_dir: PathBuf,
}

impl ViewSettings {
    pub fn new(screen: Screen) -> Self {
        let (items_per_page, search_limit) = match screen {
            Screen::History => (20, 5000),
            Screen::Forecast => (5, 5000),
            // keys become rows directly, no detail fetch follows
            Screen::ForecastElement => (20, 20000),
            _ => (5, 20000),
        };
        Self {
            screen,
            items_per_page,
            search_limit,
            flag_empty_saved: matches!(screen, Screen::History | Screen::Forecast),
            export_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

enum Resolution<R> {
    Rows { rows: Vec<R>, keys: usize },
    NoMatches,
    Superseded,
}

/// Result of a [`PendingSearch`], to be handed back to [`ViewController::apply`].
pub struct SearchOutcome<R> {
    ticket: Ticket,
    query: String,
    flag_empty: bool,
    result: Result<Resolution<R>>,
}

impl<R> SearchOutcome<R> {
    pub fn query(&self) -> &str {
        &self.query
    }
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// A started search that no longer borrows its screen.
pub struct PendingSearch<S: RowSource> {
    ticket: Ticket,
    query: String,
    limit: usize,
    bucket: Bucket,
    flag_empty: bool,
    search: Arc<dyn SearchBackend>,
    source: Arc<S>,
}

impl<S: RowSource> PendingSearch<S> {
    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    pub async fn run(self) -> SearchOutcome<S::Row> {
        let result = self.resolve().await;
        SearchOutcome {
            ticket: self.ticket,
            query: self.query,
            flag_empty: self.flag_empty,
            result,
        }
    }

    async fn resolve(&self) -> Result<Resolution<S::Row>> {
        let found = self.search.search(&self.query, self.limit, 0).await?;
        if self.ticket.is_superseded() {
            return Ok(Resolution::Superseded);
        }
        if found.keys.is_empty() {
            return Ok(Resolution::NoMatches);
        }
        let keys = found.keys.len();
        let rows = self.source.resolve(found.keys, self.bucket).await?;
        Ok(Resolution::Rows { rows, keys })
    }
}

pub struct ViewController<S: RowSource> {
    settings: ViewSettings,
    search: Arc<dyn SearchBackend>,
    source: Arc<S>,
    state: ViewState<S::Row>,
    status: Status,
    message: Option<String>,
    saved: Vec<SavedSearch>,
    selected_saved: Option<usize>,
    bucket: Bucket,
    interface: SearchInterface,
}

impl<S: RowSource> ViewController<S> {
    pub fn new(settings: ViewSettings, search: Arc<dyn SearchBackend>, source: S) -> Self {
        let state = ViewState::new(settings.items_per_page);
        Self {
            settings,
            search,
            source: Arc::new(source),
            state,
            status: Status::Idle,
            message: None,
            saved: Vec::new(),
            selected_saved: None,
            bucket: Bucket::default(),
            interface: SearchInterface::new(),
        }
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }
    pub fn state(&self) -> &ViewState<S::Row> {
        &self.state
    }
    pub fn status(&self) -> Status {
        self.status
    }
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
    pub fn bucket(&self) -> Bucket {
        self.bucket
    }
    pub fn saved_searches(&self) -> &[SavedSearch] {
        &self.saved
    }
    pub fn selected_saved(&self) -> Option<usize> {
        self.selected_saved
    }
    pub fn is_pending(&self) -> bool {
        self.interface.is_pending()
    }

    /// Surface a recoverable failure without touching the rows.
    fn reject(&mut self, error: SearchError) {
        debug!(screen = ?self.settings.screen, %error, "rejected");
        self.message = Some(error.user_message());
    }

    /// Take a ticket for `query`, superseding any search still in flight.
    pub fn prepare(&mut self, query: impl Into<String>, flag_empty: bool) -> PendingSearch<S> {
        let ticket = self.interface.begin();
        self.status = Status::Loading;
        self.message = None;
        PendingSearch {
            ticket,
            query: query.into(),
            limit: self.settings.search_limit,
            bucket: self.bucket,
            flag_empty,
            search: Arc::clone(&self.search),
            source: Arc::clone(&self.source),
        }
    }

    /// Apply a finished search. Returns false when it was superseded and
    /// therefore discarded.
    pub fn apply(&mut self, outcome: SearchOutcome<S::Row>) -> bool {
        let screen = self.settings.screen;
        if !self.interface.finish(&outcome.ticket) {
            warn!(?screen, id = outcome.ticket.id.value(), query = %outcome.query, "discarding superseded search");
            return false;
        }
        let ms = outcome.ticket.elapsed().as_secs_f64() * 1000.0;
        match outcome.result {
            Ok(Resolution::Rows { rows, keys }) => {
                info!(?screen, query = %outcome.query, keys, rows = rows.len(), ms, "search complete");
                self.state.load(rows);
                self.status = Status::Loaded;
                self.message = None;
            }
            Ok(Resolution::NoMatches) => {
                info!(?screen, query = %outcome.query, ms, "search matched nothing");
                self.state.clear();
                self.status = Status::Loaded;
                self.message = outcome.flag_empty.then(|| NO_MATCHES.to_string());
            }
            Ok(Resolution::Superseded) => return false,
            Err(error) => {
                warn!(?screen, query = %outcome.query, %error, "search failed");
                let message = error.user_message();
                self.status = Status::Failed;
                self.message = Some(if message.trim().is_empty() {
                    screen.failure_fallback().to_string()
                } else {
                    message
                });
            }
        }
        true
    }

    /// Prepare, run and apply in one go.
    pub async fn run_query(&mut self, query: impl Into<String>, flag_empty: bool) -> bool {
        let pending = self.prepare(query, flag_empty);
        let outcome = pending.run().await;
        self.apply(outcome)
    }

    /// Compile `criteria` and run them. With nothing left to run the screen
    /// shows an empty result and the backend is not called.
    pub async fn run_criteria(&mut self, criteria: &[Criterion]) -> bool {
        match compiler::compile_checked(self.source.domain(), criteria) {
            Ok(Some(query)) => self.run_query(query.into_string(), false).await,
            Ok(None) => {
                self.show_empty();
                true
            }
            Err(error) => {
                self.reject(error);
                false
            }
        }
    }

    fn show_empty(&mut self) {
        self.interface.cancel();
        self.state.clear();
        self.status = Status::Loaded;
        self.message = None;
    }

    /// Reload the saved-search list. A failing store keeps the old list.
    pub async fn refresh_saved(&mut self, store: &dyn SavedSearchStore) {
        match store.list().await {
            Ok(saved) => {
                if self.selected_saved.is_some_and(|i| i >= saved.len()) {
                    self.selected_saved = None;
                }
                self.saved = saved;
            }
            Err(error) => warn!(screen = ?self.settings.screen, %error, "saved searches failed"),
        }
    }

    pub fn select_saved(&mut self, index: Option<usize>) {
        self.selected_saved = index;
    }

    fn selected_query(&self) -> Option<String> {
        self.selected_saved
            .and_then(|i| self.saved.get(i))
            .map(|saved| saved.query.clone())
    }

    /// Re-issue the selected saved search. Screens bound to a master domain
    /// refuse queries that carry none of that domain's fields.
    pub async fn load_saved(&mut self) -> bool {
        let Some(query) = self.selected_query() else {
            let prompt = self.settings.screen.missing_saved_prompt();
            self.reject(SearchError::Validation(prompt.to_string()));
            return false;
        };
        if let Some(domain) = self.source.domain() {
            if !registry::is_applicable(domain, &query) {
                self.reject(SearchError::Inapplicable { domain });
                return false;
            }
        }
        let flag = self.settings.flag_empty_saved;
        self.run_query(query, flag).await
    }

    pub fn apply_local_filters<'a>(&mut self, filters: impl IntoIterator<Item = (&'a str, &'a str)>) {
        self.state.apply_local_filters(filters);
    }

    pub fn apply_exact_filters<'a>(&mut self, filters: impl IntoIterator<Item = (&'a str, &'a str)>) {
        self.state.apply_exact_filters(filters);
    }

    pub fn clear_filters(&mut self) {
        self.state.clear_filters();
    }

    pub fn sort_by(&mut self, column: &str) -> bool {
        self.state.sort_by(column)
    }

    pub fn set_page(&mut self, page: usize) {
        self.state.set_page(page);
    }

    pub fn page(&self) -> &[S::Row] {
        self.state.page()
    }

    pub fn export_filename(&self) -> String {
        self.settings.screen.export_filename(self.bucket)
    }

    /// CSV of the filtered rows, `None` when they are empty.
    pub fn export_csv(&self) -> Result<Option<CsvExport>> {
        self.state.export_csv(&self.export_filename())
    }

    /// Export and write into the configured directory.
    pub fn export_to_dir(&self) -> Result<Option<PathBuf>> {
        match self.export_csv()? {
            Some(export) => {
                let path = export.write_to(&self.settings.export_dir)?;
                info!(screen = ?self.settings.screen, path = %path.display(), "exported");
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }
}

impl<R: MasterTable> ViewController<MasterSource<R>> {
    /// A master screen; its snapshot is fetched with [`Self::load_master`].
    pub fn master(settings: ViewSettings, search: Arc<dyn SearchBackend>) -> Self {
        Self::new(settings, search, MasterSource::default())
    }

    /// Fetch the master snapshot, replacing the previous one. Results are
    /// only shown after a search.
    pub async fn load_master(&mut self, master: &dyn MasterData) -> bool {
        self.status = Status::Loading;
        match MasterSource::<R>::load(master).await {
            Ok(source) => {
                info!(domain = %R::DOMAIN, rows = source.rows().len(), "master snapshot loaded");
                self.source = Arc::new(source);
                self.state.clear();
                self.status = Status::Loaded;
                true
            }
            Err(error) => {
                warn!(domain = %R::DOMAIN, %error, "master snapshot failed");
                self.status = Status::Failed;
                self.message = Some(format!("Failed to load {}s.", R::DOMAIN.name()));
                false
            }
        }
    }

    pub fn master_rows(&self) -> &[R] {
        self.source.rows()
    }

    /// Dropdown values for `column`, drawn from the whole master snapshot.
    pub fn master_values(&self, column: &str) -> Vec<String> {
        let Some(column) = ViewState::<R>::column(column) else {
            return Vec::new();
        };
        distinct(self.source.rows().iter().filter_map(|row| row.value(column)))
    }

    /// Search one UI field for `term`. A blank term clears the results
    /// without calling the backend.
    pub async fn search_typed(&mut self, ui_field: &str, term: &str) -> bool {
        let domain: Domain = R::DOMAIN;
        if term.trim().is_empty() {
            self.show_empty();
            return true;
        }
        let token = match registry::require(domain, ui_field) {
            Ok(token) => token,
            Err(error) => {
                self.reject(error);
                return false;
            }
        };
        match compiler::fragment(token, term) {
            Some(query) => self.run_query(query, false).await,
            None => {
                self.show_empty();
                true
            }
        }
    }
}

impl ViewController<KeySource> {
    pub fn keys(settings: ViewSettings, search: Arc<dyn SearchBackend>) -> Self {
        Self::new(settings, search, KeySource)
    }

    /// The product/channel/location search form, combined with AND.
    pub async fn search_fields(&mut self, product: &str, channel: &str, location: &str) -> bool {
        let fields = [("productid", product), ("channelid", channel), ("locationid", location)];
        match compiler::conjunction(fields) {
            Some(query) => self.run_query(query.into_string(), false).await,
            None => {
                self.reject(SearchError::Validation(
                    "Enter at least one of Product/Channel/Location.".to_string(),
                ));
                false
            }
        }
    }
}

impl<R: Row> ViewController<DetailSource<R>> {
    pub fn detail(settings: ViewSettings, search: Arc<dyn SearchBackend>, source: DetailSource<R>) -> Self {
        Self::new(settings, search, source)
    }

    /// Switch bucket and silently re-run the selected saved search, if any.
    pub async fn set_bucket(&mut self, bucket: Bucket) -> bool {
        self.bucket = bucket;
        match self.selected_query() {
            Some(query) => self.run_query(query, false).await,
            None => false,
        }
    }
}
