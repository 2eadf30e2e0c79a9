//! Pagination, sorting, local filtering and CSV export shared by every screen.
//!
//! [`ViewState`] is generic over the row type; the row's [`Row`] impl supplies
//! the column names and field access. `filtered_rows` is always derived from
//! `all_rows` by the active local filters followed by the active sort, and the
//! current page is kept within `[1, total_pages]` after every mutation.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use icu_collator::{Collator, CollatorOptions, Strength};
use tracing::warn;

use crate::error::{Result, SearchError};
use crate::model::Row;

const PAGE_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Case-insensitive substring.
    Contains,
    /// Exact value, used by dropdown filters.
    Exact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFilter {
    pub column: &'static str,
    pub needle: String,
    pub mode: MatchMode,
}

impl LocalFilter {
    fn matches<R: Row>(&self, row: &R) -> bool {
        let value = row.value(self.column).unwrap_or_default();
        match self.mode {
            MatchMode::Contains => value.to_lowercase().contains(&self.needle),
            MatchMode::Exact => value == self.needle,
        }
    }
}

/// A finished CSV export, ready to be written under its screen's file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

impl CsvExport {
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        std::fs::write(&path, self.content.as_bytes())?;
        Ok(path)
    }
}

#[derive(Debug, Clone)]
pub struct ViewState<R: Row> {
    all_rows: Vec<R>,
    filtered_rows: Vec<R>,
    filters: Vec<LocalFilter>,
    current_page: usize,
    items_per_page: usize,
    sort_column: Option<&'static str>,
    sort_ascending: bool,
}

impl<R: Row> ViewState<R> {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            all_rows: Vec::new(),
            filtered_rows: Vec::new(),
            filters: Vec::new(),
            current_page: 1,
            items_per_page: items_per_page.max(1),
            sort_column: None,
            sort_ascending: true,
        }
    }

    /// Resolve a column name against the row type, ignoring case.
    pub fn column(name: &str) -> Option<&'static str> {
        R::COLUMNS.iter().copied().find(|c| c.eq_ignore_ascii_case(name.trim()))
    }

    /// Replace the row set wholesale. Active filters and sort are re-applied
    /// and pagination starts over.
    pub fn load(&mut self, rows: Vec<R>) {
        self.all_rows = rows;
        self.refresh();
        self.current_page = 1;
    }

    pub fn clear(&mut self) {
        self.load(Vec::new());
    }

    /// Case-insensitive substring filters, combined with AND. Blank needles
    /// and unknown columns are ignored.
    pub fn apply_local_filters<'a>(&mut self, filters: impl IntoIterator<Item = (&'a str, &'a str)>) {
        let filters = filters
            .into_iter()
            .filter_map(|(column, needle)| {
                let column = Self::column(column)?;
                let needle = needle.trim().to_lowercase();
                (!needle.is_empty()).then_some(LocalFilter { column, needle, mode: MatchMode::Contains })
            })
            .collect();
        self.set_filters(filters);
    }

    /// Exact-match filters as used by dropdowns. Blank selections are ignored.
    pub fn apply_exact_filters<'a>(&mut self, filters: impl IntoIterator<Item = (&'a str, &'a str)>) {
        let filters = filters
            .into_iter()
            .filter_map(|(column, selected)| {
                let column = Self::column(column)?;
                let needle = selected.trim().to_string();
                (!needle.is_empty()).then_some(LocalFilter { column, needle, mode: MatchMode::Exact })
            })
            .collect();
        self.set_filters(filters);
    }

    pub fn set_filters(&mut self, filters: Vec<LocalFilter>) {
        self.filters = filters;
        self.refresh();
        self.current_page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.set_filters(Vec::new());
    }

    pub fn filters(&self) -> &[LocalFilter] {
        &self.filters
    }

    /// Sort by `column`, toggling direction when it is already the sort
    /// column. Returns false for a column the row type does not have.
    pub fn sort_by(&mut self, column: &str) -> bool {
        let Some(column) = Self::column(column) else {
            return false;
        };
        if self.sort_column == Some(column) {
            self.sort_ascending = !self.sort_ascending;
        } else {
            self.sort_column = Some(column);
            self.sort_ascending = true;
        }
        self.sort();
        true
    }

    fn sort(&mut self) {
        let Some(column) = self.sort_column else {
            return;
        };
        let ascending = self.sort_ascending;
        let order = TextOrder::new();
        self.filtered_rows.sort_by(|a, b| {
            let ordering = order.compare(a.value(column).unwrap_or_default(), b.value(column).unwrap_or_default());
            if ascending { ordering } else { ordering.reverse() }
        });
    }

    fn refresh(&mut self) {
        let filters = &self.filters;
        self.filtered_rows = self
            .all_rows
            .iter()
            .filter(|row| filters.iter().all(|f| f.matches(*row)))
            .cloned()
            .collect();
        self.sort();
        self.clamp_page();
    }

    fn clamp_page(&mut self) {
        self.current_page = self.current_page.clamp(1, self.total_pages());
    }

    pub fn total_pages(&self) -> usize {
        self.filtered_rows.len().div_ceil(self.items_per_page).max(1)
    }

    pub fn set_page(&mut self, page: usize) {
        self.current_page = page;
        self.clamp_page();
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        self.items_per_page = items_per_page.max(1);
        self.clamp_page();
    }

    /// Rows on the current page.
    pub fn page(&self) -> &[R] {
        let start = ((self.current_page - 1) * self.items_per_page).min(self.filtered_rows.len());
        let end = (start + self.items_per_page).min(self.filtered_rows.len());
        &self.filtered_rows[start..end]
    }

    pub fn page_range(&self) -> Vec<usize> {
        (1..=self.total_pages()).collect()
    }

    /// At most five page numbers centred on the current page.
    pub fn visible_pages(&self) -> Vec<usize> {
        let total = self.total_pages();
        if total <= PAGE_WINDOW {
            return self.page_range();
        }
        let half = PAGE_WINDOW / 2;
        let start = self.current_page.saturating_sub(half).max(1).min(total - PAGE_WINDOW + 1);
        (start..start + PAGE_WINDOW).collect()
    }

    pub fn sort_column(&self) -> Option<&'static str> {
        self.sort_column
    }

    pub fn sort_ascending(&self) -> bool {
        self.sort_ascending
    }

    pub fn all_rows(&self) -> &[R] {
        &self.all_rows
    }

    pub fn filtered_rows(&self) -> &[R] {
        &self.filtered_rows
    }

    /// Sorted distinct non-blank values of a column across all rows.
    pub fn distinct_values(&self, column: &str) -> Vec<String> {
        let Some(column) = Self::column(column) else {
            return Vec::new();
        };
        distinct(self.all_rows.iter().filter_map(|row| row.value(column)))
    }

    /// Serialize the filtered rows. `None` when there is nothing to export.
    pub fn export_csv(&self, filename: &str) -> Result<Option<CsvExport>> {
        if self.filtered_rows.is_empty() {
            return Ok(None);
        }
        let content = to_csv(&self.filtered_rows)?;
        Ok(Some(CsvExport { filename: filename.to_string(), content }))
    }
}

/// Root-locale collation ignoring case. Accented letters sort next to their
/// base letters.
pub(crate) struct TextOrder(Option<Collator>);

impl TextOrder {
    pub(crate) fn new() -> Self {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Secondary);
        match Collator::try_new(&Default::default(), options) {
            Ok(collator) => Self(Some(collator)),
            Err(error) => {
                warn!(%error, "collator unavailable, comparing lower-cased text");
                Self(None)
            }
        }
    }

    pub(crate) fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.0 {
            Some(collator) => collator.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()),
        }
    }
}

pub(crate) fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut values: Vec<String> = values
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .collect();
    let order = TextOrder::new();
    values.sort_by(|a, b| order.compare(a, b).then_with(|| a.cmp(b)));
    values.dedup();
    values
}

/// Header row of column names, every field double-quoted with embedded
/// quotes doubled, CRLF between lines.
pub fn to_csv<R: Row>(rows: &[R]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(R::COLUMNS)?;
    for row in rows {
        writer.write_record(R::COLUMNS.iter().map(|c| row.value(c).unwrap_or_default()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| SearchError::Export(e.to_string()))?;
    let mut content = String::from_utf8(bytes).map_err(|e| SearchError::Export(e.to_string()))?;
    if content.ends_with("\r\n") {
        content.truncate(content.len() - 2);
    }
    Ok(content)
}
