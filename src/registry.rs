//! Static mapping from UI field names to the backend's search tokens.
//!
//! Every master entity has its own table. The UI column `Level` exists on all
//! three of them, so the backend disambiguates it with a domain prefix
//! (`productlevel`, `channellevel`, `locationlevel`). The same tables drive
//! the saved-query check in [`is_applicable`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Product,
    Channel,
    Location,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Product, Domain::Channel, Domain::Location];

    pub fn name(&self) -> &'static str {
        match self {
            Domain::Product => "product",
            Domain::Channel => "channel",
            Domain::Location => "location",
        }
    }
    pub fn title(&self) -> &'static str {
        match self {
            Domain::Product => "Product",
            Domain::Channel => "Channel",
            Domain::Location => "Location",
        }
    }
    /// All entries registered for this domain, in display order.
    pub fn fields(&self) -> &'static [FieldEntry] {
        match self {
            Domain::Product => PRODUCT_FIELDS,
            Domain::Channel => CHANNEL_FIELDS,
            Domain::Location => LOCATION_FIELDS,
        }
    }
    pub fn tokens(&self) -> impl Iterator<Item = &'static str> {
        self.fields().iter().map(|f| f.token)
    }
    /// The domain that registers `token`, if any.
    pub fn owning(token: &str) -> Option<Domain> {
        Domain::ALL
            .into_iter()
            .find(|domain| domain.tokens().any(|t| t.eq_ignore_ascii_case(token)))
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Domain {
    type Err = SearchError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "product" => Ok(Domain::Product),
            "channel" => Ok(Domain::Channel),
            "location" => Ok(Domain::Location),
            other => Err(SearchError::Validation(format!("Unknown domain '{other}'."))),
        }
    }
}

/// One registered field. `ui` is the case-insensitive name the screens use
/// (the record's column name), `token` is what the backend understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldEntry {
    pub ui: &'static str,
    pub column: &'static str,
    pub token: &'static str,
    pub label: &'static str,
}

const fn entry(ui: &'static str, column: &'static str, token: &'static str, label: &'static str) -> FieldEntry {
    FieldEntry { ui, column, token, label }
}

static PRODUCT_FIELDS: &[FieldEntry] = &[
    entry("productid", "ProductID", "productid", "Product ID"),
    entry("productdescr", "ProductDescr", "productdescr", "Product Description"),
    entry("businessunit", "BusinessUnit", "businessunit", "Business Unit"),
    entry("isdailyforecastrequired", "IsDailyForecastRequired", "isdailyforecastrequired", "Is Daily Forecast Required"),
    entry("isnew", "IsNew", "isnew", "Is New"),
    entry("productfamily", "ProductFamily", "productfamily", "Product Family"),
    entry("level", "Level", "productlevel", "Product Level"),
];

static CHANNEL_FIELDS: &[FieldEntry] = &[
    entry("channelid", "ChannelID", "channelid", "Channel ID"),
    entry("channeldescr", "ChannelDescr", "channeldescr", "Channel Description"),
    entry("level", "Level", "channellevel", "Channel Level"),
];

static LOCATION_FIELDS: &[FieldEntry] = &[
    entry("locationid", "LocationID", "locationid", "Location ID"),
    entry("locationdescr", "LocationDescr", "locationdescr", "Location Description"),
    entry("level", "Level", "locationlevel", "Location Level"),
    entry("geography", "Geography", "geography", "Geography"),
];

/// Resolve a UI field name to the backend token for `domain`.
pub fn resolve(domain: Domain, ui_field: &str) -> Option<&'static str> {
    let wanted = ui_field.trim();
    domain
        .fields()
        .iter()
        .find(|f| f.ui.eq_ignore_ascii_case(wanted))
        .map(|f| f.token)
}

/// Like [`resolve`], but failing with a recoverable validation error.
pub fn require(domain: Domain, ui_field: &str) -> Result<&'static str, SearchError> {
    resolve(domain, ui_field).ok_or_else(|| SearchError::UnknownField {
        domain,
        field: ui_field.to_string(),
    })
}

/// The registry entry carrying `token` within `domain`.
pub fn entry_for_token(domain: Domain, token: &str) -> Option<&'static FieldEntry> {
    domain.fields().iter().find(|f| f.token.eq_ignore_ascii_case(token))
}

/// True when `query` mentions at least one of the domain's tokens in
/// `token:` form. Matching ignores case.
pub fn is_applicable(domain: Domain, query: &str) -> bool {
    let query = query.to_lowercase();
    domain
        .tokens()
        .any(|token| query.contains(&format!("{token}:")))
}
