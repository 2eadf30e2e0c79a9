//! Record types exchanged with the collaborators.
//!
//! Backend rows arrive loosely typed (numbers, booleans or null where text is
//! expected). Every column is coerced to a `String` once, while deserializing,
//! so nothing downstream has to guess.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::registry::{self, Domain};

/// A flat record the generic view can filter, sort and export.
pub trait Row: Clone + Send + Sync + 'static {
    /// Column names in export order.
    const COLUMNS: &'static [&'static str];
    fn value(&self, column: &str) -> Option<&str>;
}

/// A row of one of the master tables.
pub trait MasterRow: Row {
    const DOMAIN: Domain;
    /// The identifier matched against returned keys.
    fn id(&self) -> &str;
    /// The column behind a registry token, e.g. `productlevel` -> `Level`.
    fn value_for(&self, token: &str) -> Option<&str> {
        registry::entry_for_token(Self::DOMAIN, token).and_then(|entry| self.value(entry.column))
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

// Generates a record struct whose fields are all coerced text columns.
macro_rules! record {
    ($(#[$meta:meta])* $name:ident { $($field:ident => $column:tt),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name {
            $(
                #[serde(rename = $column, default, deserialize_with = "lenient_string")]
                pub $field: String,
            )+
        }
        impl Row for $name {
            const COLUMNS: &'static [&'static str] = &[$($column),+];
            fn value(&self, column: &str) -> Option<&str> {
                match column {
                    $($column => Some(self.$field.as_str()),)+
                    _ => None,
                }
            }
        }
    };
}

record! {
    /// Identifies a demand unit. Channel- and location-only searches still
    /// return full triples; the irrelevant parts are ignored.
    EntityKey {
        product_id => "ProductID",
        channel_id => "ChannelID",
        location_id => "LocationID",
    }
}

impl EntityKey {
    pub fn new(product_id: impl Into<String>, channel_id: impl Into<String>, location_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            channel_id: channel_id.into(),
            location_id: location_id.into(),
        }
    }
    pub fn id_for(&self, domain: Domain) -> &str {
        match domain {
            Domain::Product => &self.product_id,
            Domain::Channel => &self.channel_id,
            Domain::Location => &self.location_id,
        }
    }
}

record! {
    Product {
        product_id => "ProductID",
        product_descr => "ProductDescr",
        level => "Level",
        business_unit => "BusinessUnit",
        is_daily_forecast_required => "IsDailyForecastRequired",
        is_new => "IsNew",
        product_family => "ProductFamily",
    }
}

impl MasterRow for Product {
    const DOMAIN: Domain = Domain::Product;
    fn id(&self) -> &str {
        &self.product_id
    }
}

record! {
    Channel {
        channel_id => "ChannelID",
        channel_descr => "ChannelDescr",
        level => "Level",
    }
}

impl MasterRow for Channel {
    const DOMAIN: Domain = Domain::Channel;
    fn id(&self) -> &str {
        &self.channel_id
    }
}

record! {
    Location {
        location_id => "LocationID",
        location_descr => "LocationDescr",
        level => "Level",
        geography => "Geography",
    }
}

impl MasterRow for Location {
    const DOMAIN: Domain = Domain::Location;
    fn id(&self) -> &str {
        &self.location_id
    }
}

record! {
    HistoryRow {
        product_id => "ProductID",
        channel_id => "ChannelID",
        location_id => "LocationID",
        period => "Period",
        start_date => "StartDate",
        end_date => "EndDate",
        qty => "Qty",
        kind => "Type",
        level => "Level",
    }
}

record! {
    ForecastRow {
        product_id => "ProductID",
        channel_id => "ChannelID",
        location_id => "LocationID",
        method => "Method",
        period => "Period",
        start_date => "StartDate",
        end_date => "EndDate",
        kind => "Type",
        qty => "Qty",
        level => "Level",
    }
}

/// Time granularity for history and forecast retrieval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Bucket {
    pub fn slug(&self) -> &'static str {
        match self {
            Bucket::Daily => "daily",
            Bucket::Weekly => "weekly",
            Bucket::Monthly => "monthly",
        }
    }
    pub fn title(&self) -> &'static str {
        match self {
            Bucket::Daily => "Daily",
            Bucket::Weekly => "Weekly",
            Bucket::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Snapshot returned by the search backend; discarded once reconciled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub keys: Vec<EntityKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSearch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl SavedSearch {
    pub fn new(name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            query: query.into(),
            created_at: None,
        }
    }
}
