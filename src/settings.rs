//! Runtime settings, read once at startup.
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `demandsearch.toml` (or the file given on the command line), then
//! environment variables such as `DEMANDSEARCH__MASTER_SEARCH_LIMIT=500`.

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::controller::{Screen, ViewSettings};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bind: String,
    pub log_level: String,
    pub master_search_limit: usize,
    pub detail_search_limit: usize,
    /// Limit for screens whose rows are the returned keys themselves.
    pub key_search_limit: usize,
    pub master_page_size: usize,
    pub detail_page_size: usize,
    pub export_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            log_level: "info".to_string(),
            master_search_limit: 20000,
            detail_search_limit: 5000,
            key_search_limit: 20000,
            master_page_size: 5,
            detail_page_size: 20,
            export_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    /// Layer the optional file and the environment over the defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path.unwrap_or("demandsearch")).required(false))
            .add_source(
                Environment::with_prefix("DEMANDSEARCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Per-screen settings. The Forecast list keeps the short master page.
    pub fn view_settings(&self, screen: Screen) -> ViewSettings {
        let mut view = ViewSettings::new(screen);
        if screen.is_master() {
            view.search_limit = self.master_search_limit;
            view.items_per_page = self.master_page_size;
        } else {
            view.search_limit = match screen {
                Screen::ForecastElement => self.key_search_limit,
                _ => self.detail_search_limit,
            };
            view.items_per_page = match screen {
                Screen::Forecast => self.master_page_size,
                _ => self.detail_page_size,
            };
        }
        view.export_dir = self.export_dir.clone();
        view
    }
}
