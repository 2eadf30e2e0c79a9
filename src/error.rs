use thiserror::Error;

use crate::registry::Domain;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Unknown field '{field}' for {domain}")]
    UnknownField { domain: Domain, field: String },
    #[error("Saved search does not include {domain} attributes")]
    Inapplicable { domain: Domain },
    #[error("Collaborator error: {0}")]
    Collaborator(String),
    #[error("Export error: {0}")]
    Export(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;

impl SearchError {
    /// The text a screen shows for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) | Self::Collaborator(message) => message.clone(),
            Self::UnknownField { domain, .. } => {
                format!("Please choose a valid {} attribute.", domain.name())
            }
            Self::Inapplicable { domain } => format!(
                "This saved search does not include {0} attributes. The {1} page only runs searches with {0} fields.",
                domain.name(),
                domain.title()
            ),
            other => other.to_string(),
        }
    }
}

// Helper conversions
impl From<config::ConfigError> for SearchError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
impl From<csv::Error> for SearchError {
    fn from(e: csv::Error) -> Self {
        Self::Export(e.to_string())
    }
}
impl From<std::io::Error> for SearchError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
