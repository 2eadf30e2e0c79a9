//! Turns an ordered list of criteria into the backend's boolean query string.
//!
//! The grammar is `token:value ((AND|OR) token:value)*`. Values without any of
//! the wildcard characters `.`, `*` or `%` are wrapped as `*value*` for an
//! implicit substring match, and values containing whitespace, a colon or a
//! double quote are then double-quoted (internal quotes escaped as `\"`).
//! Compilation is a pure function of its input.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::criterion::Criterion;
use crate::error::{Result, SearchError};
use crate::registry::{self, Domain};

lazy_static! {
    static ref WILDCARD: Regex = Regex::new(r"[.*%]").unwrap();
    static ref NEEDS_QUOTES: Regex = Regex::new(r#"[\s:"]"#).unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompiledQuery(String);

impl CompiledQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CompiledQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Wildcard-augment and quote a trimmed value. `None` for blank input.
pub fn format_value(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let mut formatted = if WILDCARD.is_match(value) {
        value.to_string()
    } else {
        format!("*{value}*")
    };
    if NEEDS_QUOTES.is_match(&formatted) {
        formatted = format!("\"{}\"", formatted.replace('"', "\\\""));
    }
    Some(formatted)
}

/// `token:value` for one criterion, `None` when the value is blank.
pub fn fragment(token: &str, value: &str) -> Option<String> {
    format_value(value).map(|value| format!("{token}:{value}"))
}

/// Compile criteria in order. Blank criteria are dropped; `None` means there
/// is nothing to run.
pub fn compile(criteria: &[Criterion]) -> Option<CompiledQuery> {
    let mut parts: Vec<String> = Vec::with_capacity(criteria.len() * 2);
    for criterion in criteria {
        let Some(piece) = fragment(&criterion.field, &criterion.value) else {
            continue;
        };
        if !parts.is_empty() {
            parts.push(criterion.operator().to_string());
        }
        parts.push(piece);
    }
    if parts.is_empty() {
        return None;
    }
    let query = CompiledQuery(parts.join(" "));
    debug!(query = %query, "compiled criteria");
    Some(query)
}

/// Multi-field search forms: every non-blank `(token, value)` joined by AND.
pub fn conjunction<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Option<CompiledQuery> {
    let criteria: Vec<Criterion> = fields
        .into_iter()
        .map(|(token, value)| Criterion::and(token, value))
        .collect();
    compile(&criteria)
}

/// Compile after checking each surviving criterion names a registered token,
/// either of `domain` or, when `None`, of any domain. The query carries the
/// registry's spelling of each token.
pub fn compile_checked(domain: Option<Domain>, criteria: &[Criterion]) -> Result<Option<CompiledQuery>> {
    let mut canonical = Vec::with_capacity(criteria.len());
    for criterion in criteria {
        if criterion.is_blank() {
            continue;
        }
        let entry = match domain {
            Some(domain) => registry::entry_for_token(domain, &criterion.field),
            None => Domain::owning(&criterion.field)
                .and_then(|owner| registry::entry_for_token(owner, &criterion.field)),
        };
        let Some(entry) = entry else {
            return Err(match domain {
                Some(domain) => SearchError::UnknownField {
                    domain,
                    field: criterion.field.clone(),
                },
                None => SearchError::Validation(format!("Unknown search field '{}'.", criterion.field)),
            });
        };
        canonical.push(Criterion {
            field: entry.token.to_string(),
            ..criterion.clone()
        });
    }
    Ok(compile(&canonical))
}
