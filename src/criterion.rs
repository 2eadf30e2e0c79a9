use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    #[default]
    And,
    Or,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operator::And => write!(f, "AND"),
            Operator::Or => write!(f, "OR"),
        }
    }
}

/// One field/value filter unit. The operator is placed *before* the
/// criterion it belongs to and is ignored on the first one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Criterion {
    #[serde(alias = "key")]
    pub field: String,
    pub value: String,
    #[serde(default, alias = "op", skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
}

impl Criterion {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            operator: None,
        }
    }
    pub fn and(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, value).with_operator(Operator::And)
    }
    pub fn or(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, value).with_operator(Operator::Or)
    }
    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }
    pub fn operator(&self) -> Operator {
        self.operator.unwrap_or_default()
    }
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}
