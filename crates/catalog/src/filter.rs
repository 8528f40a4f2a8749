use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Virtual product attribute filtered through the stock status index.
pub const QUANTITY_AND_STOCK_STATUS: &str = "quantity_and_stock_status";

/// Stock status value used when a filter carries no value.
pub const OUT_OF_STOCK_VALUE: &str = "0";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConditionError {
    #[error("unsupported condition type: {0}")]
    UnsupportedOperator(String),

    #[error("no custom condition registered for field: {0}")]
    UnknownField(String),
}

/// Comparison operators the stock status condition can express.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionType {
    Eq,
    Neq,
}

impl ConditionType {
    pub fn as_str(self) -> &'static str {
        match self {
            ConditionType::Eq => "eq",
            ConditionType::Neq => "neq",
        }
    }
}

impl FromStr for ConditionType {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "eq" => Ok(ConditionType::Eq),
            "neq" => Ok(ConditionType::Neq),
            other => Err(ConditionError::UnsupportedOperator(other.to_string())),
        }
    }
}

fn default_condition_type() -> String {
    ConditionType::Eq.as_str().to_string()
}

/// One attribute filter from a search request.
///
/// `condition_type` stays a raw string so unsupported operators reach the
/// condition builder and fail there with a typed error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    #[serde(default = "default_condition_type")]
    pub condition_type: String,
    #[serde(default, deserialize_with = "literal")]
    pub value: Option<String>,
}

/// Filter literal as sent by clients: a string or a JSON number.
#[derive(Deserialize)]
#[serde(untagged)]
enum Literal {
    Text(String),
    Integer(i64),
    Float(f64),
}

fn literal<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Literal>::deserialize(deserializer)?.map(|literal| match literal {
        Literal::Text(text) => text,
        Literal::Integer(n) => n.to_string(),
        Literal::Float(f) => f.to_string(),
    }))
}

impl Filter {
    pub fn new(field: impl Into<String>, condition_type: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            field: field.into(),
            condition_type: condition_type.into(),
            value: value.map(str::to_string),
        }
    }

    /// Shorthand for a `quantity_and_stock_status` filter.
    pub fn stock_status(condition_type: impl Into<String>, value: Option<&str>) -> Self {
        Self::new(QUANTITY_AND_STOCK_STATUS, condition_type, value)
    }

    pub fn parsed_condition_type(&self) -> Result<ConditionType, ConditionError> {
        self.condition_type.parse()
    }

    /// Filter value, defaulting to the out-of-stock literal.
    pub fn value_or_out_of_stock(&self) -> &str {
        self.value.as_deref().unwrap_or(OUT_OF_STOCK_VALUE)
    }
}
