use serde::{Deserialize, Serialize};

use stockline_core::{DomainError, Entity, Sku, SourceCode};

/// Stock flag of one SKU at one source. Numeric on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum SourceItemStatus {
    OutOfStock = 0,
    InStock = 1,
}

impl SourceItemStatus {
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::OutOfStock),
            1 => Some(Self::InStock),
            _ => None,
        }
    }

    pub fn is_in_stock(self) -> bool {
        matches!(self, Self::InStock)
    }
}

impl TryFrom<i64> for SourceItemStatus {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_code(value)
            .ok_or_else(|| DomainError::validation(format!("unknown source item status: {value}")))
    }
}

impl From<SourceItemStatus> for i64 {
    fn from(value: SourceItemStatus) -> Self {
        value.code()
    }
}

/// Quantity record for one SKU at one source.
///
/// `(sku, source_code)` is the key; saving the same pair again replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceItem {
    pub sku: Sku,
    pub source_code: SourceCode,
    pub quantity: f64,
    pub status: SourceItemStatus,
}

impl SourceItem {
    pub fn new(sku: Sku, source_code: SourceCode, quantity: f64, status: SourceItemStatus) -> Self {
        Self {
            sku,
            source_code,
            quantity,
            status,
        }
    }

    pub fn is_in_stock(&self) -> bool {
        self.status.is_in_stock()
    }
}

impl Entity for SourceItem {
    type Id = (Sku, SourceCode);

    fn id(&self) -> Self::Id {
        (self.sku.clone(), self.source_code.clone())
    }
}

/// Unvalidated source item as received by the save operation.
///
/// Every field is optional so that missing and null fields reach the
/// validator chain and come back as field errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceItemInput {
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub source_code: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub status: Option<i64>,
}

impl SourceItemInput {
    pub fn new(sku: &str, source_code: &str, quantity: f64, status: SourceItemStatus) -> Self {
        Self {
            sku: Some(sku.to_string()),
            source_code: Some(source_code.to_string()),
            quantity: Some(quantity),
            status: Some(status.code()),
        }
    }
}
