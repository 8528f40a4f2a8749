use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use stockline_core::Sku;
use stockline_inventory::{
    validation::{FIELD_QUANTITY, FIELD_SKU, FIELD_SOURCE_CODE, FIELD_STATUS},
    BackorderPolicy, SourceItemInput,
};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateSourceRequest {
    pub code: String,
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub country_id: Option<String>,
    pub postcode: Option<String>,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CreateStockRequest {
    pub stock_id: u32,
    pub name: String,
    #[serde(default)]
    pub source_codes: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub product_id: u64,
    pub sku: String,
    #[serde(default)]
    pub website_ids: Vec<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStockItemRequest {
    #[serde(rename = "stockItem")]
    pub stock_item: StockItemPatch,
}

/// Legacy stock item fields; absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
pub struct StockItemPatch {
    pub stock_id: Option<u32>,
    pub manage_stock: Option<bool>,
    pub use_config_manage_stock: Option<bool>,
    pub backorders: Option<BackorderPolicy>,
    pub use_config_backorders: Option<bool>,
    pub min_qty: Option<f64>,
    pub use_config_min_qty: Option<bool>,
}

/// Raw batch; items stay untyped until [`decode_source_items`] coerces them.
#[derive(Debug, Deserialize)]
pub struct SaveSourceItemsRequest {
    #[serde(rename = "sourceItems", default)]
    pub source_items: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(flatten)]
    pub filter: stockline_catalog::Filter,
    pub website_id: Option<u32>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct SalableResponse {
    pub sku: Sku,
    pub requested_qty: f64,
    pub salable: bool,
}

// -------------------------
// Transport coercion
// -------------------------

/// A JSON value that cannot be coerced to the field's wire type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Error occurred during \"{field}\" processing. Invalid type for value: \"{value}\". Expected Type: \"{expected}\".")]
pub struct TransportError {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl TransportError {
    fn new(field: &'static str, value: &Value, expected: &'static str) -> Self {
        Self {
            field,
            value: render(value),
            expected,
        }
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
        other => other.to_string(),
    }
}

/// Coerce raw items to [`SourceItemInput`]. Missing and `null` fields stay
/// `None` so the validator chain reports them; values of the wrong type are
/// rejected here.
pub fn decode_source_items(items: &[Value]) -> Result<Vec<SourceItemInput>, TransportError> {
    items.iter().map(decode_source_item).collect()
}

fn decode_source_item(item: &Value) -> Result<SourceItemInput, TransportError> {
    let field = |name: &str| item.get(name).filter(|v| !v.is_null());

    Ok(SourceItemInput {
        sku: field(FIELD_SKU).map(|v| as_string(FIELD_SKU, v, true)).transpose()?,
        source_code: field(FIELD_SOURCE_CODE)
            .map(|v| as_string(FIELD_SOURCE_CODE, v, false))
            .transpose()?,
        quantity: field(FIELD_QUANTITY).map(|v| as_float(FIELD_QUANTITY, v)).transpose()?,
        status: field(FIELD_STATUS).map(|v| as_int(FIELD_STATUS, v)).transpose()?,
    })
}

fn as_string(field: &'static str, value: &Value, allow_empty: bool) -> Result<String, TransportError> {
    match value {
        Value::String(s) if allow_empty || !s.is_empty() => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(TransportError::new(field, value, "string")),
    }
}

fn as_float(field: &'static str, value: &Value) -> Result<f64, TransportError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    };
    parsed.ok_or_else(|| TransportError::new(field, value, "float"))
}

fn as_int(field: &'static str, value: &Value) -> Result<i64, TransportError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| TransportError::new(field, value, "int"))
}
