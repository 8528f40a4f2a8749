//! Source item validation.
//!
//! Each validator inspects one field of a [`SourceItemInput`] and reports
//! field-scoped errors. The chain runs every validator and aggregates all
//! errors, so one response lists every failing field at once.

use serde::Serialize;

use stockline_core::{Sku, SourceCode};

use crate::source_item::{SourceItem, SourceItemInput, SourceItemStatus};

pub const FIELD_SKU: &str = "sku";
pub const FIELD_SOURCE_CODE: &str = "source_code";
pub const FIELD_QUANTITY: &str = "quantity";
pub const FIELD_STATUS: &str = "status";

const CAN_NOT_BE_EMPTY: &str = "\"%field\" can not be empty.";
const SHOULD_BE_STRING: &str = "\"%field\" should be string.";
const SHOULD_BE_NUMERIC: &str = "\"%field\" should be numeric.";
const SHOULD_BE_KNOWN_STATUS: &str = "\"%field\" should a known status.";

/// One field-scoped error: a message template plus the field it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub message: &'static str,
    pub field: &'static str,
}

impl ValidationError {
    pub fn new(message: &'static str, field: &'static str) -> Self {
        Self { message, field }
    }

    /// Message with `%field` substituted.
    pub fn render(&self) -> String {
        self.message.replace("%field", self.field)
    }
}

/// Aggregated outcome of running validators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }
}

impl core::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let rendered: Vec<String> = self.errors.iter().map(ValidationError::render).collect();
        write!(f, "{}", rendered.join(" "))
    }
}

/// A single validation rule over a source item input.
pub trait SourceItemValidator: Send + Sync {
    fn validate(&self, input: &SourceItemInput) -> ValidationResult;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SkuValidator;

impl SourceItemValidator for SkuValidator {
    fn validate(&self, input: &SourceItemInput) -> ValidationResult {
        let mut result = ValidationResult::new();
        let blank = input.sku.as_deref().map(|s| s.trim().is_empty()).unwrap_or(true);
        if blank {
            result.push(ValidationError::new(CAN_NOT_BE_EMPTY, FIELD_SKU));
        }
        result
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SourceCodeValidator;

impl SourceItemValidator for SourceCodeValidator {
    fn validate(&self, input: &SourceItemInput) -> ValidationResult {
        let mut result = ValidationResult::new();
        match input.source_code.as_deref() {
            None => result.push(ValidationError::new(SHOULD_BE_STRING, FIELD_SOURCE_CODE)),
            Some(code) if code.trim().is_empty() => {
                result.push(ValidationError::new(CAN_NOT_BE_EMPTY, FIELD_SOURCE_CODE))
            }
            Some(_) => {}
        }
        result
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct QuantityValidator;

impl SourceItemValidator for QuantityValidator {
    fn validate(&self, input: &SourceItemInput) -> ValidationResult {
        let mut result = ValidationResult::new();
        if !input.quantity.is_some_and(f64::is_finite) {
            result.push(ValidationError::new(SHOULD_BE_NUMERIC, FIELD_QUANTITY));
        }
        result
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StatusValidator;

impl SourceItemValidator for StatusValidator {
    fn validate(&self, input: &SourceItemInput) -> ValidationResult {
        let mut result = ValidationResult::new();
        match input.status {
            None => result.push(ValidationError::new(SHOULD_BE_NUMERIC, FIELD_STATUS)),
            Some(code) if SourceItemStatus::from_code(code).is_none() => {
                result.push(ValidationError::new(SHOULD_BE_KNOWN_STATUS, FIELD_STATUS))
            }
            Some(_) => {}
        }
        result
    }
}

/// Runs every registered validator in order and aggregates their errors.
pub struct SourceItemValidatorChain {
    validators: Vec<Box<dyn SourceItemValidator>>,
}

impl SourceItemValidatorChain {
    pub fn new(validators: Vec<Box<dyn SourceItemValidator>>) -> Self {
        Self { validators }
    }

    /// Validate and convert into a typed [`SourceItem`].
    pub fn check(&self, input: &SourceItemInput) -> Result<SourceItem, ValidationResult> {
        let result = self.validate(input);
        if !result.is_valid() {
            return Err(result);
        }
        to_source_item(input).ok_or(result)
    }
}

impl Default for SourceItemValidatorChain {
    fn default() -> Self {
        Self::new(vec![
            Box::new(SkuValidator),
            Box::new(SourceCodeValidator),
            Box::new(QuantityValidator),
            Box::new(StatusValidator),
        ])
    }
}

impl SourceItemValidator for SourceItemValidatorChain {
    fn validate(&self, input: &SourceItemInput) -> ValidationResult {
        let mut result = ValidationResult::new();
        for validator in &self.validators {
            result.merge(validator.validate(input));
        }
        result
    }
}

fn to_source_item(input: &SourceItemInput) -> Option<SourceItem> {
    let sku = Sku::parse(input.sku.as_deref()?).ok()?;
    let source_code = SourceCode::parse(input.source_code.as_deref()?).ok()?;
    let status = SourceItemStatus::from_code(input.status?)?;
    Some(SourceItem::new(sku, source_code, input.quantity?, status))
}
