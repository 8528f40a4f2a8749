//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error for values that cannot be accepted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A coded value is outside its known range (e.g. a status code).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. blank SKU, non-numeric product id).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure_kind() {
        assert_eq!(
            DomainError::validation("unknown status: 7").to_string(),
            "validation failed: unknown status: 7"
        );
        assert_eq!(DomainError::invalid_id("sku cannot be empty").to_string(), "invalid identifier: sku cannot be empty");
    }
}
