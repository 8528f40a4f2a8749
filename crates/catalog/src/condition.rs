use std::collections::HashMap;
use std::sync::Arc;

use crate::filter::{ConditionError, ConditionType, Filter, QUANTITY_AND_STOCK_STATUS};
use crate::predicate::{
    ENTITY_ID, MAIN_TABLE_ALIAS, Predicate, QueryPredicateBuilder, Select, WEBSITE_ID_REFERENCE,
    WhereClause,
};

/// Logical name of the stock status index table.
pub const STOCK_STATUS_TABLE: &str = "cataloginventory_stock_status";
const STOCK_STATUS_ALIAS: &str = "ciss";

/// Builds a collection predicate for one attribute filter.
pub trait CustomCondition: Send + Sync {
    fn build(&self, filter: &Filter) -> Result<Predicate, ConditionError>;
}

/// Filters products by `quantity_and_stock_status` through the stock status
/// index, in the stock of the collection's current website.
///
/// `eq` keeps products whose indexed status equals the filter value, `neq`
/// keeps every other product (including products with no index row).
pub struct StockStatusCondition {
    connection: Arc<dyn QueryPredicateBuilder>,
}

impl StockStatusCondition {
    pub fn new(connection: Arc<dyn QueryPredicateBuilder>) -> Self {
        Self { connection }
    }

    fn stock_status_select(&self, value: &str) -> Select {
        let alias = STOCK_STATUS_ALIAS;
        Select::from(
            self.connection.table_name(STOCK_STATUS_TABLE),
            alias,
            format!("{alias}.product_id"),
        )
        .where_clause(WhereClause::Equals {
            column: format!("{alias}.stock_status"),
            value: value.to_string(),
        })
        .where_clause(WhereClause::Correlated {
            column: format!("{alias}.stock_id"),
            outer: WEBSITE_ID_REFERENCE.to_string(),
        })
    }
}

impl CustomCondition for StockStatusCondition {
    fn build(&self, filter: &Filter) -> Result<Predicate, ConditionError> {
        let condition_type = filter.parsed_condition_type()?;
        let negated = match condition_type {
            ConditionType::Eq => false,
            ConditionType::Neq => true,
        };

        let predicate = Predicate::InSubquery {
            column: format!("{MAIN_TABLE_ALIAS}.{ENTITY_ID}"),
            negated,
            subquery: self.stock_status_select(filter.value_or_out_of_stock()),
        };

        tracing::debug!(
            condition_type = condition_type.as_str(),
            value = filter.value_or_out_of_stock(),
            "built stock status condition"
        );
        Ok(predicate)
    }
}

/// Custom conditions keyed by the attribute they handle.
#[derive(Default)]
pub struct ConditionRegistry {
    conditions: HashMap<String, Arc<dyn CustomCondition>>,
}

impl ConditionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the stock status condition on `quantity_and_stock_status`.
    pub fn with_stock_status(connection: Arc<dyn QueryPredicateBuilder>) -> Self {
        let mut registry = Self::new();
        registry.register(
            QUANTITY_AND_STOCK_STATUS,
            Arc::new(StockStatusCondition::new(connection)),
        );
        registry
    }

    pub fn register(&mut self, field: impl Into<String>, condition: Arc<dyn CustomCondition>) {
        self.conditions.insert(field.into(), condition);
    }

    pub fn has_processor(&self, field: &str) -> bool {
        self.conditions.contains_key(field)
    }

    pub fn build(&self, filter: &Filter) -> Result<Predicate, ConditionError> {
        let condition = self
            .conditions
            .get(&filter.field)
            .ok_or_else(|| ConditionError::UnknownField(filter.field.clone()))?;
        condition.build(filter)
    }
}
