//! Catalog search conditions backed by the stock status index.
//!
//! The central piece is [`StockStatusCondition`]: it translates a
//! `quantity_and_stock_status` attribute filter into a [`Predicate`] over the
//! product collection. The predicate renders to a SQL fragment for the query
//! engine and can also be evaluated in memory against a
//! [`StockStatusLookup`].

pub mod condition;
pub mod filter;
pub mod predicate;
pub mod stock_status;

pub use condition::{ConditionRegistry, CustomCondition, StockStatusCondition};
pub use filter::{ConditionError, ConditionType, Filter, QUANTITY_AND_STOCK_STATUS};
pub use predicate::{
    DefaultPredicateBuilder, EvaluationContext, Predicate, QueryPredicateBuilder, Select, WhereClause,
};
pub use stock_status::{StockStatus, StockStatusFlag, StockStatusLookup};
