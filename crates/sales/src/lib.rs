//! Sales-side inventory rules: can a requested quantity of a SKU be sold?
//!
//! The rule itself ([`decision::decide`]) is a pure decision table over
//! [`decision::SalabilityFacts`]; [`evaluator::ProductSalabilityEvaluator`]
//! gathers those facts from the inventory repositories.

pub mod decision;
pub mod evaluator;

pub use decision::{SalabilityDecision, SalabilityFacts, decide};
pub use evaluator::{IsProductSalable, ProductSalabilityEvaluator, SalabilityError};
