//! Salability decision table.
//!
//! Rows are evaluated top to bottom; the first one that applies decides:
//!
//! | # | condition                                              | salable |
//! |---|--------------------------------------------------------|---------|
//! | 1 | stock is not managed                                   | yes     |
//! | 2 | no source item is in stock                             | no      |
//! | 3 | backorders are allowed                                 | yes     |
//! | 4 | one in-stock source covers `qty + min_qty + reserved`  | yes     |
//! | 5 | otherwise                                              | no      |
//!
//! Row 2 precedes row 3: backorders never make a product salable whose
//! source items are all flagged out of stock.

use serde::Serialize;

use stockline_inventory::BackorderPolicy;

/// Everything the decision needs, resolved for one SKU in one stock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalabilityFacts {
    /// Effective manage-stock setting (use-config resolved).
    pub manage_stock: bool,
    /// Effective backorder policy (use-config resolved).
    pub backorders: BackorderPolicy,
    /// Effective out-of-stock threshold.
    pub min_qty: f64,
    /// Quantity reserved by pending orders in this stock.
    pub reserved_qty: f64,
    /// Quantities of the in-stock source items on enabled sources of the stock.
    pub in_stock_quantities: Vec<f64>,
}

/// Which row of the table decided.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SalabilityDecision {
    StockNotManaged,
    NoSourceItemInStock,
    BackordersAllowed,
    QuantityAvailable,
    InsufficientQuantity,
}

impl SalabilityDecision {
    pub fn is_salable(self) -> bool {
        matches!(
            self,
            SalabilityDecision::StockNotManaged
                | SalabilityDecision::BackordersAllowed
                | SalabilityDecision::QuantityAvailable
        )
    }
}

pub fn decide(facts: &SalabilityFacts, requested_qty: f64) -> SalabilityDecision {
    if !facts.manage_stock {
        return SalabilityDecision::StockNotManaged;
    }
    if facts.in_stock_quantities.is_empty() {
        return SalabilityDecision::NoSourceItemInStock;
    }
    if facts.backorders.allows_backorders() {
        return SalabilityDecision::BackordersAllowed;
    }

    let covered = facts
        .in_stock_quantities
        .iter()
        .any(|qty| qty - facts.min_qty - facts.reserved_qty >= requested_qty);
    if covered {
        SalabilityDecision::QuantityAvailable
    } else {
        SalabilityDecision::InsufficientQuantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn facts(in_stock_quantities: Vec<f64>) -> SalabilityFacts {
        SalabilityFacts {
            manage_stock: true,
            backorders: BackorderPolicy::NoBackorders,
            min_qty: 0.0,
            reserved_qty: 0.0,
            in_stock_quantities,
        }
    }

    #[test]
    fn unmanaged_stock_is_always_salable() {
        let mut f = facts(vec![]);
        f.manage_stock = false;
        assert_eq!(decide(&f, 1_000.0), SalabilityDecision::StockNotManaged);
    }

    #[test]
    fn backorders_do_not_override_out_of_stock_source_items() {
        let mut f = facts(vec![]);
        f.backorders = BackorderPolicy::Allowed;
        let decision = decide(&f, 10.0);
        assert_eq!(decision, SalabilityDecision::NoSourceItemInStock);
        assert!(!decision.is_salable());
    }

    #[test]
    fn backorders_cover_any_quantity_once_a_source_is_in_stock() {
        let mut f = facts(vec![0.0]);
        f.backorders = BackorderPolicy::AllowedNotifyCustomer;
        assert_eq!(decide(&f, 500.0), SalabilityDecision::BackordersAllowed);
    }

    #[test]
    fn one_source_must_cover_the_requested_quantity() {
        let f = facts(vec![4.0, 6.0]);
        assert_eq!(decide(&f, 6.0), SalabilityDecision::QuantityAvailable);
        assert_eq!(decide(&f, 7.0), SalabilityDecision::InsufficientQuantity);
    }

    #[test]
    fn min_qty_and_reservations_reduce_availability() {
        let mut f = facts(vec![10.0]);
        f.min_qty = 2.0;
        f.reserved_qty = 3.0;
        assert_eq!(decide(&f, 5.0), SalabilityDecision::QuantityAvailable);
        assert_eq!(decide(&f, 5.5), SalabilityDecision::InsufficientQuantity);
    }

    proptest! {
        #[test]
        fn no_in_stock_source_is_never_salable_while_managed(
            backorders in prop::sample::select(vec![
                BackorderPolicy::NoBackorders,
                BackorderPolicy::Allowed,
                BackorderPolicy::AllowedNotifyCustomer,
            ]),
            min_qty in -5.0f64..5.0,
            requested in 0.0f64..100.0,
        ) {
            let mut f = facts(vec![]);
            f.backorders = backorders;
            f.min_qty = min_qty;
            prop_assert!(!decide(&f, requested).is_salable());
        }

        #[test]
        fn requesting_less_never_turns_salable_into_unsalable(
            quantities in prop::collection::vec(0.0f64..50.0, 1..5),
            requested in 0.0f64..60.0,
            less in 0.0f64..60.0,
        ) {
            let f = facts(quantities);
            let smaller = requested.min(less);
            if decide(&f, requested).is_salable() {
                prop_assert!(decide(&f, smaller).is_salable());
            }
        }
    }
}
