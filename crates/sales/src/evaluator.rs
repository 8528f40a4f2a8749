use thiserror::Error;

use stockline_core::{Sku, StockId};
use stockline_inventory::{InventoryRepositories, StockConfiguration, StockItem};

use crate::decision::{SalabilityDecision, SalabilityFacts, decide};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SalabilityError {
    #[error("product with SKU \"{0}\" does not exist")]
    NotFound(Sku),
}

/// Whether a requested quantity of a SKU can currently be sold.
pub trait IsProductSalable: Send + Sync {
    fn execute(&self, sku: &Sku, requested_qty: f64) -> Result<bool, SalabilityError>;
}

/// Evaluates salability for one stock from the inventory repositories.
#[derive(Clone)]
pub struct ProductSalabilityEvaluator {
    repositories: InventoryRepositories,
    config: StockConfiguration,
    stock_id: StockId,
}

impl ProductSalabilityEvaluator {
    pub fn new(repositories: InventoryRepositories, config: StockConfiguration, stock_id: StockId) -> Self {
        Self {
            repositories,
            config,
            stock_id,
        }
    }

    /// Same collaborators, another stock.
    pub fn for_stock(&self, stock_id: StockId) -> Self {
        Self {
            stock_id,
            ..self.clone()
        }
    }

    pub fn stock_id(&self) -> StockId {
        self.stock_id
    }

    pub fn is_salable(&self, sku: &Sku, requested_qty: f64) -> Result<bool, SalabilityError> {
        Ok(self.evaluate(sku, requested_qty)?.is_salable())
    }

    pub fn evaluate(&self, sku: &Sku, requested_qty: f64) -> Result<SalabilityDecision, SalabilityError> {
        let facts = self.facts(sku)?;
        let decision = decide(&facts, requested_qty);
        tracing::debug!(
            sku = %sku,
            stock_id = %self.stock_id,
            requested_qty,
            ?decision,
            "evaluated product salability"
        );
        Ok(decision)
    }

    /// Resolve the decision inputs for `sku` in this evaluator's stock.
    pub fn facts(&self, sku: &Sku) -> Result<SalabilityFacts, SalabilityError> {
        let repos = &self.repositories;
        let product = repos
            .products
            .get_by_sku(sku)
            .ok_or_else(|| SalabilityError::NotFound(sku.clone()))?;

        // A product without a legacy stock item follows the global configuration.
        let stock_item = repos
            .stock_items
            .get(product.product_id, self.stock_id)
            .unwrap_or_else(|| StockItem::new(product.product_id, self.stock_id));

        let in_stock_quantities = match repos.stocks.get(self.stock_id) {
            Some(stock) => repos
                .source_items
                .get_by_sku(sku)
                .into_iter()
                .filter(|item| item.is_in_stock() && stock.is_linked(&item.source_code))
                .filter(|item| {
                    repos
                        .sources
                        .get(&item.source_code)
                        .is_some_and(|source| source.enabled)
                })
                .map(|item| item.quantity)
                .collect(),
            None => Vec::new(),
        };

        Ok(SalabilityFacts {
            manage_stock: stock_item.effective_manage_stock(&self.config),
            backorders: stock_item.effective_backorders(&self.config),
            min_qty: stock_item.effective_min_qty(&self.config),
            reserved_qty: repos.reservations.reserved_qty(sku, self.stock_id),
            in_stock_quantities,
        })
    }
}

impl IsProductSalable for ProductSalabilityEvaluator {
    fn execute(&self, sku: &Sku, requested_qty: f64) -> Result<bool, SalabilityError> {
        self.is_salable(sku, requested_qty)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use stockline_core::{ProductId, SourceCode};
    use stockline_inventory::{
        BackorderPolicy, Product, ProductRepository, RepositoryError, ReservationLookup, Source,
        SourceItem, SourceItemRepository, SourceItemStatus, SourceRepository, Stock,
        StockItemRepository, StockRepository,
    };

    use super::*;

    #[derive(Default)]
    struct Fixture {
        products: Mutex<Vec<Product>>,
        sources: Mutex<Vec<Source>>,
        stocks: Mutex<Vec<Stock>>,
        items: Mutex<Vec<SourceItem>>,
        stock_items: Mutex<HashMap<(ProductId, StockId), StockItem>>,
        reserved: Mutex<f64>,
    }

    impl ProductRepository for Fixture {
        fn get(&self, product_id: ProductId) -> Option<Product> {
            self.products.lock().unwrap().iter().find(|p| p.product_id == product_id).cloned()
        }
        fn get_by_sku(&self, sku: &Sku) -> Option<Product> {
            self.products.lock().unwrap().iter().find(|p| &p.sku == sku).cloned()
        }
        fn save(&self, product: Product) -> Result<(), RepositoryError> {
            self.products.lock().unwrap().push(product);
            Ok(())
        }
        fn list(&self) -> Vec<Product> {
            self.products.lock().unwrap().clone()
        }
    }

    impl SourceRepository for Fixture {
        fn get(&self, code: &SourceCode) -> Option<Source> {
            self.sources.lock().unwrap().iter().find(|s| &s.code == code).cloned()
        }
        fn save(&self, source: Source) -> Result<(), RepositoryError> {
            self.sources.lock().unwrap().push(source);
            Ok(())
        }
        fn list(&self) -> Vec<Source> {
            self.sources.lock().unwrap().clone()
        }
    }

    impl StockRepository for Fixture {
        fn get(&self, stock_id: StockId) -> Option<Stock> {
            self.stocks.lock().unwrap().iter().find(|s| s.stock_id == stock_id).cloned()
        }
        fn save(&self, stock: Stock) -> Result<(), RepositoryError> {
            self.stocks.lock().unwrap().push(stock);
            Ok(())
        }
        fn list(&self) -> Vec<Stock> {
            self.stocks.lock().unwrap().clone()
        }
    }

    impl SourceItemRepository for Fixture {
        fn get_by_sku(&self, sku: &Sku) -> Vec<SourceItem> {
            self.items.lock().unwrap().iter().filter(|i| &i.sku == sku).cloned().collect()
        }
        fn save_many(&self, items: Vec<SourceItem>) -> Result<(), RepositoryError> {
            self.items.lock().unwrap().extend(items);
            Ok(())
        }
        fn list(&self) -> Vec<SourceItem> {
            self.items.lock().unwrap().clone()
        }
    }

    impl StockItemRepository for Fixture {
        fn get(&self, product_id: ProductId, stock_id: StockId) -> Option<StockItem> {
            self.stock_items.lock().unwrap().get(&(product_id, stock_id)).cloned()
        }
        fn save(&self, item: StockItem) -> Result<(), RepositoryError> {
            self.stock_items
                .lock()
                .unwrap()
                .insert((item.product_id, item.stock_id), item);
            Ok(())
        }
    }

    impl ReservationLookup for Fixture {
        fn reserved_qty(&self, _sku: &Sku, _stock_id: StockId) -> f64 {
            *self.reserved.lock().unwrap()
        }
    }

    fn sku(s: &str) -> Sku {
        Sku::parse(s).unwrap()
    }

    fn code(s: &str) -> SourceCode {
        SourceCode::parse(s).unwrap()
    }

    const EU_STOCK: StockId = StockId::new(10);

    /// SKU-1 in stock 10, linked to sources eu-1 (enabled) and eu-disabled.
    fn fixture() -> Arc<Fixture> {
        let f = Arc::new(Fixture::default());
        ProductRepository::save(&*f, Product::new(ProductId::new(1), sku("SKU-1"))).unwrap();
        SourceRepository::save(&*f, Source::new(code("eu-1"), "EU 1")).unwrap();
        let mut disabled = Source::new(code("eu-disabled"), "EU disabled");
        disabled.enabled = false;
        SourceRepository::save(&*f, disabled).unwrap();
        SourceRepository::save(&*f, Source::new(code("us-1"), "US 1")).unwrap();
        StockRepository::save(
            &*f,
            Stock::new(EU_STOCK, "EU stock").with_sources([code("eu-1"), code("eu-disabled")]),
        )
        .unwrap();
        f
    }

    fn evaluator(f: &Arc<Fixture>) -> ProductSalabilityEvaluator {
        let repositories = InventoryRepositories {
            products: f.clone(),
            sources: f.clone(),
            stocks: f.clone(),
            source_items: f.clone(),
            stock_items: f.clone(),
            reservations: f.clone(),
        };
        ProductSalabilityEvaluator::new(repositories, StockConfiguration::default(), EU_STOCK)
    }

    fn item(source: &str, qty: f64, status: SourceItemStatus) -> SourceItem {
        SourceItem::new(sku("SKU-1"), code(source), qty, status)
    }

    #[test]
    fn unknown_sku_is_not_found() {
        let f = fixture();
        let err = evaluator(&f).is_salable(&sku("SKU-404"), 1.0).unwrap_err();
        assert_eq!(err, SalabilityError::NotFound(sku("SKU-404")));
    }

    #[test]
    fn item_level_backorders_do_not_rescue_out_of_stock_source_items() {
        let f = fixture();
        f.save_many(vec![item("eu-1", 0.0, SourceItemStatus::OutOfStock)]).unwrap();
        let mut stock_item = StockItem::new(ProductId::new(1), EU_STOCK);
        stock_item.set_backorders(BackorderPolicy::Allowed);
        stock_item.set_use_config_backorders(false);
        StockItemRepository::save(&*f, stock_item).unwrap();

        assert!(!evaluator(&f).execute(&sku("SKU-1"), 10.0).unwrap());
    }

    #[test]
    fn backorders_allow_selling_beyond_quantity() {
        let f = fixture();
        f.save_many(vec![item("eu-1", 1.0, SourceItemStatus::InStock)]).unwrap();
        let mut stock_item = StockItem::new(ProductId::new(1), EU_STOCK);
        stock_item.set_backorders(BackorderPolicy::Allowed);
        stock_item.set_use_config_backorders(false);
        StockItemRepository::save(&*f, stock_item).unwrap();

        assert_eq!(
            evaluator(&f).evaluate(&sku("SKU-1"), 10.0).unwrap(),
            SalabilityDecision::BackordersAllowed
        );
    }

    #[test]
    fn use_config_backorders_ignores_item_level_policy() {
        let f = fixture();
        f.save_many(vec![item("eu-1", 1.0, SourceItemStatus::InStock)]).unwrap();
        let mut stock_item = StockItem::new(ProductId::new(1), EU_STOCK);
        stock_item.set_backorders(BackorderPolicy::Allowed);
        StockItemRepository::save(&*f, stock_item).unwrap();

        assert!(!evaluator(&f).is_salable(&sku("SKU-1"), 10.0).unwrap());
    }

    #[test]
    fn only_enabled_sources_linked_to_the_stock_count() {
        let f = fixture();
        f.save_many(vec![
            item("eu-disabled", 100.0, SourceItemStatus::InStock),
            item("us-1", 100.0, SourceItemStatus::InStock),
            item("eu-1", 2.0, SourceItemStatus::InStock),
        ])
        .unwrap();

        let facts = evaluator(&f).facts(&sku("SKU-1")).unwrap();
        assert_eq!(facts.in_stock_quantities, vec![2.0]);
        assert!(evaluator(&f).is_salable(&sku("SKU-1"), 2.0).unwrap());
        assert!(!evaluator(&f).is_salable(&sku("SKU-1"), 3.0).unwrap());
    }

    #[test]
    fn reservations_are_deducted() {
        let f = fixture();
        f.save_many(vec![item("eu-1", 5.0, SourceItemStatus::InStock)]).unwrap();
        *f.reserved.lock().unwrap() = 4.0;

        assert!(evaluator(&f).is_salable(&sku("SKU-1"), 1.0).unwrap());
        assert!(!evaluator(&f).is_salable(&sku("SKU-1"), 2.0).unwrap());
    }

    #[test]
    fn unknown_stock_has_no_sources() {
        let f = fixture();
        f.save_many(vec![item("eu-1", 5.0, SourceItemStatus::InStock)]).unwrap();

        let other = evaluator(&f).for_stock(StockId::new(99));
        assert_eq!(other.stock_id(), StockId::new(99));
        assert_eq!(
            other.evaluate(&sku("SKU-1"), 1.0).unwrap(),
            SalabilityDecision::NoSourceItemInStock
        );
    }
}
