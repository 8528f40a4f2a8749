use std::sync::Arc;

use serde::Serialize;

use stockline_catalog::{
    ConditionError, ConditionRegistry, EvaluationContext, Filter, QueryPredicateBuilder,
    StockStatusLookup,
};
use stockline_core::Sku;
use stockline_inventory::ProductRepository;

/// Outcome of a filtered product search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// SQL fragment the filter translates to.
    pub condition: String,
    /// SKUs of matching products, ordered by product id.
    pub skus: Vec<Sku>,
}

/// Product collection filtering through the registered custom conditions.
pub struct ProductSearch {
    registry: ConditionRegistry,
    connection: Arc<dyn QueryPredicateBuilder>,
    products: Arc<dyn ProductRepository>,
    index: Arc<dyn StockStatusLookup>,
}

impl ProductSearch {
    pub fn new(
        connection: Arc<dyn QueryPredicateBuilder>,
        products: Arc<dyn ProductRepository>,
        index: Arc<dyn StockStatusLookup>,
    ) -> Self {
        Self {
            registry: ConditionRegistry::with_stock_status(connection.clone()),
            connection,
            products,
            index,
        }
    }

    /// Products of `website_id` matching `filter`.
    pub fn search(&self, filter: &Filter, website_id: u32) -> Result<SearchResult, ConditionError> {
        let predicate = self.registry.build(filter)?;
        let ctx = EvaluationContext::new(website_id);

        let candidates: Vec<_> = self
            .products
            .list()
            .into_iter()
            .filter(|p| p.in_website(website_id))
            .collect();
        let matched = predicate.filter_products(candidates.iter().map(|p| p.product_id), &ctx, &*self.index);
        let skus = candidates
            .into_iter()
            .filter(|p| matched.contains(&p.product_id))
            .map(|p| p.sku)
            .collect();

        Ok(SearchResult {
            condition: predicate.to_sql(self.connection.as_ref()),
            skus,
        })
    }
}
