//! Stock status indexer.
//!
//! Materializes one [`StockStatus`] row per (product, stock) so catalog
//! filtering never has to evaluate salability per product. Rows are
//! disposable: [`StockStatusIndexer::reindex_all`] rebuilds them from the
//! inventory repositories.

use std::sync::Arc;

use stockline_catalog::{StockStatus, StockStatusFlag, StockStatusLookup};
use stockline_core::{Sku, StockId};
use stockline_inventory::{InventoryRepositories, RepositoryError, StockConfiguration};
use stockline_sales::{ProductSalabilityEvaluator, SalabilityError, decide};

/// Write side of the stock status index.
pub trait StockStatusIndex: StockStatusLookup {
    fn upsert_many(&self, rows: Vec<StockStatus>) -> Result<(), RepositoryError>;
    fn clear(&self) -> Result<(), RepositoryError>;
}

pub struct StockStatusIndexer {
    repositories: InventoryRepositories,
    evaluator: ProductSalabilityEvaluator,
    index: Arc<dyn StockStatusIndex>,
}

impl StockStatusIndexer {
    pub fn new(
        repositories: InventoryRepositories,
        config: StockConfiguration,
        index: Arc<dyn StockStatusIndex>,
    ) -> Self {
        let evaluator = ProductSalabilityEvaluator::new(repositories.clone(), config, StockId::DEFAULT);
        Self {
            repositories,
            evaluator,
            index,
        }
    }

    /// Recompute the rows of `skus` in every stock. Unknown SKUs are skipped.
    ///
    /// Returns the number of rows written.
    pub fn reindex_skus(&self, skus: &[Sku]) -> Result<usize, RepositoryError> {
        let stocks: Vec<StockId> = self
            .repositories
            .stocks
            .list()
            .into_iter()
            .map(|s| s.stock_id)
            .collect();

        let mut rows = Vec::new();
        for sku in skus {
            for stock_id in &stocks {
                match self.row(sku, *stock_id) {
                    Ok(row) => rows.push(row),
                    Err(SalabilityError::NotFound(_)) => {
                        tracing::debug!(sku = %sku, "skipping stock status for unknown sku");
                        break;
                    }
                }
            }
        }

        let written = rows.len();
        self.index.upsert_many(rows)?;
        tracing::info!(skus = skus.len(), rows = written, "stock status reindexed");
        Ok(written)
    }

    /// Clear the index and rebuild it for every product.
    pub fn reindex_all(&self) -> Result<usize, RepositoryError> {
        let skus: Vec<Sku> = self
            .repositories
            .products
            .list()
            .into_iter()
            .map(|p| p.sku)
            .collect();
        self.index.clear()?;
        self.reindex_skus(&skus)
    }

    fn row(&self, sku: &Sku, stock_id: StockId) -> Result<StockStatus, SalabilityError> {
        let evaluator = self.evaluator.for_stock(stock_id);
        let facts = evaluator.facts(sku)?;
        let product_id = self
            .repositories
            .products
            .get_by_sku(sku)
            .map(|p| p.product_id)
            .ok_or_else(|| SalabilityError::NotFound(sku.clone()))?;

        Ok(StockStatus {
            product_id,
            stock_id,
            status: StockStatusFlag::from_bool(decide(&facts, 1.0).is_salable()),
            qty: facts.in_stock_quantities.iter().sum(),
        })
    }
}
