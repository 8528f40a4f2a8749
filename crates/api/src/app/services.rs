use std::sync::Arc;

use stockline_catalog::{DefaultPredicateBuilder, Filter};
use stockline_core::{Sku, SourceCode, StockId};
use stockline_infra::{
    AppConfig, InMemoryInventory, ProductSearch, SaveError, SearchResult, SourceItemsSave,
    StockStatusIndexer,
};
use stockline_inventory::{
    Product, ProductRepository, RepositoryError, Source, SourceItem, SourceItemInput,
    SourceRepository, Stock, StockItem, StockItemRepository, StockRepository,
};
use stockline_sales::{ProductSalabilityEvaluator, SalabilityError};

pub const DEFAULT_SOURCE_CODE: &str = "default";
pub const DEFAULT_SOURCE_NAME: &str = "Default Source";
pub const DEFAULT_STOCK_NAME: &str = "Default Stock";

/// Application services shared by all handlers.
pub struct AppServices {
    pub config: AppConfig,
    inventory: InMemoryInventory,
    indexer: Arc<StockStatusIndexer>,
    source_items_save: SourceItemsSave,
    salability: ProductSalabilityEvaluator,
    search: ProductSearch,
}

/// Wire the in-memory stores and services, seeding the default source and
/// the default stock that links it.
pub fn build_services(config: AppConfig) -> Result<AppServices, RepositoryError> {
    let inventory = InMemoryInventory::new();

    let default_source = SourceCode::parse(DEFAULT_SOURCE_CODE)
        .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;
    inventory
        .sources
        .save(Source::new(default_source.clone(), DEFAULT_SOURCE_NAME))?;
    inventory
        .stocks
        .save(Stock::new(config.default_stock_id, DEFAULT_STOCK_NAME).with_sources([default_source]))?;

    let indexer = Arc::new(StockStatusIndexer::new(
        inventory.repositories(),
        config.stock,
        inventory.stock_status.clone(),
    ));
    let source_items_save = SourceItemsSave::new(inventory.sources.clone(), inventory.source_items.clone())
        .with_indexer(indexer.clone());
    let salability = ProductSalabilityEvaluator::new(inventory.repositories(), config.stock, config.default_stock_id);
    let search = ProductSearch::new(
        Arc::new(DefaultPredicateBuilder::new(config.table_prefix.clone())),
        inventory.products.clone(),
        inventory.stock_status.clone(),
    );

    tracing::info!(
        default_stock_id = %config.default_stock_id,
        table_prefix = %config.table_prefix,
        "inventory services ready"
    );

    Ok(AppServices {
        config,
        inventory,
        indexer,
        source_items_save,
        salability,
        search,
    })
}

impl AppServices {
    pub fn save_source(&self, source: Source) -> Result<(), RepositoryError> {
        self.inventory.sources.save(source)?;
        self.indexer.reindex_all()?;
        Ok(())
    }

    pub fn source_exists(&self, code: &SourceCode) -> bool {
        self.inventory.sources.get(code).is_some()
    }

    pub fn save_stock(&self, stock: Stock) -> Result<(), RepositoryError> {
        self.inventory.stocks.save(stock)?;
        self.indexer.reindex_all()?;
        Ok(())
    }

    pub fn save_product(&self, product: Product) -> Result<(), RepositoryError> {
        let sku = product.sku.clone();
        self.inventory.products.save(product)?;
        self.indexer.reindex_skus(&[sku])?;
        Ok(())
    }

    pub fn product_by_sku(&self, sku: &Sku) -> Option<Product> {
        self.inventory.products.get_by_sku(sku)
    }

    /// Legacy stock item of `product` in `stock_id`; a fresh one (all
    /// use-config flags set) when none was saved yet.
    pub fn stock_item(&self, product: &Product, stock_id: StockId) -> StockItem {
        self.inventory
            .stock_items
            .get(product.product_id, stock_id)
            .unwrap_or_else(|| StockItem::new(product.product_id, stock_id))
    }

    pub fn save_stock_item(&self, sku: &Sku, item: StockItem) -> Result<(), RepositoryError> {
        self.inventory.stock_items.save(item)?;
        self.indexer.reindex_skus(std::slice::from_ref(sku))?;
        Ok(())
    }

    pub fn save_source_items(&self, inputs: &[SourceItemInput]) -> Result<Vec<SourceItem>, SaveError> {
        self.source_items_save.execute(inputs)
    }

    pub fn is_product_salable(&self, sku: &Sku, requested_qty: f64) -> Result<bool, SalabilityError> {
        self.salability.is_salable(sku, requested_qty)
    }

    pub fn search_products(
        &self,
        filter: &Filter,
        website_id: u32,
    ) -> Result<SearchResult, stockline_catalog::ConditionError> {
        self.search.search(filter, website_id)
    }
}
