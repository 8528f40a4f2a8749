//! In-memory repository implementations (dev/test wiring).

use std::sync::Arc;

use stockline_catalog::{StockStatus, StockStatusLookup};
use stockline_core::{Entity, ProductId, Sku, SourceCode, StockId};
use stockline_inventory::{
    InventoryRepositories, Product, ProductRepository, RepositoryError, ReservationLookup, Source,
    SourceItem, SourceItemRepository, SourceRepository, Stock, StockItem, StockItemRepository,
    StockRepository,
};

use crate::indexer::StockStatusIndex;
use crate::read_model::{InMemoryKeyedStore, KeyedStore};

#[derive(Debug, Default)]
pub struct InMemorySourceRepository {
    store: InMemoryKeyedStore<SourceCode, Source>,
}

impl SourceRepository for InMemorySourceRepository {
    fn get(&self, code: &SourceCode) -> Option<Source> {
        self.store.get(code)
    }

    fn save(&self, source: Source) -> Result<(), RepositoryError> {
        self.store.upsert(source.id(), source)
    }

    fn list(&self) -> Vec<Source> {
        self.store.list()
    }
}

#[derive(Debug, Default)]
pub struct InMemorySourceItemRepository {
    store: InMemoryKeyedStore<(Sku, SourceCode), SourceItem>,
}

impl SourceItemRepository for InMemorySourceItemRepository {
    fn get_by_sku(&self, sku: &Sku) -> Vec<SourceItem> {
        self.store
            .list()
            .into_iter()
            .filter(|item| &item.sku == sku)
            .collect()
    }

    fn save_many(&self, items: Vec<SourceItem>) -> Result<(), RepositoryError> {
        let entries = items
            .into_iter()
            .map(|item| (item.id(), item))
            .collect();
        self.store.upsert_many(entries)
    }

    fn list(&self) -> Vec<SourceItem> {
        self.store.list()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStockRepository {
    store: InMemoryKeyedStore<StockId, Stock>,
}

impl StockRepository for InMemoryStockRepository {
    fn get(&self, stock_id: StockId) -> Option<Stock> {
        self.store.get(&stock_id)
    }

    fn save(&self, stock: Stock) -> Result<(), RepositoryError> {
        self.store.upsert(stock.id(), stock)
    }

    fn list(&self) -> Vec<Stock> {
        self.store.list()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStockItemRepository {
    store: InMemoryKeyedStore<(ProductId, StockId), StockItem>,
}

impl StockItemRepository for InMemoryStockItemRepository {
    fn get(&self, product_id: ProductId, stock_id: StockId) -> Option<StockItem> {
        self.store.get(&(product_id, stock_id))
    }

    fn save(&self, item: StockItem) -> Result<(), RepositoryError> {
        self.store.upsert(item.id(), item)
    }
}

/// Products keyed by id; SKUs are unique across products.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    store: InMemoryKeyedStore<ProductId, Product>,
}

impl ProductRepository for InMemoryProductRepository {
    fn get(&self, product_id: ProductId) -> Option<Product> {
        self.store.get(&product_id)
    }

    fn get_by_sku(&self, sku: &Sku) -> Option<Product> {
        self.store.list().into_iter().find(|p| &p.sku == sku)
    }

    fn save(&self, product: Product) -> Result<(), RepositoryError> {
        let sku = product.sku.clone();
        let product_id = product.product_id;
        self.store.upsert_checked(product.id(), product, &|existing: &Product| {
            (existing.sku == sku && existing.product_id != product_id).then(|| {
                RepositoryError::Conflict(format!(
                    "sku {sku} already belongs to product {}",
                    existing.product_id
                ))
            })
        })
    }

    fn list(&self) -> Vec<Product> {
        self.store.list()
    }
}

/// Reserved quantities per (SKU, stock). Unknown pairs reserve nothing.
#[derive(Debug, Default)]
pub struct InMemoryReservations {
    store: InMemoryKeyedStore<(Sku, StockId), f64>,
}

impl InMemoryReservations {
    /// Add `qty` to the reservation of `sku` in `stock_id` (negative releases).
    pub fn reserve(&self, sku: Sku, stock_id: StockId, qty: f64) -> Result<(), RepositoryError> {
        let key = (sku, stock_id);
        let current = self.store.get(&key).unwrap_or(0.0);
        self.store.upsert(key, current + qty)
    }
}

impl ReservationLookup for InMemoryReservations {
    fn reserved_qty(&self, sku: &Sku, stock_id: StockId) -> f64 {
        self.store
            .get(&(sku.clone(), stock_id))
            .unwrap_or(0.0)
            .max(0.0)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStockStatusIndex {
    store: InMemoryKeyedStore<(ProductId, StockId), StockStatus>,
}

impl StockStatusLookup for InMemoryStockStatusIndex {
    fn get(&self, product_id: ProductId, stock_id: StockId) -> Option<StockStatus> {
        self.store.get(&(product_id, stock_id))
    }

    fn list(&self) -> Vec<StockStatus> {
        self.store.list()
    }
}

impl StockStatusIndex for InMemoryStockStatusIndex {
    fn upsert_many(&self, rows: Vec<StockStatus>) -> Result<(), RepositoryError> {
        let entries = rows
            .into_iter()
            .map(|row| ((row.product_id, row.stock_id), row))
            .collect();
        self.store.upsert_many(entries)
    }

    fn clear(&self) -> Result<(), RepositoryError> {
        self.store.clear()
    }
}

/// Every in-memory repository of one installation, shared through `Arc`s.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventory {
    pub products: Arc<InMemoryProductRepository>,
    pub sources: Arc<InMemorySourceRepository>,
    pub stocks: Arc<InMemoryStockRepository>,
    pub source_items: Arc<InMemorySourceItemRepository>,
    pub stock_items: Arc<InMemoryStockItemRepository>,
    pub reservations: Arc<InMemoryReservations>,
    pub stock_status: Arc<InMemoryStockStatusIndex>,
}

impl InMemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repositories(&self) -> InventoryRepositories {
        InventoryRepositories {
            products: self.products.clone(),
            sources: self.sources.clone(),
            stocks: self.stocks.clone(),
            source_items: self.source_items.clone(),
            stock_items: self.stock_items.clone(),
            reservations: self.reservations.clone(),
        }
    }
}
