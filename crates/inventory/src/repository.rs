//! Storage capabilities consumed by the inventory services.
//!
//! Reads return `Option`/`Vec`; writes return `Result` so a backend can
//! surface availability problems to the caller unchanged.

use std::sync::Arc;

use thiserror::Error;

use stockline_core::{ProductId, Sku, SourceCode, StockId};

use crate::product::Product;
use crate::source::{Source, Stock};
use crate::source_item::SourceItem;
use crate::stock_item::StockItem;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The backing store could not be reached or is in a broken state.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A uniqueness constraint would be broken by the write.
    #[error("conflict: {0}")]
    Conflict(String),
}

pub trait SourceRepository: Send + Sync {
    fn get(&self, code: &SourceCode) -> Option<Source>;
    fn save(&self, source: Source) -> Result<(), RepositoryError>;
    fn list(&self) -> Vec<Source>;
}

pub trait SourceItemRepository: Send + Sync {
    /// All source items of one SKU, across every source.
    fn get_by_sku(&self, sku: &Sku) -> Vec<SourceItem>;
    /// Upsert a batch keyed by `(sku, source_code)`.
    fn save_many(&self, items: Vec<SourceItem>) -> Result<(), RepositoryError>;
    fn list(&self) -> Vec<SourceItem>;
}

pub trait StockRepository: Send + Sync {
    fn get(&self, stock_id: StockId) -> Option<Stock>;
    fn save(&self, stock: Stock) -> Result<(), RepositoryError>;
    fn list(&self) -> Vec<Stock>;
}

pub trait StockItemRepository: Send + Sync {
    fn get(&self, product_id: ProductId, stock_id: StockId) -> Option<StockItem>;
    fn save(&self, item: StockItem) -> Result<(), RepositoryError>;
}

pub trait ProductRepository: Send + Sync {
    fn get(&self, product_id: ProductId) -> Option<Product>;
    fn get_by_sku(&self, sku: &Sku) -> Option<Product>;
    fn save(&self, product: Product) -> Result<(), RepositoryError>;
    fn list(&self) -> Vec<Product>;
}

/// Quantity held for pending orders, per SKU and stock.
pub trait ReservationLookup: Send + Sync {
    fn reserved_qty(&self, sku: &Sku, stock_id: StockId) -> f64;
}

macro_rules! forward_arc {
    ($tr:ident { $(fn $name:ident(&self $(, $arg:ident: $ty:ty)*) -> $ret:ty;)* }) => {
        impl<S> $tr for Arc<S>
        where
            S: $tr + ?Sized,
        {
            $(
                fn $name(&self $(, $arg: $ty)*) -> $ret {
                    (**self).$name($($arg),*)
                }
            )*
        }
    };
}

forward_arc!(SourceRepository {
    fn get(&self, code: &SourceCode) -> Option<Source>;
    fn save(&self, source: Source) -> Result<(), RepositoryError>;
    fn list(&self) -> Vec<Source>;
});

forward_arc!(SourceItemRepository {
    fn get_by_sku(&self, sku: &Sku) -> Vec<SourceItem>;
    fn save_many(&self, items: Vec<SourceItem>) -> Result<(), RepositoryError>;
    fn list(&self) -> Vec<SourceItem>;
});

forward_arc!(StockRepository {
    fn get(&self, stock_id: StockId) -> Option<Stock>;
    fn save(&self, stock: Stock) -> Result<(), RepositoryError>;
    fn list(&self) -> Vec<Stock>;
});

forward_arc!(StockItemRepository {
    fn get(&self, product_id: ProductId, stock_id: StockId) -> Option<StockItem>;
    fn save(&self, item: StockItem) -> Result<(), RepositoryError>;
});

forward_arc!(ProductRepository {
    fn get(&self, product_id: ProductId) -> Option<Product>;
    fn get_by_sku(&self, sku: &Sku) -> Option<Product>;
    fn save(&self, product: Product) -> Result<(), RepositoryError>;
    fn list(&self) -> Vec<Product>;
});

forward_arc!(ReservationLookup {
    fn reserved_qty(&self, sku: &Sku, stock_id: StockId) -> f64;
});

/// The repositories an inventory read path needs, bundled for injection.
#[derive(Clone)]
pub struct InventoryRepositories {
    pub products: Arc<dyn ProductRepository>,
    pub sources: Arc<dyn SourceRepository>,
    pub stocks: Arc<dyn StockRepository>,
    pub source_items: Arc<dyn SourceItemRepository>,
    pub stock_items: Arc<dyn StockItemRepository>,
    pub reservations: Arc<dyn ReservationLookup>,
}
