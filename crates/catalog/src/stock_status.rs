use std::sync::Arc;

use serde::{Deserialize, Serialize};

use stockline_core::{ProductId, StockId};

/// Indexed in-stock flag. Stored as `0`/`1` in the `stock_status` column.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatusFlag {
    OutOfStock = 0,
    InStock = 1,
}

impl StockStatusFlag {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_bool(in_stock: bool) -> Self {
        if in_stock { Self::InStock } else { Self::OutOfStock }
    }
}

/// One row of the stock status index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockStatus {
    pub product_id: ProductId,
    pub stock_id: StockId,
    pub status: StockStatusFlag,
    pub qty: f64,
}

/// Read access to the stock status index.
pub trait StockStatusLookup: Send + Sync {
    fn get(&self, product_id: ProductId, stock_id: StockId) -> Option<StockStatus>;
    fn list(&self) -> Vec<StockStatus>;
}

impl<S> StockStatusLookup for Arc<S>
where
    S: StockStatusLookup + ?Sized,
{
    fn get(&self, product_id: ProductId, stock_id: StockId) -> Option<StockStatus> {
        (**self).get(product_id, stock_id)
    }

    fn list(&self) -> Vec<StockStatus> {
        (**self).list()
    }
}

impl StockStatusLookup for [StockStatus] {
    fn get(&self, product_id: ProductId, stock_id: StockId) -> Option<StockStatus> {
        self.iter()
            .find(|s| s.product_id == product_id && s.stock_id == stock_id)
            .cloned()
    }

    fn list(&self) -> Vec<StockStatus> {
        self.to_vec()
    }
}

impl StockStatusLookup for Vec<StockStatus> {
    fn get(&self, product_id: ProductId, stock_id: StockId) -> Option<StockStatus> {
        StockStatusLookup::get(self.as_slice(), product_id, stock_id)
    }

    fn list(&self) -> Vec<StockStatus> {
        self.clone()
    }
}
