//! Legacy single-stock item configuration.
//!
//! Each product carries one stock item per stock with manage-stock, backorder
//! and min-qty settings. Every setting has a `use_config_*` flag that, when
//! set, makes the global [`StockConfiguration`] value win.

use serde::{Deserialize, Serialize};

use stockline_core::{DomainError, Entity, ProductId, StockId};

/// Whether a product may be sold beyond its available quantity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum BackorderPolicy {
    #[default]
    NoBackorders = 0,
    Allowed = 1,
    AllowedNotifyCustomer = 2,
}

impl BackorderPolicy {
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn allows_backorders(self) -> bool {
        !matches!(self, Self::NoBackorders)
    }
}

impl TryFrom<i64> for BackorderPolicy {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NoBackorders),
            1 => Ok(Self::Allowed),
            2 => Ok(Self::AllowedNotifyCustomer),
            other => Err(DomainError::validation(format!("unknown backorder policy: {other}"))),
        }
    }
}

impl From<BackorderPolicy> for i64 {
    fn from(value: BackorderPolicy) -> Self {
        value.code()
    }
}

/// Global inventory configuration used as fallback by stock items.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockConfiguration {
    pub manage_stock: bool,
    pub backorders: BackorderPolicy,
    pub min_qty: f64,
}

impl Default for StockConfiguration {
    fn default() -> Self {
        Self {
            manage_stock: true,
            backorders: BackorderPolicy::NoBackorders,
            min_qty: 0.0,
        }
    }
}

/// Legacy per-(product, stock) stock item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub product_id: ProductId,
    pub stock_id: StockId,
    pub manage_stock: bool,
    pub use_config_manage_stock: bool,
    pub backorders: BackorderPolicy,
    pub use_config_backorders: bool,
    pub min_qty: f64,
    pub use_config_min_qty: bool,
}

impl StockItem {
    /// A stock item that defers every setting to the global configuration.
    pub fn new(product_id: ProductId, stock_id: StockId) -> Self {
        Self {
            product_id,
            stock_id,
            manage_stock: true,
            use_config_manage_stock: true,
            backorders: BackorderPolicy::NoBackorders,
            use_config_backorders: true,
            min_qty: 0.0,
            use_config_min_qty: true,
        }
    }

    pub fn set_backorders(&mut self, policy: BackorderPolicy) {
        self.backorders = policy;
    }

    pub fn set_use_config_backorders(&mut self, use_config: bool) {
        self.use_config_backorders = use_config;
    }

    pub fn effective_manage_stock(&self, config: &StockConfiguration) -> bool {
        if self.use_config_manage_stock {
            config.manage_stock
        } else {
            self.manage_stock
        }
    }

    pub fn effective_backorders(&self, config: &StockConfiguration) -> BackorderPolicy {
        if self.use_config_backorders {
            config.backorders
        } else {
            self.backorders
        }
    }

    pub fn effective_min_qty(&self, config: &StockConfiguration) -> f64 {
        if self.use_config_min_qty {
            config.min_qty
        } else {
            self.min_qty
        }
    }
}

impl Entity for StockItem {
    type Id = (ProductId, StockId);

    fn id(&self) -> Self::Id {
        (self.product_id, self.stock_id)
    }
}
