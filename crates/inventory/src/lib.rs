//! Inventory domain module (multi-source inventory).
//!
//! This crate contains the inventory data model and its business rules,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage). Storage is reached through the traits in [`repository`].

pub mod geo;
pub mod product;
pub mod repository;
pub mod source;
pub mod source_item;
pub mod stock_item;
pub mod validation;

pub use geo::{Address, GeoError, GetLatsLngsFromAddress, LatLng, OfflineGeocoder};
pub use product::Product;
pub use repository::{
    InventoryRepositories, ProductRepository, RepositoryError, ReservationLookup, SourceItemRepository, SourceRepository,
    StockItemRepository, StockRepository,
};
pub use source::{Source, Stock, StockSourceLink};
pub use source_item::{SourceItem, SourceItemInput, SourceItemStatus};
pub use stock_item::{BackorderPolicy, StockConfiguration, StockItem};
pub use validation::{
    SourceItemValidator, SourceItemValidatorChain, ValidationError, ValidationResult,
};
