//! Infrastructure layer: storage adapters, application services, config.

pub mod catalog_search;
pub mod config;
pub mod indexer;
pub mod read_model;
pub mod repositories;
pub mod source_items_save;


pub use catalog_search::{ProductSearch, SearchResult};
pub use config::{AppConfig, ConfigError};
pub use indexer::StockStatusIndexer;
pub use read_model::{InMemoryKeyedStore, KeyedStore};
pub use repositories::InMemoryInventory;
pub use source_items_save::{SaveError, SourceItemsSave};
