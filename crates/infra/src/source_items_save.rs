//! Bulk save of source items.
//!
//! The whole batch is validated before anything is written; one bad item
//! rejects the batch.

use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;

use stockline_core::{Sku, SourceCode};
use stockline_inventory::{
    RepositoryError, SourceItem, SourceItemInput, SourceItemRepository, SourceItemValidatorChain,
    SourceRepository, ValidationResult,
};

use crate::indexer::StockStatusIndexer;

pub const INPUT_EMPTY_MESSAGE: &str = "Input data is empty";
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation Failed";
pub const COULD_NOT_SAVE_MESSAGE: &str = "Could not save Source Item";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SaveError {
    #[error("Input data is empty")]
    InputEmpty,

    /// Field-scoped errors of every failing item.
    #[error("Validation Failed")]
    Validation(ValidationResult),

    /// Not a field error: unknown source or a storage failure. The reason is
    /// for logs only.
    #[error("Could not save Source Item")]
    CouldNotSave { reason: String },

    /// Items were written but the stock status index was not refreshed for
    /// them; a later reindex repairs it.
    #[error("Source items saved but stock status reindex failed: {reason}")]
    IndexOutdated { reason: String },
}

impl From<RepositoryError> for SaveError {
    fn from(err: RepositoryError) -> Self {
        SaveError::CouldNotSave {
            reason: err.to_string(),
        }
    }
}

pub struct SourceItemsSave {
    validator: SourceItemValidatorChain,
    sources: Arc<dyn SourceRepository>,
    source_items: Arc<dyn SourceItemRepository>,
    indexer: Option<Arc<StockStatusIndexer>>,
}

impl SourceItemsSave {
    pub fn new(sources: Arc<dyn SourceRepository>, source_items: Arc<dyn SourceItemRepository>) -> Self {
        Self {
            validator: SourceItemValidatorChain::default(),
            sources,
            source_items,
            indexer: None,
        }
    }

    /// Reindex stock status for the saved SKUs after each successful save.
    pub fn with_indexer(mut self, indexer: Arc<StockStatusIndexer>) -> Self {
        self.indexer = Some(indexer);
        self
    }

    pub fn execute(&self, inputs: &[SourceItemInput]) -> Result<Vec<SourceItem>, SaveError> {
        if inputs.is_empty() {
            return Err(SaveError::InputEmpty);
        }

        let mut errors = ValidationResult::new();
        let mut items = Vec::with_capacity(inputs.len());
        for input in inputs {
            match self.validator.check(input) {
                Ok(item) => items.push(item),
                Err(result) => errors.merge(result),
            }
        }
        if !errors.is_valid() {
            tracing::info!(errors = %errors, "source items rejected by validation");
            return Err(SaveError::Validation(errors));
        }

        let codes: BTreeSet<&SourceCode> = items.iter().map(|i| &i.source_code).collect();
        if let Some(missing) = codes.into_iter().find(|code| self.sources.get(code).is_none()) {
            tracing::warn!(source_code = %missing, "source item references unknown source");
            return Err(SaveError::CouldNotSave {
                reason: format!("source {missing} does not exist"),
            });
        }

        self.source_items.save_many(items.clone())?;
        tracing::info!(count = items.len(), "source items saved");

        if let Some(indexer) = &self.indexer {
            let skus: Vec<Sku> = items
                .iter()
                .map(|i| i.sku.clone())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            if let Err(e) = indexer.reindex_skus(&skus) {
                tracing::warn!(count = skus.len(), "stock status reindex after save failed: {e}");
                return Err(SaveError::IndexOutdated { reason: e.to_string() });
            }
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use stockline_catalog::{StockStatus, StockStatusLookup};
    use stockline_core::{ProductId, StockId};
    use stockline_inventory::{
        Product, ProductRepository, RepositoryError, Source, SourceItemStatus, Stock, StockConfiguration,
        StockRepository,
    };

    use super::*;
    use crate::indexer::StockStatusIndex;
    use crate::repositories::InMemoryInventory;

    /// Stock status index whose writes always fail.
    struct UnwritableIndex;

    impl StockStatusLookup for UnwritableIndex {
        fn get(&self, _product_id: ProductId, _stock_id: StockId) -> Option<StockStatus> {
            None
        }

        fn list(&self) -> Vec<StockStatus> {
            Vec::new()
        }
    }

    impl StockStatusIndex for UnwritableIndex {
        fn upsert_many(&self, _rows: Vec<StockStatus>) -> Result<(), RepositoryError> {
            Err(RepositoryError::Unavailable("index offline".to_string()))
        }

        fn clear(&self) -> Result<(), RepositoryError> {
            Err(RepositoryError::Unavailable("index offline".to_string()))
        }
    }

    fn setup() -> (InMemoryInventory, SourceItemsSave) {
        let inv = InMemoryInventory::new();
        inv.sources
            .save(Source::new(SourceCode::parse("eu-1").unwrap(), "EU 1"))
            .unwrap();
        let save = SourceItemsSave::new(inv.sources.clone(), inv.source_items.clone());
        (inv, save)
    }

    fn valid() -> SourceItemInput {
        SourceItemInput::new("SKU-1", "eu-1", 1.5, SourceItemStatus::InStock)
    }

    #[test]
    fn valid_batch_is_saved() {
        let (inv, save) = setup();
        let saved = save.execute(&[valid()]).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(inv.source_items.list(), saved);
    }

    #[test]
    fn empty_batch_is_rejected() {
        let (_inv, save) = setup();
        let err = save.execute(&[]).unwrap_err();
        assert_eq!(err, SaveError::InputEmpty);
        assert_eq!(err.to_string(), INPUT_EMPTY_MESSAGE);
    }

    #[test]
    fn missing_sku_is_a_field_error() {
        let (inv, save) = setup();
        let mut input = valid();
        input.sku = None;

        match save.execute(&[input]).unwrap_err() {
            SaveError::Validation(result) => {
                assert_eq!(result.errors().len(), 1);
                assert_eq!(result.errors()[0].field, "sku");
                assert_eq!(result.errors()[0].message, "\"%field\" can not be empty.");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(inv.source_items.list().is_empty());
    }

    #[test]
    fn unknown_source_is_a_generic_failure() {
        let (inv, save) = setup();
        let mut input = valid();
        input.source_code = Some("eu-12".to_string());

        let err = save.execute(&[input]).unwrap_err();
        assert!(matches!(err, SaveError::CouldNotSave { .. }));
        assert_eq!(err.to_string(), COULD_NOT_SAVE_MESSAGE);
        assert!(inv.source_items.list().is_empty());
    }

    #[test]
    fn one_invalid_item_rejects_the_whole_batch() {
        let (inv, save) = setup();
        let mut bad = valid();
        bad.status = Some(7);
        let mut other = valid();
        other.sku = Some("SKU-2".to_string());

        assert!(matches!(
            save.execute(&[other, bad]).unwrap_err(),
            SaveError::Validation(_)
        ));
        assert!(inv.source_items.list().is_empty());
    }

    #[test]
    fn failed_reindex_is_reported_after_items_are_written() {
        let (inv, _) = setup();
        inv.products
            .save(Product::new(ProductId::new(1), Sku::parse("SKU-1").unwrap()))
            .unwrap();
        inv.stocks
            .save(Stock::new(StockId::DEFAULT, "Default").with_sources([SourceCode::parse("eu-1").unwrap()]))
            .unwrap();
        let indexer = Arc::new(StockStatusIndexer::new(
            inv.repositories(),
            StockConfiguration::default(),
            Arc::new(UnwritableIndex),
        ));
        let save = SourceItemsSave::new(inv.sources.clone(), inv.source_items.clone()).with_indexer(indexer);

        let err = save.execute(&[valid()]).unwrap_err();

        assert!(matches!(err, SaveError::IndexOutdated { .. }));
        assert!(err.to_string().contains("index offline"));
        assert_eq!(inv.source_items.list().len(), 1);
    }
}
