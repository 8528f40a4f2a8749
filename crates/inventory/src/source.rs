use serde::{Deserialize, Serialize};

use stockline_core::{Entity, SourceCode, StockId};

/// A physical or virtual location holding quantity for SKUs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub code: SourceCode,
    pub name: String,
    /// Disabled sources never contribute to salability.
    pub enabled: bool,
    pub country_id: Option<String>,
    pub postcode: Option<String>,
}

impl Source {
    pub fn new(code: SourceCode, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
            enabled: true,
            country_id: None,
            postcode: None,
        }
    }
}

impl Entity for Source {
    type Id = SourceCode;

    fn id(&self) -> Self::Id {
        self.code.clone()
    }
}

/// Assignment of a source to a stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSourceLink {
    pub stock_id: StockId,
    pub source_code: SourceCode,
    /// Lower values are preferred by source selection.
    pub priority: u32,
}

/// Aggregation of sources used to compute salability for a sales channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub stock_id: StockId,
    pub name: String,
    pub links: Vec<StockSourceLink>,
}

impl Stock {
    pub fn new(stock_id: StockId, name: impl Into<String>) -> Self {
        Self {
            stock_id,
            name: name.into(),
            links: Vec::new(),
        }
    }

    /// Assign sources in the given order; priorities follow the position.
    pub fn with_sources(mut self, codes: impl IntoIterator<Item = SourceCode>) -> Self {
        let start = self.links.len() as u32;
        for (offset, source_code) in codes.into_iter().enumerate() {
            self.links.push(StockSourceLink {
                stock_id: self.stock_id,
                source_code,
                priority: start + offset as u32 + 1,
            });
        }
        self
    }

    pub fn is_linked(&self, code: &SourceCode) -> bool {
        self.links.iter().any(|l| &l.source_code == code)
    }

    /// Linked source codes ordered by priority.
    pub fn source_codes(&self) -> Vec<SourceCode> {
        let mut links: Vec<&StockSourceLink> = self.links.iter().collect();
        links.sort_by_key(|l| l.priority);
        links.into_iter().map(|l| l.source_code.clone()).collect()
    }
}

impl Entity for Stock {
    type Id = StockId;

    fn id(&self) -> Self::Id {
        self.stock_id
    }
}
