use serde::{Deserialize, Serialize};

use stockline_core::{Entity, ProductId, Sku};

/// Catalog product as seen by inventory: the SKU to product id mapping plus
/// the websites the product is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub sku: Sku,
    #[serde(default)]
    pub website_ids: Vec<u32>,
}

impl Product {
    pub fn new(product_id: ProductId, sku: Sku) -> Self {
        Self {
            product_id,
            sku,
            website_ids: Vec::new(),
        }
    }

    pub fn in_website(&self, website_id: u32) -> bool {
        self.website_ids.contains(&website_id)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Self::Id {
        self.product_id
    }
}
