use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
    Json, Router,
};

use stockline_core::{ProductId, Sku, StockId};
use stockline_inventory::Product;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/products", post(create_product))
        .route("/stockItems/:sku", put(update_stock_item))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateProductRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };
    let sku = match Sku::parse(&body.sku) {
        Ok(s) => s,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_sku", e.to_string()),
    };

    let mut product = Product::new(ProductId::new(body.product_id), sku);
    product.website_ids = body.website_ids;

    if let Err(e) = services.save_product(product.clone()) {
        return errors::repository_error_to_response(e);
    }
    tracing::info!(sku = %product.sku, product_id = %product.product_id, "product saved");

    (StatusCode::CREATED, Json(product)).into_response()
}

pub async fn update_stock_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(sku): Path<String>,
    body: Result<Json<dto::UpdateStockItemRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };
    let sku = match Sku::parse(&sku) {
        Ok(s) => s,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_sku", e.to_string()),
    };
    let Some(product) = services.product_by_sku(&sku) else {
        return errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("product with SKU \"{sku}\" does not exist"),
        );
    };

    let patch = body.stock_item;
    let stock_id = patch
        .stock_id
        .map(StockId::new)
        .unwrap_or(services.config.default_stock_id);

    let mut item = services.stock_item(&product, stock_id);
    if let Some(v) = patch.manage_stock {
        item.manage_stock = v;
    }
    if let Some(v) = patch.use_config_manage_stock {
        item.use_config_manage_stock = v;
    }
    if let Some(v) = patch.backorders {
        item.set_backorders(v);
    }
    if let Some(v) = patch.use_config_backorders {
        item.set_use_config_backorders(v);
    }
    if let Some(v) = patch.min_qty {
        item.min_qty = v;
    }
    if let Some(v) = patch.use_config_min_qty {
        item.use_config_min_qty = v;
    }

    if let Err(e) = services.save_stock_item(&sku, item.clone()) {
        return errors::repository_error_to_response(e);
    }
    tracing::info!(sku = %sku, stock_id = %stock_id, "legacy stock item saved");

    (StatusCode::OK, Json(item)).into_response()
}
