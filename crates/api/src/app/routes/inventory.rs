use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use stockline_core::{Sku, SourceCode, StockId};
use stockline_inventory::{Source, Stock};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/sources", post(create_source))
        .route("/stocks", post(create_stock))
        .route("/source-items", post(save_source_items))
        .route("/is-product-salable/:sku/:qty", get(is_product_salable))
}

pub async fn create_source(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateSourceRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };
    let code = match SourceCode::parse(&body.code) {
        Ok(c) => c,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_source_code", e.to_string()),
    };

    let mut source = Source::new(code.clone(), body.name);
    source.enabled = body.enabled;
    source.country_id = body.country_id;
    source.postcode = body.postcode;

    if let Err(e) = services.save_source(source.clone()) {
        return errors::repository_error_to_response(e);
    }
    tracing::info!(source_code = %code, enabled = source.enabled, "source saved");

    (StatusCode::CREATED, Json(source)).into_response()
}

pub async fn create_stock(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateStockRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };
    let mut codes = Vec::with_capacity(body.source_codes.len());
    for raw in &body.source_codes {
        let code = match SourceCode::parse(raw) {
            Ok(c) => c,
            Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_source_code", e.to_string()),
        };
        if !services.source_exists(&code) {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "unknown_source",
                format!("source {code} does not exist"),
            );
        }
        codes.push(code);
    }

    let stock = Stock::new(StockId::new(body.stock_id), body.name).with_sources(codes);
    if let Err(e) = services.save_stock(stock.clone()) {
        return errors::repository_error_to_response(e);
    }
    tracing::info!(stock_id = %stock.stock_id, sources = stock.links.len(), "stock saved");

    (StatusCode::CREATED, Json(stock)).into_response()
}

pub async fn save_source_items(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::SaveSourceItemsRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };
    let inputs = match dto::decode_source_items(&body.source_items) {
        Ok(v) => v,
        Err(e) => return errors::transport_error_to_response(e),
    };

    match services.save_source_items(&inputs) {
        Ok(saved) => (StatusCode::OK, Json(saved)).into_response(),
        Err(e) => errors::save_error_to_response(e),
    }
}

pub async fn is_product_salable(
    Extension(services): Extension<Arc<AppServices>>,
    Path((sku, qty)): Path<(String, String)>,
) -> axum::response::Response {
    let sku = match Sku::parse(&sku) {
        Ok(s) => s,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_sku", e.to_string()),
    };
    let requested_qty = match qty.trim().parse::<f64>() {
        Ok(q) if q.is_finite() && q > 0.0 => q,
        _ => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_qty",
                format!("requested quantity must be a positive number, got {qty:?}"),
            );
        }
    };

    match services.is_product_salable(&sku, requested_qty) {
        Ok(salable) => Json(dto::SalableResponse {
            sku,
            requested_qty,
            salable,
        })
        .into_response(),
        Err(e) => errors::salability_error_to_response(e),
    }
}
