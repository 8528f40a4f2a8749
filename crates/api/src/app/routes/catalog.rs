use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/products/search", post(search_products))
}

/// Filter the catalog of one website; `website_id` defaults to the default
/// stock's website.
pub async fn search_products(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::SearchRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };
    let website_id = body
        .website_id
        .unwrap_or_else(|| services.config.default_stock_id.get());

    match services.search_products(&body.filter, website_id) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => errors::condition_error_to_response(e),
    }
}
