use axum::Router;

pub mod catalog;
pub mod inventory;
pub mod products;
pub mod system;

/// Router for the versioned REST endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/inventory", inventory::router())
        .nest("/catalog", catalog::router())
        .merge(products::router())
}
