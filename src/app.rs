use axum::{
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};

use crate::auth::TokenVerifier;
use crate::catalog::ProductStore;
use crate::config::CatalogConfig;
use crate::handlers::products::{admin, browse};
use crate::middleware::require_admin;

/// Shared per-request context. Everything here is cheaply cloneable; there is
/// no cross-request mutable state outside the database.
#[derive(Clone)]
pub struct AppState {
    pub store: ProductStore,
    pub verifier: TokenVerifier,
    pub catalog: CatalogConfig,
}

/// Build the full route table. Literal segments (`search`, `filter`, `sort`,
/// `categories`, `bulk-update-stock`) take precedence over the `/:id` capture,
/// so they are never misread as ids.
pub fn router(state: AppState) -> Router {
    let mut public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/products", get(browse::list))
        .route("/api/products/search/:keyword", get(browse::search))
        .route("/api/products/category/:category", get(browse::by_category))
        .route("/api/products/filter/active", get(browse::filter_active))
        .route(
            "/api/products/filter/lowstock/:threshold",
            get(browse::filter_low_stock),
        )
        .route("/api/products/filter/price", get(browse::filter_price))
        .route("/api/products/filter/instock", get(browse::filter_in_stock))
        .route(
            "/api/products/filter/outofstock",
            get(browse::filter_out_of_stock),
        )
        .route("/api/products/sort/:field/:order", get(browse::sorted))
        .route("/api/products/categories", get(browse::categories))
        .route("/api/products/:id", get(browse::get_by_id));

    if state.catalog.expired_filter_enabled {
        public = public.route("/api/products/filter/expired", get(browse::filter_expired));
    }

    let gated = Router::new()
        .route("/api/products", post(admin::create))
        .route(
            "/api/products/bulk-update-stock",
            put(admin::bulk_update_stock),
        )
        .route(
            "/api/products/:id",
            put(admin::update).delete(admin::delete),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    public.merge(gated).with_state(state)
}

async fn root() -> axum::Json<Value> {
    axum::Json(json!({
        "success": true,
        "data": {
            "name": "Catalog API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "products": "/api/products (public reads, admin mutations)",
                "search": "/api/products/search/:keyword",
                "filters": "/api/products/filter/*",
                "sort": "/api/products/sort/:field/:order",
                "categories": "/api/products/categories",
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::Json(json!({
                "success": false,
                "message": "database unavailable",
                "data": { "status": "degraded", "timestamp": now, "database_error": e.to_string() }
            })),
        ),
    }
}
