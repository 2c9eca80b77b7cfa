//! Public read handlers. None of these pass through the admin gate; an empty
//! result set is a success with empty `data`, never an error.

use axum::extract::{Path, Query, State};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::catalog::{PageSpec, Product, ProductQuery};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, Pagination};

/// Pagination parameters arrive as raw strings so that malformed numbers fall
/// back to defaults instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PriceParams {
    pub min: Option<String>,
    pub max: Option<String>,
}

/// GET /api/products - list with optional pagination
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<ApiResponse<Vec<Product>>, ApiError> {
    let page = PageSpec::from_params(params.page.as_deref(), params.limit.as_deref());
    let query = ProductQuery::list(&state.catalog, page);

    let products = state.store.select(&query).await?;
    let mut response = ApiResponse::success(products);

    if page.is_paginated() {
        let total = state.store.count(&query).await?;
        response = response.with_pagination(Pagination::new(page.page, page.limit, total));
    }
    Ok(response)
}

/// GET /api/products/search/:keyword - case-insensitive substring search
pub async fn search(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
) -> Result<ApiResponse<Vec<Product>>, ApiError> {
    let query = ProductQuery::search(&state.catalog, &keyword);
    Ok(ApiResponse::success(state.store.select(&query).await?))
}

/// GET /api/products/category/:category - substring category match
pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<ApiResponse<Vec<Product>>, ApiError> {
    let query = ProductQuery::by_category(&state.catalog, &category);
    Ok(ApiResponse::success(state.store.select(&query).await?))
}

/// GET /api/products/filter/active
pub async fn filter_active(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Product>>, ApiError> {
    let query = ProductQuery::active();
    Ok(ApiResponse::success(state.store.select(&query).await?))
}

/// GET /api/products/filter/lowstock/:threshold - low stock alert
pub async fn filter_low_stock(
    State(state): State<AppState>,
    Path(threshold): Path<String>,
) -> Result<ApiResponse<Vec<Product>>, ApiError> {
    let query = ProductQuery::low_stock(&threshold);
    let products = state.store.select(&query).await?;
    let count = products.len();
    Ok(ApiResponse::success(products).with_count(count))
}

/// GET /api/products/filter/expired - rows whose expiry has passed
pub async fn filter_expired(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Product>>, ApiError> {
    let query = ProductQuery::expired(Utc::now());
    Ok(ApiResponse::success(state.store.select(&query).await?))
}

/// GET /api/products/filter/price?min&max - inclusive price range
pub async fn filter_price(
    State(state): State<AppState>,
    Query(params): Query<PriceParams>,
) -> Result<ApiResponse<Vec<Product>>, ApiError> {
    let query =
        ProductQuery::price_range(&state.catalog, params.min.as_deref(), params.max.as_deref());
    Ok(ApiResponse::success(state.store.select(&query).await?))
}

/// GET /api/products/filter/instock
pub async fn filter_in_stock(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Product>>, ApiError> {
    let query = ProductQuery::in_stock(&state.catalog);
    Ok(ApiResponse::success(state.store.select(&query).await?))
}

/// GET /api/products/filter/outofstock
pub async fn filter_out_of_stock(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Product>>, ApiError> {
    let query = ProductQuery::out_of_stock(&state.catalog);
    Ok(ApiResponse::success(state.store.select(&query).await?))
}

/// GET /api/products/sort/:field/:order - sorted listing
pub async fn sorted(
    State(state): State<AppState>,
    Path((field, order)): Path<(String, String)>,
) -> Result<ApiResponse<Vec<Product>>, ApiError> {
    let query = ProductQuery::sorted(&state.catalog, &field, &order);
    Ok(ApiResponse::success(state.store.select(&query).await?))
}

/// GET /api/products/categories - distinct non-empty category values
pub async fn categories(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<String>>, ApiError> {
    let values = state
        .store
        .distinct_categories(state.catalog.filter_inactive)
        .await?;
    Ok(ApiResponse::success(values))
}

/// GET /api/products/:id - show a single record. A malformed id fails closed
/// as not-found rather than a server error.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Product>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::not_found("Product not found"))?;
    let product = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;
    Ok(ApiResponse::success(product))
}
