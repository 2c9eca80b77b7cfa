//! Request-shaping behavior that resolves before storage: input validation on
//! admitted admin requests and fail-closed id handling on the public surface.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn malformed_id_fails_closed_as_not_found() {
    let res = common::test_router()
        .oneshot(common::empty_request(
            "GET",
            "/api/products/not-a-uuid",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = common::read_json(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn literal_route_segments_are_not_read_as_ids() {
    // `categories` must hit the facet route, not the id route; with a lazy
    // pool the facet query fails as a masked 500 rather than the id route's
    // fail-closed 404.
    let res = common::test_router()
        .oneshot(common::empty_request("GET", "/api/products/categories", None))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn create_missing_unit_price_is_rejected_not_defaulted() {
    let res = common::test_router()
        .oneshot(common::json_request(
            "POST",
            "/api/products",
            Some(&common::bearer("admin")),
            json!({ "name": "Widget" }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = common::read_json(res).await;
    assert_eq!(body["message"], "Missing required field: unitPrice");
}

#[tokio::test]
async fn create_missing_name_is_rejected() {
    let res = common::test_router()
        .oneshot(common::json_request(
            "POST",
            "/api/products",
            Some(&common::bearer("admin")),
            json!({ "unitPrice": 9.99 }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = common::read_json(res).await;
    assert_eq!(body["message"], "Missing required field: name");
}

#[tokio::test]
async fn update_with_malformed_id_is_not_found() {
    let res = common::test_router()
        .oneshot(common::json_request(
            "PUT",
            "/api/products/definitely-not-a-uuid",
            Some(&common::bearer("admin")),
            json!({ "name": "Widget", "unitPrice": 2.0 }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = common::read_json(res).await;
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn bulk_update_rejects_negative_quantity() {
    let res = common::test_router()
        .oneshot(common::json_request(
            "PUT",
            "/api/products/bulk-update-stock",
            Some(&common::bearer("admin")),
            json!({ "updates": [{ "id": "0a0a0a0a-0a0a-0a0a-0a0a-0a0a0a0a0a0a", "quantity": -3 }] }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = common::read_json(res).await;
    assert_eq!(body["message"], "Field quantity must not be negative");
}

#[tokio::test]
async fn bulk_update_malformed_id_fails_the_whole_batch() {
    // The batch contract is all-or-nothing at the response level: one bad id
    // fails the response even though sibling updates run independently.
    let res = common::test_router()
        .oneshot(common::json_request(
            "PUT",
            "/api/products/bulk-update-stock",
            Some(&common::bearer("admin")),
            json!({ "updates": [{ "id": "nope", "quantity": 5 }] }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = common::read_json(res).await;
    assert_eq!(body["success"], false);
}
