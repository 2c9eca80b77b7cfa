//! Access-gate behavior: mutating routes demand a verified admin token and
//! fail with the contract's status codes and messages before any storage
//! access happens.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn create_without_token_is_forbidden() {
    let res = common::test_router()
        .oneshot(common::json_request(
            "POST",
            "/api/products",
            None,
            json!({ "name": "Widget", "unitPrice": 1.0 }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body = common::read_json(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No token provided");
}

#[tokio::test]
async fn create_with_non_admin_role_is_forbidden() {
    let res = common::test_router()
        .oneshot(common::json_request(
            "POST",
            "/api/products",
            Some(&common::bearer("user")),
            json!({ "name": "Widget", "unitPrice": 1.0 }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body = common::read_json(res).await;
    assert_eq!(body["message"], "Access denied. Admin only.");
}

#[tokio::test]
async fn create_with_garbage_token_is_unauthorized() {
    let res = common::test_router()
        .oneshot(common::json_request(
            "POST",
            "/api/products",
            Some("Bearer not.a.jwt"),
            json!({ "name": "Widget", "unitPrice": 1.0 }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = common::read_json(res).await;
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn header_without_token_segment_is_forbidden() {
    let res = common::test_router()
        .oneshot(common::json_request(
            "POST",
            "/api/products",
            Some("Bearer"),
            json!({ "name": "Widget", "unitPrice": 1.0 }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body = common::read_json(res).await;
    assert_eq!(body["message"], "No token provided");
}

#[tokio::test]
async fn delete_is_gated_too() {
    let res = common::test_router()
        .oneshot(common::empty_request(
            "DELETE",
            "/api/products/0a0a0a0a-0a0a-0a0a-0a0a-0a0a0a0a0a0a",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn bulk_update_is_gated_too() {
    let res = common::test_router()
        .oneshot(common::json_request(
            "PUT",
            "/api/products/bulk-update-stock",
            Some(&common::bearer("user")),
            json!({ "updates": [] }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn public_routes_bypass_the_gate() {
    // The banner route answers without any Authorization header.
    let res = common::test_router()
        .oneshot(common::empty_request("GET", "/", None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = common::read_json(res).await;
    assert_eq!(body["success"], true);
}
