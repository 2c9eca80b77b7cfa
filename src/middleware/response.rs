use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// Pagination metadata attached to paginated listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    /// `pages` is `ceil(total / limit)`; callers only construct this when
    /// `limit > 0`.
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        Self {
            page,
            limit,
            total,
            pages: (total + limit - 1) / limit,
        }
    }
}

/// Success envelope wrapper: `{"success": true, "data": ...}` plus the
/// optional `message`, `pagination`, and `count` fields, which are omitted
/// entirely when unset.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    data: T,
    message: Option<String>,
    pagination: Option<Pagination>,
    count: Option<usize>,
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            data,
            message: None,
            pagination: None,
            count: None,
            status: StatusCode::OK,
        }
    }

    /// 201 Created response.
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::success(data)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut body = json!({
            "success": true,
            "data": &self.data,
        });
        if let Some(message) = &self.message {
            body["message"] = json!(message);
        }
        if let Some(pagination) = &self.pagination {
            body["pagination"] = json!(pagination);
        }
        if let Some(count) = self.count {
            body["count"] = json!(count);
        }
        body
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = self.to_json();
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_is_ceiling_of_total_over_limit() {
        assert_eq!(Pagination::new(1, 10, 0).pages, 0);
        assert_eq!(Pagination::new(1, 10, 10).pages, 1);
        assert_eq!(Pagination::new(1, 10, 11).pages, 2);
        assert_eq!(Pagination::new(1, 3, 7).pages, 3);
    }

    #[test]
    fn plain_success_omits_optional_fields() {
        let body = ApiResponse::success(vec![1, 2, 3]).to_json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], json!([1, 2, 3]));
        assert!(body.get("pagination").is_none());
        assert!(body.get("count").is_none());
        assert!(body.get("message").is_none());
    }

    #[test]
    fn pagination_and_count_render_when_set() {
        let body = ApiResponse::success(Vec::<i32>::new())
            .with_pagination(Pagination::new(2, 10, 25))
            .with_count(0)
            .to_json();
        assert_eq!(body["pagination"]["pages"], 3);
        assert_eq!(body["pagination"]["page"], 2);
        assert_eq!(body["count"], 0);
    }

    #[test]
    fn message_renders_when_set() {
        let body = ApiResponse::created(json!({"id": 1}))
            .with_message("Product created!")
            .to_json();
        assert_eq!(body["message"], "Product created!");
    }
}
