/**
 * Error Conversion
 *
 * This module converts backend errors into HTTP responses and defines the
 * success envelope that pairs with them.
 *
 * # Response Format
 *
 * Errors:
 * ```json
 * { "success": false, "message": "Room not found" }
 * ```
 *
 * Successes (via `ApiResponse`):
 * ```json
 * { "success": true, "data": { ... } }
 * ```
 */

use axum::{
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    /// Convert a backend error into a JSON error response
    ///
    /// Server-side failures are logged with their full detail before the
    /// generic message is returned.
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("[Http] {}", self);
        } else {
            tracing::warn!("[Http] {} {}", status.as_u16(), self);
        }

        let body = serde_json::json!({
            "success": false,
            "message": self.message(),
        });

        (status, Json(body)).into_response()
    }
}

/// Success envelope for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Page metadata for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl Pagination {
    /// `limit` must be positive
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        Self {
            total,
            page,
            limit,
            total_pages: (total + limit - 1) / limit,
        }
    }
}

/// Success envelope for a page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> PagedResponse<T> {
    pub fn new(data: Vec<T>, pagination: Pagination) -> Self {
        Self {
            success: true,
            data,
            pagination,
        }
    }
}

impl<T: Serialize> IntoResponse for PagedResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_error_response_status() {
        let response = BackendError::forbidden("nope").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_api_response_envelope() {
        let value = serde_json::to_value(ApiResponse::new(vec![1, 2])).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"][1], 2);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(Pagination::new(0, 1, 10).total_pages, 0);
        assert_eq!(Pagination::new(10, 1, 10).total_pages, 1);
        assert_eq!(Pagination::new(11, 2, 10).total_pages, 2);
    }

    #[test]
    fn test_paged_envelope() {
        let value = serde_json::to_value(PagedResponse::new(vec!["a"], Pagination::new(1, 1, 10))).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["pagination"]["totalPages"], 1);
    }
}
