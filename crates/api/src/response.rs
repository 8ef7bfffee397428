//! Shared response envelope types for API handlers.
//!
//! Successful responses carry a human-readable `message`, plus `data` when
//! there is a payload. Errors use the `{ error, message }` shape produced by
//! [`crate::error::AppError`].

use serde::Serialize;

/// Standard `{ "data": T, "message": "..." }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse::new(todos, "Todos retrieved successfully")))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
    pub message: &'static str,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T, message: &'static str) -> Self {
        Self { data, message }
    }
}

/// `{ "message": "..." }` envelope for responses without a payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
