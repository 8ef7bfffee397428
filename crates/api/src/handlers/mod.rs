pub mod todos;

use axum::http::Uri;

use crate::error::AppError;

/// Fallback for unmatched routes, so unknown paths also get the JSON
/// error envelope.
pub async fn route_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
