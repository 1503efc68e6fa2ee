pub mod auth;
pub mod fields;
pub mod health;
pub mod resources;
pub mod subjects;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::http::Uri;
use serde::de::DeserializeOwned;

use studypoint_common::errors::AppError;

/// Query-string extractor that renders deserialization failures as the
/// structured validation error body instead of axum's plain-text 400.
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation {
                message: rejection.body_text(),
                field: None,
            })?;
        Ok(Self(value))
    }
}

/// Flattens `validator` output into the 400 error shape.
pub(crate) fn invalid(errors: validator::ValidationErrors) -> AppError {
    AppError::Validation {
        message: errors.to_string(),
        field: None,
    }
}

/// JSON 404 for routes outside the API surface.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound {
        resource_type: "route".to_string(),
        id: uri.path().to_string(),
    }
}
