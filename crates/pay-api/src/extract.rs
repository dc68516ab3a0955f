//! # Extractors

use crate::error::ApiError;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use tracing::debug;

/// JSON request body that rejects anything undecodable with a 400.
///
/// Unlike `axum::Json` this does not insist on a `Content-Type` header and
/// never answers 415 or 422.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::new(rejection.status(), rejection.body_text()))?;

        serde_json::from_slice(&bytes).map(JsonBody).map_err(|e| {
            debug!("rejecting request body: {}", e);
            ApiError::bad_request("Invalid JSON")
        })
    }
}
