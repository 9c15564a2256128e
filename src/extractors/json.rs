//! JSON body extractor whose rejection is an `AppError`, so malformed bodies get the standard error envelope.

use super::rejection_to_error;
use crate::error::AppError;
use async_trait::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone)]
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(rejection_to_error(rejection.status(), rejection.body_text())),
        }
    }
}
