//! Request extractors whose rejections render as [`ApiError`].

use axum::{
  body::Bytes,
  extract::{FromRequest, FromRequestParts, Request},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// [`axum::extract::Path`] with rejections mapped to `Request not valid.`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// [`axum::Form`] with rejections mapped to `Request not valid.`.
#[derive(FromRequest)]
#[from_request(via(axum::Form), rejection(ApiError))]
pub struct ApiForm<T>(pub T);

/// A JSON request body.
///
/// Unlike [`axum::Json`] this does not require a `Content-Type` header: the
/// browser client posts bare `JSON.stringify` bodies.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
  S: Send + Sync,
  T: DeserializeOwned,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let body = Bytes::from_request(req, state)
      .await
      .map_err(|e| ApiError::MalformedRequest(e.body_text()))?;
    serde_json::from_slice(&body)
      .map(JsonBody)
      .map_err(|e| ApiError::MalformedRequest(e.to_string()))
  }
}

/// An id path segment where `0` selects the whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
  All,
  One(i64),
}

impl From<i64> for Selector {
  fn from(id: i64) -> Self {
    match id {
      0 => Selector::All,
      id => Selector::One(id),
    }
  }
}
