//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{FormRejection, PathRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use borelog_core::{DataUriError, ValidationError};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
///
/// The `Display` text of each variant is what the client sees in
/// `{"error": ...}`, except for the 500 variants whose detail is only logged.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("User not logged in.")]
  Unauthenticated,

  /// The argument names the entity, e.g. `"Project"`.
  #[error("{0} could not be found.")]
  NotFound(&'static str),

  #[error("Invalid inputs.")]
  Validation(#[from] ValidationError),

  #[error("Request not valid.")]
  MalformedRequest(String),

  #[error("Sketch data not valid.")]
  MalformedDataUri(#[from] DataUriError),

  #[error("Invalid username and/or password.")]
  InvalidCredentials,

  #[error("Passwords must match.")]
  PasswordMismatch,

  #[error("Username already taken.")]
  UsernameTaken,

  #[error("password hashing failed: {0}")]
  Hashing(String),

  #[error("sketch storage error: {0}")]
  Sketch(#[from] std::io::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a backend error; usable directly in `map_err`.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self { Self::MalformedRequest(rejection.body_text()) }
}

impl From<FormRejection> for ApiError {
  fn from(rejection: FormRejection) -> Self { Self::MalformedRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Hashing(_) | ApiError::Sketch(_) | ApiError::Store(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
      _ => StatusCode::BAD_REQUEST,
    };

    let message = match &self {
      ApiError::Validation(e) => {
        tracing::debug!(error = %e, "rejected form input");
        self.to_string()
      }
      ApiError::MalformedRequest(detail) => {
        tracing::debug!(%detail, "malformed request");
        self.to_string()
      }
      ApiError::MalformedDataUri(e) => {
        tracing::debug!(error = %e, "malformed sketch upload");
        self.to_string()
      }
      ApiError::Hashing(_) | ApiError::Sketch(_) | ApiError::Store(_) => {
        tracing::error!(error = %self, "request failed");
        "Internal server error.".to_owned()
      }
      _ => self.to_string(),
    };

    (status, Json(json!({ "error": message }))).into_response()
  }
}
