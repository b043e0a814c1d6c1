//! JSON API and session pages for borelog.
//!
//! Exposes an axum [`Router`] backed by any [`LogStore`]. Static assets,
//! stored media and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = borelog_api::api_router(state).merge(static_routes);
//! ```

pub mod auth;
pub mod boreholes;
pub mod error;
pub mod extract;
pub mod geology;
pub mod media;
pub mod messages;
pub mod profiles;
pub mod projects;
pub mod session;
pub mod sketches;

use std::sync::Arc;

use axum::{
  Json, Router,
  http::StatusCode,
  routing::get,
};
use borelog_core::store::LogStore;
use serde_json::{Value, json};

pub use auth::SessionConfig;
pub use error::ApiError;
pub use media::SketchManager;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:    Arc<S>,
  pub sketches: Arc<SketchManager>,
  pub sessions: SessionConfig,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      sketches: Arc::clone(&self.sketches),
      sessions: self.sessions.clone(),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the API router.
///
/// In every `{id}` segment below, `0` addresses the whole collection.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: LogStore + 'static,
{
  Router::new()
    // Session pages
    .route("/", get(session::index::<S>))
    .route("/login", get(session::login_page).post(session::login::<S>))
    .route("/register", get(session::register_page).post(session::register::<S>))
    .route("/logout", get(session::logout::<S>))
    // Records
    .route(
      "/projects/{id}/{page}",
      get(projects::get::<S>)
        .post(projects::create::<S>)
        .put(projects::update::<S>),
    )
    .route("/profile/{user_id}", get(profiles::get::<S>))
    .route(
      "/borehole/{id}",
      get(boreholes::get_one::<S>)
        .post(boreholes::create::<S>)
        .put(boreholes::update::<S>),
    )
    .route(
      "/geology/{borehole_id}/{strata_id}",
      get(geology::get::<S>)
        .post(geology::create::<S>)
        .put(geology::update::<S>),
    )
    .route("/sketch/{project_id}", get(sketches::get::<S>).post(sketches::create::<S>))
    .route("/message/{project_id}/{page}", get(messages::list_page::<S>).post(messages::create::<S>))
    .method_not_allowed_fallback(request_not_valid)
    .with_state(state)
}

async fn request_not_valid() -> ApiError {
  ApiError::MalformedRequest("method not allowed".to_owned())
}

/// `201 {"message": ...}` for successful writes.
pub(crate) fn created(message: &'static str) -> (StatusCode, Json<Value>) {
  (StatusCode::CREATED, Json(json!({ "message": message })))
}

#[cfg(test)]
mod tests;
