//! Handlers for `/borehole/{id}`.
//!
//! | Method | Notes |
//! |--------|-------|
//! | `GET`  | One borehole |
//! | `POST` | Create under the body's `projectId`; `id` is ignored |
//! | `PUT`  | Update |

use axum::{Json, extract::State, response::IntoResponse};
use borelog_core::{model::BoreholeFields, record::BoreholeRecord, store::LogStore};
use serde_json::{Map, Value};

use crate::{
  ApiState, created,
  auth::CurrentUser,
  error::ApiError,
  extract::{ApiPath, JsonBody},
};

/// `GET /borehole/{id}`
pub async fn get_one<S: LogStore>(
  State(state): State<ApiState<S>>,
  CurrentUser(_): CurrentUser,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<BoreholeRecord>, ApiError> {
  let borehole = state
    .store
    .get_borehole(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound("Borehole"))?;
  Ok(Json(BoreholeRecord::from(&borehole)))
}

/// Read `projectId`, which clients send either as a number or a string.
fn project_id(body: &Map<String, Value>) -> Result<i64, ApiError> {
  let parsed = match body.get("projectId") {
    Some(Value::Number(n)) => n.as_i64(),
    Some(Value::String(s)) => s.trim().parse().ok(),
    _ => None,
  };
  parsed.ok_or_else(|| ApiError::MalformedRequest("missing or invalid projectId".to_owned()))
}

/// `POST /borehole/{id}`; the caller becomes the logger.
pub async fn create<S: LogStore>(
  State(state): State<ApiState<S>>,
  CurrentUser(user): CurrentUser,
  JsonBody(mut body): JsonBody<Map<String, Value>>,
) -> Result<impl IntoResponse, ApiError> {
  let project_id = project_id(&body)?;
  state
    .store
    .get_project(project_id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound("Project"))?;

  body.remove("projectId");
  let fields = BoreholeFields::from_form(&body)?;
  let borehole = state
    .store
    .create_borehole(user.id, project_id, fields)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(borehole_id = borehole.id, project_id, logger_id = user.id, "borehole created");
  Ok(created("New borehole created."))
}

/// `PUT /borehole/{id}`
pub async fn update<S: LogStore>(
  State(state): State<ApiState<S>>,
  CurrentUser(_): CurrentUser,
  ApiPath(id): ApiPath<i64>,
  JsonBody(body): JsonBody<Map<String, Value>>,
) -> Result<impl IntoResponse, ApiError> {
  state
    .store
    .get_borehole(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound("Borehole"))?;

  let fields = BoreholeFields::from_form(&body)?;
  state
    .store
    .update_borehole(id, fields)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound("Borehole"))?;

  tracing::info!(borehole_id = id, "borehole updated");
  Ok(created("Borehole updated."))
}
