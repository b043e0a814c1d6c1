//! Handlers for `/sketch/{project_id}`.

use axum::{
  Json,
  extract::State,
  response::IntoResponse,
};
use borelog_core::{DataUri, model::ProjectDetail, store::LogStore};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
  ApiState, created,
  auth::CurrentUser,
  error::ApiError,
  extract::{ApiPath, JsonBody},
};

#[derive(Debug, Deserialize)]
pub struct SketchBody {
  #[serde(rename = "dataURI", default)]
  pub data_uri: String,
}

async fn project<S: LogStore>(store: &S, id: i64) -> Result<ProjectDetail, ApiError> {
  store
    .get_project(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound("Project"))
}

/// `GET /sketch/{project_id}`
pub async fn get<S: LogStore>(
  State(state): State<ApiState<S>>,
  CurrentUser(_): CurrentUser,
  ApiPath(project_id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
  let detail = project(&*state.store, project_id).await?;
  let body = match &detail.project.sketch {
    Some(name) => json!({ "img": state.sketches.url(name) }),
    None => json!({ "message": "No previous sketches." }),
  };
  Ok(Json(body))
}

/// `POST /sketch/{project_id}`; body `{"dataURI": "data:image/png;base64,..."}`
pub async fn create<S: LogStore>(
  State(state): State<ApiState<S>>,
  CurrentUser(_): CurrentUser,
  ApiPath(project_id): ApiPath<i64>,
  JsonBody(body): JsonBody<SketchBody>,
) -> Result<impl IntoResponse, ApiError> {
  let detail = project(&*state.store, project_id).await?;
  let upload = DataUri::parse(&body.data_uri)?;

  state
    .sketches
    .set_sketch(&*state.store, &detail.project, &upload, Utc::now())
    .await?;
  Ok(created("Sketch added."))
}
