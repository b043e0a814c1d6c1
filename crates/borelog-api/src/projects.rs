//! Handlers for `/projects/{id}/{page}`.
//!
//! | Method | `id` | Notes |
//! |--------|------|-------|
//! | `GET`  | `0`  | All projects, newest first, paginated |
//! | `GET`  | `n`  | One project with its boreholes, oldest first, paginated |
//! | `POST` | any  | Create; `id` is ignored |
//! | `PUT`  | `n`  | Update |

use axum::{
  Json,
  extract::State,
  response::{IntoResponse, Response},
};
use borelog_core::{
  model::ProjectFields,
  paginate::{PAGE_SIZE, PageMeta, paginate},
  record::{BoreholeRecord, ProjectRecord},
  store::LogStore,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
  ApiState, created,
  auth::CurrentUser,
  error::ApiError,
  extract::{ApiPath, JsonBody, Selector},
};

#[derive(Debug, Serialize)]
pub struct ProjectList {
  pub projects: Vec<ProjectRecord>,
  #[serde(flatten)]
  pub page:     PageMeta,
}

#[derive(Debug, Serialize)]
pub struct ProjectView {
  pub project:   ProjectRecord,
  pub boreholes: Vec<BoreholeRecord>,
  #[serde(flatten)]
  pub page:      PageMeta,
}

// ─── Get ─────────────────────────────────────────────────────────────────────

/// `GET /projects/{id}/{page}`
pub async fn get<S: LogStore>(
  State(state): State<ApiState<S>>,
  CurrentUser(_): CurrentUser,
  ApiPath((id, page)): ApiPath<(i64, usize)>,
) -> Result<Response, ApiError> {
  match Selector::from(id) {
    Selector::All => Ok(Json(list_page(&*state.store, page).await?).into_response()),
    Selector::One(id) => Ok(Json(get_one(&*state.store, id, page).await?).into_response()),
  }
}

pub async fn list_page<S: LogStore>(store: &S, page: usize) -> Result<ProjectList, ApiError> {
  let projects = store.list_projects().await.map_err(ApiError::store)?;
  let page = paginate(projects, PAGE_SIZE, page).map(|d| ProjectRecord::from(&d));
  Ok(ProjectList { projects: page.items, page: page.meta })
}

pub async fn get_one<S: LogStore>(store: &S, id: i64, page: usize) -> Result<ProjectView, ApiError> {
  let project = store
    .get_project(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound("Project"))?;
  let boreholes = store.list_boreholes(id).await.map_err(ApiError::store)?;
  let page = paginate(boreholes, PAGE_SIZE, page).map(|d| BoreholeRecord::from(&d));

  Ok(ProjectView {
    project:   ProjectRecord::from(&project),
    boreholes: page.items,
    page:      page.meta,
  })
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /projects/{id}/{page}`; the caller becomes the lead.
pub async fn create<S: LogStore>(
  State(state): State<ApiState<S>>,
  CurrentUser(user): CurrentUser,
  JsonBody(body): JsonBody<Map<String, Value>>,
) -> Result<impl IntoResponse, ApiError> {
  let fields = ProjectFields::from_form(&body)?;
  let project = state
    .store
    .create_project(user.id, fields)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(project_id = project.id, lead_id = user.id, "project created");
  Ok(created("New project created."))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /projects/{id}/{page}`
pub async fn update<S: LogStore>(
  State(state): State<ApiState<S>>,
  CurrentUser(_): CurrentUser,
  ApiPath((id, _page)): ApiPath<(i64, usize)>,
  JsonBody(body): JsonBody<Map<String, Value>>,
) -> Result<impl IntoResponse, ApiError> {
  state
    .store
    .get_project(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound("Project"))?;

  let fields = ProjectFields::from_form(&body)?;
  state
    .store
    .update_project(id, fields)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound("Project"))?;

  tracing::info!(project_id = id, "project updated");
  Ok(created("Project updated."))
}
