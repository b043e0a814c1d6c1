//! Handler for `GET /profile/{user_id}`.

use axum::{
  Json,
  extract::State,
  response::{IntoResponse, Response},
};
use borelog_core::{
  profile,
  record::{ProjectRecord, UserRecord},
  store::LogStore,
};
use serde::Serialize;

use crate::{
  ApiState,
  auth::CurrentUser,
  error::ApiError,
  extract::{ApiPath, Selector},
};

#[derive(Debug, Serialize)]
pub struct ProfileView {
  /// Username of the profile owner.
  pub user:             String,
  pub projects_leading: Vec<ProjectRecord>,
  pub projects_logging: Vec<ProjectRecord>,
}

/// `GET /profile/{user_id}`; `0` lists every user.
pub async fn get<S: LogStore>(
  State(state): State<ApiState<S>>,
  CurrentUser(_): CurrentUser,
  ApiPath(user_id): ApiPath<i64>,
) -> Result<Response, ApiError> {
  match Selector::from(user_id) {
    Selector::All => Ok(Json(list_all(&*state.store).await?).into_response()),
    Selector::One(id) => Ok(Json(get_one(&*state.store, id).await?).into_response()),
  }
}

pub async fn list_all<S: LogStore>(store: &S) -> Result<Vec<UserRecord>, ApiError> {
  let users = store.list_users().await.map_err(ApiError::store)?;
  Ok(users.iter().map(UserRecord::from).collect())
}

pub async fn get_one<S: LogStore>(store: &S, user_id: i64) -> Result<ProfileView, ApiError> {
  let user = store
    .get_user(user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound("User"))?;
  let profile = profile::aggregate(store, user.id)
    .await
    .map_err(ApiError::store)?;

  Ok(ProfileView {
    user:             user.username,
    projects_leading: profile.projects_led.iter().map(ProjectRecord::from).collect(),
    projects_logging: profile.projects_logged.iter().map(ProjectRecord::from).collect(),
  })
}
