//! Handlers for `/message/{project_id}/{page}`.

use axum::{Json, extract::State, response::IntoResponse};
use borelog_core::{
  model::MessageFields,
  paginate::{PAGE_SIZE, PageMeta, paginate},
  record::MessageRecord,
  store::LogStore,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
  ApiState, created,
  auth::CurrentUser,
  error::ApiError,
  extract::{ApiPath, JsonBody},
};

#[derive(Debug, Serialize)]
pub struct MessageList {
  pub messages: Vec<MessageRecord>,
  #[serde(flatten)]
  pub page:     PageMeta,
}

async fn require_project<S: LogStore>(store: &S, id: i64) -> Result<(), ApiError> {
  store
    .get_project(id)
    .await
    .map_err(ApiError::store)?
    .map(|_| ())
    .ok_or(ApiError::NotFound("Project"))
}

/// `GET /message/{project_id}/{page}`, newest first.
pub async fn list_page<S: LogStore>(
  State(state): State<ApiState<S>>,
  CurrentUser(_): CurrentUser,
  ApiPath((project_id, page)): ApiPath<(i64, usize)>,
) -> Result<Json<MessageList>, ApiError> {
  require_project(&*state.store, project_id).await?;

  let messages = state
    .store
    .list_messages(project_id)
    .await
    .map_err(ApiError::store)?;
  let page = paginate(messages, PAGE_SIZE, page).map(|d| MessageRecord::from(&d));
  Ok(Json(MessageList { messages: page.items, page: page.meta }))
}

/// `POST /message/{project_id}/{page}`; `page` is ignored.
pub async fn create<S: LogStore>(
  State(state): State<ApiState<S>>,
  CurrentUser(user): CurrentUser,
  ApiPath((project_id, _page)): ApiPath<(i64, usize)>,
  JsonBody(body): JsonBody<Map<String, Value>>,
) -> Result<impl IntoResponse, ApiError> {
  require_project(&*state.store, project_id).await?;

  let fields = MessageFields::from_form(&body)?;
  let message = state
    .store
    .create_message(project_id, user.id, fields)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(message_id = message.id, project_id, user_id = user.id, "message added");
  Ok(created("Message added."))
}
