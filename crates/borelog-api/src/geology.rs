//! Handlers for `/geology/{borehole_id}/{strata_id}`.
//!
//! Every method first requires the borehole to exist. `strata_id` is not
//! checked against `borehole_id` when reading or updating a single layer.

use axum::{
  Json,
  extract::State,
  response::{IntoResponse, Response},
};
use borelog_core::{
  model::{BoreholeDetail, GeologyFields},
  record::GeologyRecord,
  store::LogStore,
};
use serde_json::{Map, Value};

use crate::{
  ApiState, created,
  auth::CurrentUser,
  error::ApiError,
  extract::{ApiPath, JsonBody, Selector},
};

async fn borehole<S: LogStore>(store: &S, id: i64) -> Result<BoreholeDetail, ApiError> {
  store
    .get_borehole(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound("Borehole"))
}

/// `GET /geology/{borehole_id}/{strata_id}`; strata `0` lists every layer,
/// oldest first.
pub async fn get<S: LogStore>(
  State(state): State<ApiState<S>>,
  CurrentUser(_): CurrentUser,
  ApiPath((borehole_id, strata_id)): ApiPath<(i64, i64)>,
) -> Result<Response, ApiError> {
  let borehole = borehole(&*state.store, borehole_id).await?;
  match Selector::from(strata_id) {
    Selector::All => {
      Ok(Json(list_all(&*state.store, borehole.borehole.id).await?).into_response())
    }
    Selector::One(id) => Ok(Json(get_one(&*state.store, id).await?).into_response()),
  }
}

pub async fn list_all<S: LogStore>(
  store: &S,
  borehole_id: i64,
) -> Result<Vec<GeologyRecord>, ApiError> {
  let layers = store
    .list_geology(borehole_id)
    .await
    .map_err(ApiError::store)?;
  Ok(layers.iter().map(GeologyRecord::from).collect())
}

pub async fn get_one<S: LogStore>(store: &S, strata_id: i64) -> Result<GeologyRecord, ApiError> {
  let layer = store
    .get_geology(strata_id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound("Geology"))?;
  Ok(GeologyRecord::from(&layer))
}

/// `POST /geology/{borehole_id}/{strata_id}`; `strata_id` is ignored.
pub async fn create<S: LogStore>(
  State(state): State<ApiState<S>>,
  CurrentUser(_): CurrentUser,
  ApiPath((borehole_id, _strata_id)): ApiPath<(i64, i64)>,
  JsonBody(body): JsonBody<Map<String, Value>>,
) -> Result<impl IntoResponse, ApiError> {
  borehole(&*state.store, borehole_id).await?;

  let fields = GeologyFields::from_form(&body)?;
  let layer = state
    .store
    .create_geology(borehole_id, fields)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(geology_id = layer.id, borehole_id, "layer added");
  Ok(created("New layer added."))
}

/// `PUT /geology/{borehole_id}/{strata_id}`
pub async fn update<S: LogStore>(
  State(state): State<ApiState<S>>,
  CurrentUser(_): CurrentUser,
  ApiPath((borehole_id, strata_id)): ApiPath<(i64, i64)>,
  JsonBody(body): JsonBody<Map<String, Value>>,
) -> Result<impl IntoResponse, ApiError> {
  borehole(&*state.store, borehole_id).await?;
  state
    .store
    .get_geology(strata_id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound("Geology"))?;

  let fields = GeologyFields::from_form(&body)?;
  state
    .store
    .update_geology(strata_id, fields)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound("Geology"))?;

  tracing::info!(geology_id = strata_id, "layer updated");
  Ok(created("Strata updated."))
}
