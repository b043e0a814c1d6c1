//! The `LogStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `borelog-store-sqlite`). The HTTP layer depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::model::{
  Borehole, BoreholeDetail, BoreholeFields, Credentials, Geology, GeologyDetail, GeologyFields,
  Message, MessageDetail, MessageFields, NewUser, Project, ProjectDetail, ProjectFields, User,
  UserSummary,
};

/// Abstraction over a borelog store backend.
///
/// Lookups return `Ok(None)` for missing rows; updates return `Ok(None)`
/// when the target row does not exist. Deleting a row deletes everything
/// beneath it (projects, boreholes, layers, messages and sessions).
///
/// Listing order is part of the contract: "newest first" and "oldest first"
/// compare `created_at`, with the row id as tie-break.
pub trait LogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Returns `Ok(None)` if the username is taken.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_credentials(
    &self,
    username: String,
  ) -> impl Future<Output = Result<Option<Credentials>, Self::Error>> + Send + '_;

  /// Every user with their project and borehole counts, by id.
  fn list_users(&self) -> impl Future<Output = Result<Vec<UserSummary>, Self::Error>> + Send + '_;

  /// Returns `false` if no such user existed.
  fn delete_user(&self, id: i64) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Sessions ──────────────────────────────────────────────────────────

  /// Record a session keyed by the hash of its token.
  fn create_session(
    &self,
    token_hash: String,
    user_id: i64,
    expires_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The user owning an unexpired session, if any.
  fn session_user(
    &self,
    token_hash: String,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn delete_session(
    &self,
    token_hash: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Projects ──────────────────────────────────────────────────────────

  fn create_project(
    &self,
    lead_id: i64,
    fields: ProjectFields,
  ) -> impl Future<Output = Result<Project, Self::Error>> + Send + '_;

  fn update_project(
    &self,
    id: i64,
    fields: ProjectFields,
  ) -> impl Future<Output = Result<Option<Project>, Self::Error>> + Send + '_;

  /// Record (or clear) the stored sketch name. Returns `false` if the
  /// project does not exist.
  fn set_project_sketch(
    &self,
    id: i64,
    sketch: Option<String>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn get_project(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<ProjectDetail>, Self::Error>> + Send + '_;

  /// All projects, newest first.
  fn list_projects(
    &self,
  ) -> impl Future<Output = Result<Vec<ProjectDetail>, Self::Error>> + Send + '_;

  /// Projects led by `user_id`, newest first.
  fn projects_led_by(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<Vec<ProjectDetail>, Self::Error>> + Send + '_;

  /// The parent project of every borehole logged by `user_id`, one entry
  /// per borehole and in no particular order. Deduplication is the
  /// caller's job (see [`crate::profile`]).
  fn projects_of_boreholes_logged_by(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<Vec<ProjectDetail>, Self::Error>> + Send + '_;

  fn delete_project(&self, id: i64) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Boreholes ─────────────────────────────────────────────────────────

  fn create_borehole(
    &self,
    logger_id: i64,
    project_id: i64,
    fields: BoreholeFields,
  ) -> impl Future<Output = Result<Borehole, Self::Error>> + Send + '_;

  fn update_borehole(
    &self,
    id: i64,
    fields: BoreholeFields,
  ) -> impl Future<Output = Result<Option<Borehole>, Self::Error>> + Send + '_;

  fn get_borehole(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<BoreholeDetail>, Self::Error>> + Send + '_;

  /// Boreholes of a project, oldest first.
  fn list_boreholes(
    &self,
    project_id: i64,
  ) -> impl Future<Output = Result<Vec<BoreholeDetail>, Self::Error>> + Send + '_;

  fn delete_borehole(&self, id: i64)
  -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Geology ───────────────────────────────────────────────────────────

  fn create_geology(
    &self,
    borehole_id: i64,
    fields: GeologyFields,
  ) -> impl Future<Output = Result<Geology, Self::Error>> + Send + '_;

  fn update_geology(
    &self,
    id: i64,
    fields: GeologyFields,
  ) -> impl Future<Output = Result<Option<Geology>, Self::Error>> + Send + '_;

  fn get_geology(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<GeologyDetail>, Self::Error>> + Send + '_;

  /// Layers of a borehole, oldest first.
  fn list_geology(
    &self,
    borehole_id: i64,
  ) -> impl Future<Output = Result<Vec<GeologyDetail>, Self::Error>> + Send + '_;

  // ── Messages ──────────────────────────────────────────────────────────

  fn create_message(
    &self,
    project_id: i64,
    user_id: i64,
    fields: MessageFields,
  ) -> impl Future<Output = Result<Message, Self::Error>> + Send + '_;

  /// Messages on a project, newest first.
  fn list_messages(
    &self,
    project_id: i64,
  ) -> impl Future<Output = Result<Vec<MessageDetail>, Self::Error>> + Send + '_;
}
