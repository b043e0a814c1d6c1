//! Sketch image files under the media root.
//!
//! Each project keeps at most one sketch, stored as
//! `project_sketch/{project_id}_{unix_seconds}.{ext}`. The timestamp in the
//! name changes the URL on every upload so clients never show a stale image.
//!
//! Replacement writes the new file before touching the old one:
//!
//! 1. write the bytes to a hidden temporary file next to the target;
//! 2. rename it into place;
//! 3. record the new name on the project;
//! 4. delete the previous file.
//!
//! A failure before step 3 leaves the project pointing at its old sketch. A
//! failure in step 4 is logged and leaves an orphaned file behind.
//!
//! Two uploads racing on the same project are not serialised: the last
//! store write wins and the loser's file is orphaned.

use std::path::PathBuf;

use borelog_core::{DataUri, model::Project, store::LogStore};
use chrono::{DateTime, Utc};

use crate::error::ApiError;

pub const SKETCH_DIR: &str = "project_sketch";

#[derive(Debug, Clone)]
pub struct SketchManager {
  media_root: PathBuf,
  media_url:  String,
}

impl SketchManager {
  pub fn new(media_root: impl Into<PathBuf>, media_url: impl Into<String>) -> Self {
    Self { media_root: media_root.into(), media_url: media_url.into() }
  }

  /// Public URL of a stored sketch name.
  pub fn url(&self, name: &str) -> String { format!("{}{name}", self.media_url) }

  /// The stored name for an upload made at `now`.
  pub fn stored_name(project_id: i64, extension: &str, now: DateTime<Utc>) -> String {
    format!("{SKETCH_DIR}/{project_id}_{}.{extension}", now.timestamp())
  }

  /// Store `upload` as the sketch of `project`, replacing any previous one.
  /// Returns the new stored name.
  pub async fn set_sketch<S: LogStore>(
    &self,
    store: &S,
    project: &Project,
    upload: &DataUri,
    now: DateTime<Utc>,
  ) -> Result<String, ApiError> {
    let name = Self::stored_name(project.id, &upload.extension, now);
    let target = self.media_root.join(&name);
    let dir = self.media_root.join(SKETCH_DIR);
    let staging = dir.join(format!(".{}_{}.tmp", project.id, now.timestamp()));

    tokio::fs::create_dir_all(&dir).await?;
    tokio::fs::write(&staging, &upload.bytes).await?;
    if let Err(e) = tokio::fs::rename(&staging, &target).await {
      let _ = tokio::fs::remove_file(&staging).await;
      return Err(e.into());
    }

    let recorded = store
      .set_project_sketch(project.id, Some(name.clone()))
      .await
      .map_err(ApiError::store)?;
    if !recorded {
      let _ = tokio::fs::remove_file(&target).await;
      return Err(ApiError::NotFound("Project"));
    }

    if let Some(previous) = &project.sketch
      && *previous != name
    {
      let old = self.media_root.join(previous);
      if let Err(e) = tokio::fs::remove_file(&old).await {
        tracing::warn!(path = %old.display(), error = %e, "could not delete replaced sketch");
      }
    }

    tracing::info!(project_id = project.id, %name, "sketch stored");
    Ok(name)
  }
}
