//! Profile aggregation: the projects a user leads and the projects they log
//! boreholes in.

use std::collections::HashSet;

use crate::{model::ProjectDetail, store::LogStore};

#[derive(Debug, Clone)]
pub struct Profile {
  /// Projects led by the user, newest first.
  pub projects_led:    Vec<ProjectDetail>,
  /// Projects holding at least one borehole logged by the user, each listed
  /// once, newest first.
  pub projects_logged: Vec<ProjectDetail>,
}

pub async fn aggregate<S: LogStore>(store: &S, user_id: i64) -> Result<Profile, S::Error> {
  let projects_led = store.projects_led_by(user_id).await?;
  let per_borehole = store.projects_of_boreholes_logged_by(user_id).await?;

  Ok(Profile { projects_led, projects_logged: dedup_newest_first(per_borehole) })
}

/// Keep the first occurrence of each project id, then order by creation
/// time descending (ties broken by id descending).
pub fn dedup_newest_first(projects: Vec<ProjectDetail>) -> Vec<ProjectDetail> {
  let mut seen = HashSet::new();
  let mut unique: Vec<ProjectDetail> = projects
    .into_iter()
    .filter(|d| seen.insert(d.project.id))
    .collect();

  unique.sort_by(|a, b| {
    b.project
      .created_at
      .cmp(&a.project.created_at)
      .then(b.project.id.cmp(&a.project.id))
  });
  unique
}
