//! Entities of the record store and the "detail" read models built from
//! them.
//!
//! Ownership runs User -> Project -> Borehole -> Geology, with Messages
//! hanging off a Project. Parent references are fixed at creation; only the
//! leaf scalar fields (the `*Fields` types) are ever rewritten.

use chrono::{DateTime, Utc};

use crate::decimal::Decimal;

// ─── Users ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
  pub id:          i64,
  pub username:    String,
  pub email:       String,
  pub date_joined: DateTime<Utc>,
}

/// Input to [`crate::store::LogStore::create_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub email:         String,
  /// argon2 PHC string; hashing happens before the store sees it.
  pub password_hash: String,
}

/// A user together with the stored password hash, for login only.
#[derive(Debug, Clone)]
pub struct Credentials {
  pub user:          User,
  pub password_hash: String,
}

/// A user with the counts shown on the people listing.
#[derive(Debug, Clone)]
pub struct UserSummary {
  pub user:      User,
  pub projects:  u64,
  pub boreholes: u64,
}

// ─── Projects ────────────────────────────────────────────────────────────────

/// Editable project fields, as accepted from the create/update form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFields {
  pub title:       String,
  pub reference:   String,
  pub client:      String,
  pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
  pub id:         i64,
  pub lead_id:    i64,
  pub fields:     ProjectFields,
  pub created_at: DateTime<Utc>,
  /// Stored sketch name relative to the media root, if any.
  pub sketch:     Option<String>,
}

/// A project joined with its lead's username and child counts.
#[derive(Debug, Clone)]
pub struct ProjectDetail {
  pub project:   Project,
  pub lead:      String,
  pub boreholes: u64,
  pub messages:  u64,
}

// ─── Boreholes ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoreholeFields {
  pub reference:          String,
  pub northing:           Option<Decimal>,
  pub easting:            Option<Decimal>,
  pub ground_level:       Decimal,
  pub drilling_equipment: String,
  /// Nominal diameter, stored as a small unsigned integer.
  pub diameter:           u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Borehole {
  pub id:         i64,
  pub logger_id:  i64,
  pub project_id: i64,
  pub fields:     BoreholeFields,
  pub created_at: DateTime<Utc>,
}

/// A borehole joined with its logger's username and parent project labels.
#[derive(Debug, Clone)]
pub struct BoreholeDetail {
  pub borehole:          Borehole,
  pub logger:            String,
  pub project_title:     String,
  pub project_reference: String,
  pub project_client:    String,
}

// ─── Geology ─────────────────────────────────────────────────────────────────

/// Editable layer fields. `start_depth < end_depth` is not enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeologyFields {
  pub start_depth:        Decimal,
  pub end_depth:          Decimal,
  pub sample_number:      Option<String>,
  pub spt_result:         Option<String>,
  pub field_test_details: String,
  pub description:        String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geology {
  pub id:          i64,
  pub borehole_id: i64,
  pub fields:      GeologyFields,
  pub created_at:  DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct GeologyDetail {
  pub geology:            Geology,
  pub borehole_reference: String,
}

// ─── Messages ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFields {
  pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
  pub id:         i64,
  pub project_id: i64,
  pub user_id:    i64,
  pub text:       String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct MessageDetail {
  pub message:  Message,
  pub username: String,
}
