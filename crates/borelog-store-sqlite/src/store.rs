//! [`SqliteStore`]: the SQLite implementation of [`LogStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension as _, Row};

use borelog_core::{
  Decimal,
  model::{
    Borehole, BoreholeDetail, BoreholeFields, Credentials, Geology, GeologyDetail, GeologyFields,
    Message, MessageDetail, MessageFields, NewUser, Project, ProjectDetail, ProjectFields, User,
    UserSummary,
  },
  store::LogStore,
};

use crate::{
  Error, Result,
  encode::{
    BOREHOLE_SELECT, GEOLOGY_SELECT, MESSAGE_SELECT, PROJECT_SELECT, RawBoreholeDetail,
    RawGeologyDetail, RawMessageDetail, RawProjectDetail, RawUser, RawUserSummary, USER_SELECT,
    USER_SUMMARY_SELECT, encode_dt, now,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A borelog record store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `select` with an optional single id parameter and decode each row.
  async fn select<R, T>(
    &self,
    sql: String,
    arg: Option<i64>,
    from_row: fn(&Row<'_>) -> rusqlite::Result<R>,
    decode: fn(R) -> Result<T>,
  ) -> Result<Vec<T>>
  where
    R: Send + 'static,
  {
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(arg), from_row)?
          .collect::<rusqlite::Result<Vec<R>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(decode).collect()
  }

  /// Run a single-row statement and report whether it touched anything.
  async fn execute(&self, sql: &'static str, id: i64) -> Result<bool> {
    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute(sql, rusqlite::params![id])?))
      .await?;
    Ok(changed > 0)
  }

  async fn project_details(&self, tail: &str, arg: Option<i64>) -> Result<Vec<ProjectDetail>> {
    self
      .select(
        format!("{PROJECT_SELECT} {tail}"),
        arg,
        RawProjectDetail::from_row,
        RawProjectDetail::into_detail,
      )
      .await
  }

  async fn borehole_details(&self, tail: &str, arg: i64) -> Result<Vec<BoreholeDetail>> {
    self
      .select(
        format!("{BOREHOLE_SELECT} {tail}"),
        Some(arg),
        RawBoreholeDetail::from_row,
        RawBoreholeDetail::into_detail,
      )
      .await
  }

  async fn geology_details(&self, tail: &str, arg: i64) -> Result<Vec<GeologyDetail>> {
    self
      .select(
        format!("{GEOLOGY_SELECT} {tail}"),
        Some(arg),
        RawGeologyDetail::from_row,
        RawGeologyDetail::into_detail,
      )
      .await
  }
}

// ─── LogStore impl ───────────────────────────────────────────────────────────

impl LogStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<Option<User>> {
    let date_joined = now();
    let joined_str = encode_dt(date_joined);
    let username = input.username.clone();

    let inserted = self
      .conn
      .call(move |conn| {
        let result = conn.execute(
          "INSERT INTO users (username, email, password_hash, date_joined)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![username, input.email, input.password_hash, joined_str],
        );
        match result {
          Ok(_) => Ok(Some((conn.last_insert_rowid(), input.email))),
          Err(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
          {
            Ok(None)
          }
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(inserted.map(|(id, email)| User { id, username: input.username, email, date_joined }))
  }

  async fn get_user(&self, id: i64) -> Result<Option<User>> {
    let users = self
      .select(
        format!("{USER_SELECT} WHERE u.id = ?1"),
        Some(id),
        RawUser::from_row,
        RawUser::into_user,
      )
      .await?;
    Ok(users.into_iter().next())
  }

  async fn get_credentials(&self, username: String) -> Result<Option<Credentials>> {
    let raw = self
      .conn
      .call(move |conn| {
        let row = conn
          .query_row(
            "SELECT u.id, u.username, u.email, u.date_joined, u.password_hash
             FROM users u WHERE u.username = ?1",
            rusqlite::params![username],
            |r| Ok((RawUser::from_row(r)?, r.get::<_, String>(4)?)),
          )
          .optional()?;
        Ok(row)
      })
      .await?;

    raw
      .map(|(user, password_hash)| -> Result<Credentials> {
        Ok(Credentials { user: user.into_user()?, password_hash })
      })
      .transpose()
  }

  async fn list_users(&self) -> Result<Vec<UserSummary>> {
    self
      .select(
        format!("{USER_SUMMARY_SELECT} ORDER BY u.id"),
        None,
        RawUserSummary::from_row,
        RawUserSummary::into_summary,
      )
      .await
  }

  async fn delete_user(&self, id: i64) -> Result<bool> {
    self.execute("DELETE FROM users WHERE id = ?1", id).await
  }

  // ── Sessions ──────────────────────────────────────────────────────────

  async fn create_session(
    &self,
    token_hash: String,
    user_id: i64,
    expires_at: DateTime<Utc>,
  ) -> Result<()> {
    let expires_str = encode_dt(expires_at);
    let now_str = encode_dt(now());

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM sessions WHERE expires_at <= ?1", rusqlite::params![now_str])?;
        tx.execute(
          "INSERT INTO sessions (token_hash, user_id, expires_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![token_hash, user_id, expires_str],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn session_user(&self, token_hash: String, now: DateTime<Utc>) -> Result<Option<User>> {
    let now_str = encode_dt(now);

    let raw = self
      .conn
      .call(move |conn| {
        let row = conn
          .query_row(
            "SELECT u.id, u.username, u.email, u.date_joined
             FROM sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.token_hash = ?1 AND s.expires_at > ?2",
            rusqlite::params![token_hash, now_str],
            RawUser::from_row,
          )
          .optional()?;
        Ok(row)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn delete_session(&self, token_hash: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM sessions WHERE token_hash = ?1", rusqlite::params![token_hash])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Projects ──────────────────────────────────────────────────────────

  async fn create_project(&self, lead_id: i64, fields: ProjectFields) -> Result<Project> {
    let created_at = now();
    let created_str = encode_dt(created_at);
    let f = fields.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO projects (lead_id, title, reference, client, description, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![lead_id, f.title, f.reference, f.client, f.description, created_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Project { id, lead_id, fields, created_at, sketch: None })
  }

  async fn update_project(&self, id: i64, fields: ProjectFields) -> Result<Option<Project>> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE projects SET title = ?2, reference = ?3, client = ?4, description = ?5
           WHERE id = ?1",
          rusqlite::params![id, fields.title, fields.reference, fields.client, fields.description],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    Ok(self.get_project(id).await?.map(|d| d.project))
  }

  async fn set_project_sketch(&self, id: i64, sketch: Option<String>) -> Result<bool> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE projects SET sketch = ?2 WHERE id = ?1",
          rusqlite::params![id, sketch],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  async fn get_project(&self, id: i64) -> Result<Option<ProjectDetail>> {
    let projects = self.project_details("WHERE p.id = ?1", Some(id)).await?;
    Ok(projects.into_iter().next())
  }

  async fn list_projects(&self) -> Result<Vec<ProjectDetail>> {
    self
      .project_details("ORDER BY p.created_at DESC, p.id DESC", None)
      .await
  }

  async fn projects_led_by(&self, user_id: i64) -> Result<Vec<ProjectDetail>> {
    self
      .project_details(
        "WHERE p.lead_id = ?1 ORDER BY p.created_at DESC, p.id DESC",
        Some(user_id),
      )
      .await
  }

  async fn projects_of_boreholes_logged_by(&self, user_id: i64) -> Result<Vec<ProjectDetail>> {
    self
      .project_details(
        "JOIN boreholes lb ON lb.project_id = p.id WHERE lb.logger_id = ?1",
        Some(user_id),
      )
      .await
  }

  async fn delete_project(&self, id: i64) -> Result<bool> {
    self.execute("DELETE FROM projects WHERE id = ?1", id).await
  }

  // ── Boreholes ─────────────────────────────────────────────────────────

  async fn create_borehole(
    &self,
    logger_id: i64,
    project_id: i64,
    fields: BoreholeFields,
  ) -> Result<Borehole> {
    let created_at = now();
    let created_str = encode_dt(created_at);
    let f = fields.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO boreholes (
             logger_id, project_id, reference, created_at, northing, easting,
             ground_level, drilling_equipment, diameter
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            logger_id,
            project_id,
            f.reference,
            created_str,
            f.northing.map(Decimal::units),
            f.easting.map(Decimal::units),
            f.ground_level.units(),
            f.drilling_equipment,
            f.diameter,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Borehole { id, logger_id, project_id, fields, created_at })
  }

  async fn update_borehole(&self, id: i64, fields: BoreholeFields) -> Result<Option<Borehole>> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE boreholes
           SET reference = ?2, northing = ?3, easting = ?4, ground_level = ?5,
               drilling_equipment = ?6, diameter = ?7
           WHERE id = ?1",
          rusqlite::params![
            id,
            fields.reference,
            fields.northing.map(Decimal::units),
            fields.easting.map(Decimal::units),
            fields.ground_level.units(),
            fields.drilling_equipment,
            fields.diameter,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    Ok(self.get_borehole(id).await?.map(|d| d.borehole))
  }

  async fn get_borehole(&self, id: i64) -> Result<Option<BoreholeDetail>> {
    let boreholes = self.borehole_details("WHERE b.id = ?1", id).await?;
    Ok(boreholes.into_iter().next())
  }

  async fn list_boreholes(&self, project_id: i64) -> Result<Vec<BoreholeDetail>> {
    self
      .borehole_details(
        "WHERE b.project_id = ?1 ORDER BY b.created_at ASC, b.id ASC",
        project_id,
      )
      .await
  }

  async fn delete_borehole(&self, id: i64) -> Result<bool> {
    self.execute("DELETE FROM boreholes WHERE id = ?1", id).await
  }

  // ── Geology ───────────────────────────────────────────────────────────

  async fn create_geology(&self, borehole_id: i64, fields: GeologyFields) -> Result<Geology> {
    let created_at = now();
    let created_str = encode_dt(created_at);
    let f = fields.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO geology (
             borehole_id, start_depth, end_depth, sample_number, spt_result,
             field_test_details, description, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            borehole_id,
            f.start_depth.units(),
            f.end_depth.units(),
            f.sample_number,
            f.spt_result,
            f.field_test_details,
            f.description,
            created_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Geology { id, borehole_id, fields, created_at })
  }

  async fn update_geology(&self, id: i64, fields: GeologyFields) -> Result<Option<Geology>> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE geology
           SET start_depth = ?2, end_depth = ?3, sample_number = ?4, spt_result = ?5,
               field_test_details = ?6, description = ?7
           WHERE id = ?1",
          rusqlite::params![
            id,
            fields.start_depth.units(),
            fields.end_depth.units(),
            fields.sample_number,
            fields.spt_result,
            fields.field_test_details,
            fields.description,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    Ok(self.get_geology(id).await?.map(|d| d.geology))
  }

  async fn get_geology(&self, id: i64) -> Result<Option<GeologyDetail>> {
    let layers = self.geology_details("WHERE g.id = ?1", id).await?;
    Ok(layers.into_iter().next())
  }

  async fn list_geology(&self, borehole_id: i64) -> Result<Vec<GeologyDetail>> {
    self
      .geology_details(
        "WHERE g.borehole_id = ?1 ORDER BY g.created_at ASC, g.id ASC",
        borehole_id,
      )
      .await
  }

  // ── Messages ──────────────────────────────────────────────────────────

  async fn create_message(
    &self,
    project_id: i64,
    user_id: i64,
    fields: MessageFields,
  ) -> Result<Message> {
    let created_at = now();
    let created_str = encode_dt(created_at);
    let text = fields.text.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO messages (project_id, user_id, text, created_at) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![project_id, user_id, text, created_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Message { id, project_id, user_id, text: fields.text, created_at })
  }

  async fn list_messages(&self, project_id: i64) -> Result<Vec<MessageDetail>> {
    self
      .select(
        format!("{MESSAGE_SELECT} WHERE m.project_id = ?1 ORDER BY m.created_at DESC, m.id DESC"),
        Some(project_id),
        RawMessageDetail::from_row,
        RawMessageDetail::into_detail,
      )
      .await
  }
}
