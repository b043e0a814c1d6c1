//! Encoding and decoding helpers between domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`
//! suffix) so that text comparison orders them chronologically. Decimals are
//! stored as integers scaled by their column's decimal places.

use borelog_core::{
  Decimal,
  decimal::{COORDINATE, LEVEL},
  model::{
    Borehole, BoreholeDetail, BoreholeFields, Geology, GeologyDetail, GeologyFields, Message,
    MessageDetail, Project, ProjectDetail, ProjectFields, User, UserSummary,
  },
};
use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use rusqlite::Row;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// The current time at the precision the store keeps.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Micros, true) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Decimal / small integers ────────────────────────────────────────────────

pub fn decode_coordinate(units: i64) -> Decimal { Decimal::new(units, COORDINATE.places) }

pub fn decode_level(units: i64) -> Decimal { Decimal::new(units, LEVEL.places) }

fn decode_count(column: &'static str, n: i64) -> Result<u64> {
  u64::try_from(n).map_err(|_| Error::OutOfRange(column))
}

// ─── Select lists ────────────────────────────────────────────────────────────

pub const USER_SELECT: &str = "SELECT u.id, u.username, u.email, u.date_joined FROM users u";

pub const USER_SUMMARY_SELECT: &str = "
  SELECT u.id, u.username, u.email, u.date_joined,
         (SELECT COUNT(*) FROM projects p WHERE p.lead_id = u.id),
         (SELECT COUNT(*) FROM boreholes b WHERE b.logger_id = u.id)
  FROM users u";

pub const PROJECT_SELECT: &str = "
  SELECT p.id, p.lead_id, u.username, p.title, p.reference, p.client,
         p.description, p.created_at, p.sketch,
         (SELECT COUNT(*) FROM boreholes b WHERE b.project_id = p.id),
         (SELECT COUNT(*) FROM messages m WHERE m.project_id = p.id)
  FROM projects p
  JOIN users u ON u.id = p.lead_id";

pub const BOREHOLE_SELECT: &str = "
  SELECT b.id, b.logger_id, b.project_id, b.reference, b.created_at,
         b.northing, b.easting, b.ground_level, b.drilling_equipment, b.diameter,
         u.username, p.title, p.reference, p.client
  FROM boreholes b
  JOIN users    u ON u.id = b.logger_id
  JOIN projects p ON p.id = b.project_id";

pub const GEOLOGY_SELECT: &str = "
  SELECT g.id, g.borehole_id, g.start_depth, g.end_depth, g.sample_number,
         g.spt_result, g.field_test_details, g.description, g.created_at,
         b.reference
  FROM geology g
  JOIN boreholes b ON b.id = g.borehole_id";

pub const MESSAGE_SELECT: &str = "
  SELECT m.id, m.project_id, m.user_id, m.text, m.created_at, u.username
  FROM messages m
  JOIN users u ON u.id = m.user_id";

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read from a `users` row.
pub struct RawUser {
  pub id:          i64,
  pub username:    String,
  pub email:       String,
  pub date_joined: String,
}

impl RawUser {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      username:    row.get(1)?,
      email:       row.get(2)?,
      date_joined: row.get(3)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:          self.id,
      username:    self.username,
      email:       self.email,
      date_joined: decode_dt(&self.date_joined)?,
    })
  }
}

pub struct RawUserSummary {
  pub user:      RawUser,
  pub projects:  i64,
  pub boreholes: i64,
}

impl RawUserSummary {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user:      RawUser::from_row(row)?,
      projects:  row.get(4)?,
      boreholes: row.get(5)?,
    })
  }

  pub fn into_summary(self) -> Result<UserSummary> {
    Ok(UserSummary {
      user:      self.user.into_user()?,
      projects:  decode_count("projects", self.projects)?,
      boreholes: decode_count("boreholes", self.boreholes)?,
    })
  }
}

pub struct RawProjectDetail {
  pub id:          i64,
  pub lead_id:     i64,
  pub lead:        String,
  pub title:       String,
  pub reference:   String,
  pub client:      String,
  pub description: String,
  pub created_at:  String,
  pub sketch:      Option<String>,
  pub boreholes:   i64,
  pub messages:    i64,
}

impl RawProjectDetail {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      lead_id:     row.get(1)?,
      lead:        row.get(2)?,
      title:       row.get(3)?,
      reference:   row.get(4)?,
      client:      row.get(5)?,
      description: row.get(6)?,
      created_at:  row.get(7)?,
      sketch:      row.get(8)?,
      boreholes:   row.get(9)?,
      messages:    row.get(10)?,
    })
  }

  pub fn into_detail(self) -> Result<ProjectDetail> {
    Ok(ProjectDetail {
      project:   Project {
        id:         self.id,
        lead_id:    self.lead_id,
        fields:     ProjectFields {
          title:       self.title,
          reference:   self.reference,
          client:      self.client,
          description: self.description,
        },
        created_at: decode_dt(&self.created_at)?,
        sketch:     self.sketch,
      },
      lead:      self.lead,
      boreholes: decode_count("boreholes", self.boreholes)?,
      messages:  decode_count("messages", self.messages)?,
    })
  }
}

pub struct RawBoreholeDetail {
  pub id:                 i64,
  pub logger_id:          i64,
  pub project_id:         i64,
  pub reference:          String,
  pub created_at:         String,
  pub northing:           Option<i64>,
  pub easting:            Option<i64>,
  pub ground_level:       i64,
  pub drilling_equipment: String,
  pub diameter:           i64,
  // joined labels
  pub logger:             String,
  pub project_title:      String,
  pub project_reference:  String,
  pub project_client:     String,
}

impl RawBoreholeDetail {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                 row.get(0)?,
      logger_id:          row.get(1)?,
      project_id:         row.get(2)?,
      reference:          row.get(3)?,
      created_at:         row.get(4)?,
      northing:           row.get(5)?,
      easting:            row.get(6)?,
      ground_level:       row.get(7)?,
      drilling_equipment: row.get(8)?,
      diameter:           row.get(9)?,
      logger:             row.get(10)?,
      project_title:      row.get(11)?,
      project_reference:  row.get(12)?,
      project_client:     row.get(13)?,
    })
  }

  pub fn into_detail(self) -> Result<BoreholeDetail> {
    Ok(BoreholeDetail {
      borehole:          Borehole {
        id:         self.id,
        logger_id:  self.logger_id,
        project_id: self.project_id,
        fields:     BoreholeFields {
          reference:          self.reference,
          northing:           self.northing.map(decode_coordinate),
          easting:            self.easting.map(decode_coordinate),
          ground_level:       decode_level(self.ground_level),
          drilling_equipment: self.drilling_equipment,
          diameter:           u16::try_from(self.diameter)
            .map_err(|_| Error::OutOfRange("diameter"))?,
        },
        created_at: decode_dt(&self.created_at)?,
      },
      logger:            self.logger,
      project_title:     self.project_title,
      project_reference: self.project_reference,
      project_client:    self.project_client,
    })
  }
}

pub struct RawGeologyDetail {
  pub id:                 i64,
  pub borehole_id:        i64,
  pub start_depth:        i64,
  pub end_depth:          i64,
  pub sample_number:      Option<String>,
  pub spt_result:         Option<String>,
  pub field_test_details: String,
  pub description:        String,
  pub created_at:         String,
  pub borehole_reference: String,
}

impl RawGeologyDetail {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                 row.get(0)?,
      borehole_id:        row.get(1)?,
      start_depth:        row.get(2)?,
      end_depth:          row.get(3)?,
      sample_number:      row.get(4)?,
      spt_result:         row.get(5)?,
      field_test_details: row.get(6)?,
      description:        row.get(7)?,
      created_at:         row.get(8)?,
      borehole_reference: row.get(9)?,
    })
  }

  pub fn into_detail(self) -> Result<GeologyDetail> {
    Ok(GeologyDetail {
      geology:            Geology {
        id:          self.id,
        borehole_id: self.borehole_id,
        fields:      GeologyFields {
          start_depth:        decode_level(self.start_depth),
          end_depth:          decode_level(self.end_depth),
          sample_number:      self.sample_number,
          spt_result:         self.spt_result,
          field_test_details: self.field_test_details,
          description:        self.description,
        },
        created_at:  decode_dt(&self.created_at)?,
      },
      borehole_reference: self.borehole_reference,
    })
  }
}

pub struct RawMessageDetail {
  pub id:         i64,
  pub project_id: i64,
  pub user_id:    i64,
  pub text:       String,
  pub created_at: String,
  pub username:   String,
}

impl RawMessageDetail {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      project_id: row.get(1)?,
      user_id:    row.get(2)?,
      text:       row.get(3)?,
      created_at: row.get(4)?,
      username:   row.get(5)?,
    })
  }

  pub fn into_detail(self) -> Result<MessageDetail> {
    Ok(MessageDetail {
      message:  Message {
        id:         self.id,
        project_id: self.project_id,
        user_id:    self.user_id,
        text:       self.text,
        created_at: decode_dt(&self.created_at)?,
      },
      username: self.username,
    })
  }
}
