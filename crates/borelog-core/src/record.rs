//! Flat, display-ready records for JSON transport.
//!
//! Each record is a pure projection of a detail read model: foreign keys
//! are expanded to both id and label, timestamps are pre-formatted and
//! decimals are rendered as strings.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
  decimal::Decimal,
  model::{BoreholeDetail, GeologyDetail, MessageDetail, ProjectDetail, UserSummary},
};

/// `Oct 19 2026, 03:04 PM`
pub const DISPLAY_FORMAT: &str = "%b %d %Y, %I:%M %p";

pub fn display_date(at: DateTime<Utc>) -> String { at.format(DISPLAY_FORMAT).to_string() }

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
  pub id:        i64,
  pub username:  String,
  pub projects:  u64,
  pub boreholes: u64,
}

impl From<&UserSummary> for UserRecord {
  fn from(s: &UserSummary) -> Self {
    Self {
      id:        s.user.id,
      username:  s.user.username.clone(),
      projects:  s.projects,
      boreholes: s.boreholes,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRecord {
  pub id:           i64,
  pub lead:         String,
  pub lead_id:      i64,
  pub title:        String,
  #[serde(rename = "ref")]
  pub reference:    String,
  pub client:       String,
  pub date_created: String,
  pub description:  String,
  pub boreholes:    u64,
  pub messages:     u64,
}

impl From<&ProjectDetail> for ProjectRecord {
  fn from(d: &ProjectDetail) -> Self {
    let p = &d.project;
    Self {
      id:           p.id,
      lead:         d.lead.clone(),
      lead_id:      p.lead_id,
      title:        p.fields.title.clone(),
      reference:    p.fields.reference.clone(),
      client:       p.fields.client.clone(),
      date_created: display_date(p.created_at),
      description:  p.fields.description.clone(),
      boreholes:    d.boreholes,
      messages:     d.messages,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoreholeRecord {
  pub id:             i64,
  pub logger:         String,
  pub logger_id:      i64,
  pub project:        String,
  pub project_ref:    String,
  pub project_client: String,
  #[serde(rename = "ref")]
  pub reference:      String,
  pub date_created:   String,
  pub northing:       Option<Decimal>,
  pub easting:        Option<Decimal>,
  pub ground_level:   Decimal,
  pub equipment:      String,
  pub bh_dia:         u16,
}

impl From<&BoreholeDetail> for BoreholeRecord {
  fn from(d: &BoreholeDetail) -> Self {
    let b = &d.borehole;
    Self {
      id:             b.id,
      logger:         d.logger.clone(),
      logger_id:      b.logger_id,
      project:        d.project_title.clone(),
      project_ref:    d.project_reference.clone(),
      project_client: d.project_client.clone(),
      reference:      b.fields.reference.clone(),
      date_created:   display_date(b.created_at),
      northing:       b.fields.northing,
      easting:        b.fields.easting,
      ground_level:   b.fields.ground_level,
      equipment:      b.fields.drilling_equipment.clone(),
      bh_dia:         b.fields.diameter,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeologyRecord {
  pub id:          i64,
  pub borehole:    String,
  pub borehole_id: i64,
  pub start_depth: Decimal,
  pub end_depth:   Decimal,
  pub sample_id:   Option<String>,
  pub spt:         Option<String>,
  pub field_test:  String,
  pub description: String,
  pub timestamp:   String,
}

impl From<&GeologyDetail> for GeologyRecord {
  fn from(d: &GeologyDetail) -> Self {
    let g = &d.geology;
    Self {
      id:          g.id,
      borehole:    d.borehole_reference.clone(),
      borehole_id: g.borehole_id,
      start_depth: g.fields.start_depth,
      end_depth:   g.fields.end_depth,
      sample_id:   g.fields.sample_number.clone(),
      spt:         g.fields.spt_result.clone(),
      field_test:  g.fields.field_test_details.clone(),
      description: g.fields.description.clone(),
      timestamp:   display_date(g.created_at),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRecord {
  pub id:      i64,
  pub user:    String,
  pub user_id: i64,
  pub project: i64,
  pub message: String,
  pub date:    String,
}

impl From<&MessageDetail> for MessageRecord {
  fn from(d: &MessageDetail) -> Self {
    let m = &d.message;
    Self {
      id:      m.id,
      user:    d.username.clone(),
      user_id: m.user_id,
      project: m.project_id,
      message: m.text.clone(),
      date:    display_date(m.created_at),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use serde_json::json;

  use super::*;
  use crate::model::{Borehole, BoreholeFields, Project, ProjectFields};

  fn at(h: u32, m: u32) -> DateTime<Utc> { Utc.with_ymd_and_hms(2026, 3, 7, h, m, 0).unwrap() }

  #[test]
  fn date_format() {
    assert_eq!(display_date(at(15, 4)), "Mar 07 2026, 03:04 PM");
    assert_eq!(display_date(at(0, 30)), "Mar 07 2026, 12:30 AM");
  }

  #[test]
  fn project_record_shape() {
    let detail = ProjectDetail {
      project:   Project {
        id:         3,
        lead_id:    1,
        fields:     ProjectFields {
          title:       "A".into(),
          reference:   "R1".into(),
          client:      "C".into(),
          description: "D".into(),
        },
        created_at: at(9, 0),
        sketch:     None,
      },
      lead:      "alice".into(),
      boreholes: 0,
      messages:  2,
    };

    let value = serde_json::to_value(ProjectRecord::from(&detail)).unwrap();
    assert_eq!(
      value,
      json!({
        "id": 3,
        "lead": "alice",
        "lead_id": 1,
        "title": "A",
        "ref": "R1",
        "client": "C",
        "date_created": "Mar 07 2026, 09:00 AM",
        "description": "D",
        "boreholes": 0,
        "messages": 2,
      })
    );
  }

  #[test]
  fn borehole_record_expands_labels() {
    let detail = BoreholeDetail {
      borehole:          Borehole {
        id:         7,
        logger_id:  2,
        project_id: 3,
        fields:     BoreholeFields {
          reference:          "BH01".into(),
          northing:           None,
          easting:            Some(Decimal::new(-127_758, 6)),
          ground_level:       Decimal::new(1250, 2),
          drilling_equipment: "Cable percussion".into(),
          diameter:           150,
        },
        created_at: at(13, 45),
      },
      logger:            "bob".into(),
      project_title:     "A".into(),
      project_reference: "R1".into(),
      project_client:    "C".into(),
    };

    let value = serde_json::to_value(BoreholeRecord::from(&detail)).unwrap();
    assert_eq!(value["logger"], "bob");
    assert_eq!(value["project"], "A");
    assert_eq!(value["ref"], "BH01");
    assert_eq!(value["northing"], serde_json::Value::Null);
    assert_eq!(value["easting"], "-0.127758");
    assert_eq!(value["ground_level"], "12.50");
    assert_eq!(value["bh_dia"], 150);
    assert_eq!(value["date_created"], "Mar 07 2026, 01:45 PM");
  }
}
