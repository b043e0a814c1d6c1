//! Field validation for form payloads.
//!
//! Each entity kind is described by a constant table of [`FieldRule`]s and
//! checked by the single generic [`validate`] function. Rules are checked in
//! table order and the first failure is reported.

use std::collections::HashMap;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
  decimal::{COORDINATE, Decimal, DecimalError, DecimalSpec, LEVEL},
  model::{BoreholeFields, GeologyFields, MessageFields, ProjectFields},
};

/// Upper bound of a small unsigned integer column.
pub const SMALL_UINT_MAX: u16 = 32767;

// ─── Rule tables ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  /// Trimmed string of at most `max_len` characters.
  Text { max_len: usize },
  Decimal(DecimalSpec),
  /// Integer in `0..=SMALL_UINT_MAX`.
  SmallUint,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
  pub name:     &'static str,
  pub kind:     FieldKind,
  pub required: bool,
}

impl FieldRule {
  const fn required(name: &'static str, kind: FieldKind) -> Self {
    Self { name, kind, required: true }
  }

  const fn optional(name: &'static str, kind: FieldKind) -> Self {
    Self { name, kind, required: false }
  }
}

const SHORT_TEXT: FieldKind = FieldKind::Text { max_len: 55 };
const LONG_TEXT: FieldKind = FieldKind::Text { max_len: 255 };

pub const PROJECT_RULES: &[FieldRule] = &[
  FieldRule::required("project_title", SHORT_TEXT),
  FieldRule::required("project_reference", SHORT_TEXT),
  FieldRule::required("project_client", SHORT_TEXT),
  FieldRule::required("project_description", LONG_TEXT),
];

pub const BOREHOLE_RULES: &[FieldRule] = &[
  FieldRule::required("borehole_reference", SHORT_TEXT),
  FieldRule::optional("borehole_northing", FieldKind::Decimal(COORDINATE)),
  FieldRule::optional("borehole_easting", FieldKind::Decimal(COORDINATE)),
  FieldRule::required("ground_level", FieldKind::Decimal(LEVEL)),
  FieldRule::required("drilling_equipment", SHORT_TEXT),
  FieldRule::required("borehole_diameter", FieldKind::SmallUint),
];

pub const GEOLOGY_RULES: &[FieldRule] = &[
  FieldRule::required("start_depth", FieldKind::Decimal(LEVEL)),
  FieldRule::required("end_depth", FieldKind::Decimal(LEVEL)),
  FieldRule::optional("sample_number", FieldKind::Text { max_len: 12 }),
  FieldRule::optional("spt_result", SHORT_TEXT),
  FieldRule::required("field_test_details", LONG_TEXT),
  FieldRule::required("geology_description", LONG_TEXT),
];

pub const MESSAGE_RULES: &[FieldRule] = &[FieldRule::required("message", LONG_TEXT)];

/// The entity a form payload is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
  Project,
  Borehole,
  Geology,
  Message,
}

impl EntityKind {
  pub fn rules(self) -> &'static [FieldRule] {
    match self {
      Self::Project => PROJECT_RULES,
      Self::Borehole => BOREHOLE_RULES,
      Self::Geology => GEOLOGY_RULES,
      Self::Message => MESSAGE_RULES,
    }
  }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
  #[error("this field is required")]
  Missing,

  #[error("unexpected value type")]
  WrongType,

  #[error("ensure this value has at most {max} characters")]
  TooLong { max: usize },

  #[error(transparent)]
  Decimal(#[from] DecimalError),

  #[error("ensure this value is between 0 and 32767")]
  OutOfRange,
}

/// A rejected form, naming the first offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
  pub field:  &'static str,
  pub reason: FieldError,
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// A normalized field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
  Text(String),
  Decimal(Decimal),
  SmallUint(u16),
}

/// The normalized output of [`validate`]. Absent optional fields have no
/// entry.
#[derive(Debug, Clone, Default)]
pub struct CleanedFields {
  values: HashMap<&'static str, FieldValue>,
}

impl CleanedFields {
  pub fn get(&self, name: &str) -> Option<&FieldValue> { self.values.get(name) }

  fn text(&mut self, name: &'static str) -> Result<Option<String>, ValidationError> {
    match self.values.remove(name) {
      None => Ok(None),
      Some(FieldValue::Text(s)) => Ok(Some(s)),
      Some(_) => Err(ValidationError { field: name, reason: FieldError::WrongType }),
    }
  }

  fn decimal(&mut self, name: &'static str) -> Result<Option<Decimal>, ValidationError> {
    match self.values.remove(name) {
      None => Ok(None),
      Some(FieldValue::Decimal(d)) => Ok(Some(d)),
      Some(_) => Err(ValidationError { field: name, reason: FieldError::WrongType }),
    }
  }

  fn small_uint(&mut self, name: &'static str) -> Result<Option<u16>, ValidationError> {
    match self.values.remove(name) {
      None => Ok(None),
      Some(FieldValue::SmallUint(n)) => Ok(Some(n)),
      Some(_) => Err(ValidationError { field: name, reason: FieldError::WrongType }),
    }
  }
}

fn present<T>(name: &'static str, value: Option<T>) -> Result<T, ValidationError> {
  value.ok_or(ValidationError { field: name, reason: FieldError::Missing })
}

/// Check `raw` against the rule table for `kind`.
///
/// Strings and numbers are accepted for every field kind; `null` and
/// whitespace-only strings count as absent. Keys not named by the table are
/// ignored.
pub fn validate(
  kind: EntityKind,
  raw: &Map<String, Value>,
) -> Result<CleanedFields, ValidationError> {
  let mut cleaned = CleanedFields::default();

  for rule in kind.rules() {
    let fail = |reason| ValidationError { field: rule.name, reason };

    let Some(text) = scalar(raw.get(rule.name)).map_err(fail)? else {
      if rule.required {
        return Err(fail(FieldError::Missing));
      }
      continue;
    };

    let value = match rule.kind {
      FieldKind::Text { max_len } => {
        if text.chars().count() > max_len {
          return Err(fail(FieldError::TooLong { max: max_len }));
        }
        FieldValue::Text(text)
      }
      FieldKind::Decimal(spec) => FieldValue::Decimal(
        Decimal::parse(&text, spec).map_err(|e| fail(e.into()))?,
      ),
      FieldKind::SmallUint => FieldValue::SmallUint(parse_small_uint(&text).map_err(fail)?),
    };

    cleaned.values.insert(rule.name, value);
  }

  Ok(cleaned)
}

fn scalar(value: Option<&Value>) -> Result<Option<String>, FieldError> {
  match value {
    None | Some(Value::Null) => Ok(None),
    Some(Value::String(s)) => {
      let trimmed = s.trim();
      Ok((!trimmed.is_empty()).then(|| trimmed.to_owned()))
    }
    Some(Value::Number(n)) => Ok(Some(n.to_string())),
    Some(_) => Err(FieldError::WrongType),
  }
}

/// Integers, optionally written with an all-zero fraction (`"5.0"`).
fn parse_small_uint(text: &str) -> Result<u16, FieldError> {
  let whole = match text.split_once('.') {
    Some((whole, fraction)) if fraction.bytes().all(|b| b == b'0') => whole,
    Some(_) => return Err(FieldError::WrongType),
    None => text,
  };
  let n: i64 = whole.parse().map_err(|_| FieldError::WrongType)?;
  u16::try_from(n)
    .ok()
    .filter(|n| *n <= SMALL_UINT_MAX)
    .ok_or(FieldError::OutOfRange)
}

// ─── Typed forms ─────────────────────────────────────────────────────────────

impl ProjectFields {
  pub fn from_form(raw: &Map<String, Value>) -> Result<Self, ValidationError> {
    let mut c = validate(EntityKind::Project, raw)?;
    Ok(Self {
      title:       present("project_title", c.text("project_title")?)?,
      reference:   present("project_reference", c.text("project_reference")?)?,
      client:      present("project_client", c.text("project_client")?)?,
      description: present("project_description", c.text("project_description")?)?,
    })
  }
}

impl BoreholeFields {
  pub fn from_form(raw: &Map<String, Value>) -> Result<Self, ValidationError> {
    let mut c = validate(EntityKind::Borehole, raw)?;
    Ok(Self {
      reference:          present("borehole_reference", c.text("borehole_reference")?)?,
      northing:           c.decimal("borehole_northing")?,
      easting:            c.decimal("borehole_easting")?,
      ground_level:       present("ground_level", c.decimal("ground_level")?)?,
      drilling_equipment: present("drilling_equipment", c.text("drilling_equipment")?)?,
      diameter:           present("borehole_diameter", c.small_uint("borehole_diameter")?)?,
    })
  }
}

impl GeologyFields {
  pub fn from_form(raw: &Map<String, Value>) -> Result<Self, ValidationError> {
    let mut c = validate(EntityKind::Geology, raw)?;
    Ok(Self {
      start_depth:        present("start_depth", c.decimal("start_depth")?)?,
      end_depth:          present("end_depth", c.decimal("end_depth")?)?,
      sample_number:      c.text("sample_number")?,
      spt_result:         c.text("spt_result")?,
      field_test_details: present("field_test_details", c.text("field_test_details")?)?,
      description:        present("geology_description", c.text("geology_description")?)?,
    })
  }
}

impl MessageFields {
  pub fn from_form(raw: &Map<String, Value>) -> Result<Self, ValidationError> {
    let mut c = validate(EntityKind::Message, raw)?;
    Ok(Self { text: present("message", c.text("message")?)? })
  }
}
