//! Fixed-point decimal values for levels, depths and coordinates.
//!
//! A [`Decimal`] is an integer count of `10^-places` units. Values are
//! quantized to their column's scale when validated, so every stored value
//! of a column shares one scale and renders with exactly that many
//! fractional digits.

use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Precision of a decimal column: at most `digits` significant digits, of
/// which at most `places` follow the decimal point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalSpec {
  pub digits: u32,
  pub places: u32,
}

impl DecimalSpec {
  pub const fn new(digits: u32, places: u32) -> Self { Self { digits, places } }

  fn whole_digits(self) -> u32 { self.digits - self.places }
}

/// Northing / easting columns.
pub const COORDINATE: DecimalSpec = DecimalSpec::new(9, 6);

/// Ground level and layer depth columns.
pub const LEVEL: DecimalSpec = DecimalSpec::new(5, 2);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecimalError {
  #[error("not a decimal number: {0:?}")]
  Invalid(String),

  #[error("ensure that there are no more than {0} digits in total")]
  TooManyDigits(u32),

  #[error("ensure that there are no more than {0} decimal places")]
  TooManyPlaces(u32),

  #[error("ensure that there are no more than {0} digits before the decimal point")]
  TooManyWholeDigits(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
  units:  i64,
  places: u32,
}

impl Decimal {
  /// Build from an already-scaled unit count, e.g. `Decimal::new(1230, 2)`
  /// is `12.30`.
  pub const fn new(units: i64, places: u32) -> Self { Self { units, places } }

  pub const fn units(self) -> i64 { self.units }

  /// Parse a plain decimal literal (`-12.5`, `+3`, `.25`) and quantize it to
  /// `spec.places`.
  ///
  /// Digit counting ignores leading zeros of the whole part but keeps
  /// trailing zeros of the fraction, so `"0.50"` has two digits and two
  /// places.
  pub fn parse(raw: &str, spec: DecimalSpec) -> Result<Self, DecimalError> {
    let invalid = || DecimalError::Invalid(raw.to_owned());
    let trimmed = raw.trim();

    let (negative, unsigned) = match trimmed.as_bytes().first() {
      Some(b'-') => (true, &trimmed[1..]),
      Some(b'+') => (false, &trimmed[1..]),
      _ => (false, trimmed),
    };

    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if whole.is_empty() && fraction.is_empty() {
      return Err(invalid());
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
      return Err(invalid());
    }

    let whole = whole.trim_start_matches('0');
    let whole_len = whole.len() as u32;
    let fraction_len = fraction.len() as u32;

    if whole_len + fraction_len > spec.digits {
      return Err(DecimalError::TooManyDigits(spec.digits));
    }
    if fraction_len > spec.places {
      return Err(DecimalError::TooManyPlaces(spec.places));
    }
    if whole_len > spec.whole_digits() {
      return Err(DecimalError::TooManyWholeDigits(spec.whole_digits()));
    }

    // Pad the fraction out to the column scale; the digit limits above keep
    // the result well inside i64.
    let mut digits = String::with_capacity(spec.digits as usize);
    digits.push_str(whole);
    digits.push_str(fraction);
    for _ in fraction_len..spec.places {
      digits.push('0');
    }
    let magnitude: i64 = if digits.is_empty() {
      0
    } else {
      digits.parse().map_err(|_| invalid())?
    };

    Ok(Self::new(if negative { -magnitude } else { magnitude }, spec.places))
  }
}

impl fmt::Display for Decimal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let sign = if self.units < 0 { "-" } else { "" };
    let magnitude = self.units.unsigned_abs();
    if self.places == 0 {
      return write!(f, "{sign}{magnitude}");
    }
    let scale = 10u64.pow(self.places);
    write!(
      f,
      "{sign}{}.{:0width$}",
      magnitude / scale,
      magnitude % scale,
      width = self.places as usize,
    )
  }
}

/// Decimals travel as strings so no precision is lost in JSON clients.
impl Serialize for Decimal {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}
