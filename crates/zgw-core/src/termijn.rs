//! Calendar durations (`archiefactietermijn`, `procestermijn`).
//!
//! Stored and exchanged as ISO 8601 durations (`P10Y`, `P1Y6M`, `P2W`).
//! Years and months advance by calendar month, clamping to the end of the
//! month (`2020-02-29 + P1Y = 2021-02-28`); weeks and days by days.

use std::{fmt, str::FromStr};

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Termijn {
  pub years:  u32,
  pub months: u32,
  pub days:   u32,
}

impl Termijn {
  pub const fn years(years: u32) -> Self {
    Self { years, months: 0, days: 0 }
  }

  pub const fn days(days: u32) -> Self {
    Self { years: 0, months: 0, days }
  }

  pub fn is_zero(&self) -> bool { *self == Self::default() }

  /// `date + self`, month-clamped.
  pub fn add_to(&self, date: NaiveDate) -> Result<NaiveDate> {
    let out_of_range = || Error::DateOutOfRange {
      date,
      termijn: self.to_string(),
    };
    let months = self
      .years
      .checked_mul(12)
      .and_then(|m| m.checked_add(self.months))
      .ok_or_else(out_of_range)?;

    date
      .checked_add_months(Months::new(months))
      .and_then(|d| d.checked_add_days(Days::new(u64::from(self.days))))
      .ok_or_else(out_of_range)
  }
}

impl FromStr for Termijn {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let invalid = |reason| Error::InvalidTermijn {
      value: s.to_owned(),
      reason,
    };

    let body = s.strip_prefix('P').ok_or_else(|| invalid("must start with P"))?;
    if body.is_empty() {
      return Err(invalid("no components"));
    }
    if body.contains('T') {
      return Err(invalid("time components are not supported"));
    }

    let mut termijn = Termijn::default();
    let mut digits = String::new();
    // Designators must appear in Y, M, W, D order, each at most once.
    let mut last_rank = 0;

    for ch in body.chars() {
      if ch.is_ascii_digit() {
        digits.push(ch);
        continue;
      }
      let rank = match ch {
        'Y' => 1,
        'M' => 2,
        'W' => 3,
        'D' => 4,
        _ => return Err(invalid("unknown designator")),
      };
      if rank <= last_rank {
        return Err(invalid("designators out of order"));
      }
      last_rank = rank;

      let value: u32 = digits
        .parse()
        .map_err(|_| invalid("designator without a number"))?;
      digits.clear();

      match ch {
        'Y' => termijn.years = value,
        'M' => termijn.months = value,
        'W' => {
          termijn.days = value
            .checked_mul(7)
            .ok_or_else(|| invalid("too many weeks"))?;
        }
        _ => {
          termijn.days = termijn
            .days
            .checked_add(value)
            .ok_or_else(|| invalid("too many days"))?;
        }
      }
    }

    if !digits.is_empty() {
      return Err(invalid("trailing number without designator"));
    }
    Ok(termijn)
  }
}

impl fmt::Display for Termijn {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_zero() {
      return f.write_str("P0D");
    }
    f.write_str("P")?;
    if self.years > 0 {
      write!(f, "{}Y", self.years)?;
    }
    if self.months > 0 {
      write!(f, "{}M", self.months)?;
    }
    if self.days > 0 {
      write!(f, "{}D", self.days)?;
    }
    Ok(())
  }
}

impl Serialize for Termijn {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for Termijn {
  fn deserialize<D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
  }
}
