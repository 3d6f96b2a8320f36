use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const KEY_FORMAT: &str = "%Y%m%d";

/// A calendar day rendered as `YYYYMMDD`.
///
/// Used both as the search window for one request and as the name of the
/// collection the day's articles are written to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(String);

impl DateKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format(KEY_FORMAT).to_string())
    }

    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidDateKey(s.to_string()));
        }

        NaiveDate::parse_from_str(s, KEY_FORMAT)
            .map(Self::from_date)
            .map_err(|_| Error::InvalidDateKey(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn date(&self) -> NaiveDate {
        // constructed only from a valid date
        NaiveDate::parse_from_str(&self.0, KEY_FORMAT).unwrap_or_default()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DateKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.0
    }
}

/// Every calendar day from `begin` to `end`, both inclusive.
///
/// A reversed range is rejected instead of looping forever.
pub fn date_range(begin: NaiveDate, end: NaiveDate) -> Result<Vec<DateKey>> {
    if begin > end {
        return Err(Error::InvalidRange { begin, end });
    }

    Ok(begin
        .iter_days()
        .take_while(|day| *day <= end)
        .map(DateKey::from_date)
        .collect())
}
