//! Normalization of bulletin date fragments into calendar dates.
//!
//! Two grammars occur in the bulletins: year-qualified slash dates
//! (`2024/6/4`) and month-day dates without a year (`6月19日`). Both map
//! into [`SightingDate`]; anything else maps to [`SightingDate::Unknown`].

use std::fmt;

use chrono::NaiveDate;

/// Year assumed for month-day fragments when none is configured.
pub const DEFAULT_ASSUMED_YEAR: i32 = 2024;

/// A sighting date, or the explicit marker for an unparseable fragment.
///
/// Ordering places every `Unknown` after every `Known` date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SightingDate {
    Known(NaiveDate),
    Unknown,
}

impl SightingDate {
    /// The calendar date, if known.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            SightingDate::Known(date) => Some(*date),
            SightingDate::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, SightingDate::Known(_))
    }
}

impl From<Option<NaiveDate>> for SightingDate {
    fn from(date: Option<NaiveDate>) -> Self {
        date.map_or(SightingDate::Unknown, SightingDate::Known)
    }
}

/// ISO `YYYY-MM-DD`, or the empty string for `Unknown`.
impl fmt::Display for SightingDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SightingDate::Known(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            SightingDate::Unknown => Ok(()),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SightingDate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_date().serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SightingDate {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<NaiveDate>::deserialize(deserializer).map(SightingDate::from)
    }
}

/// Converts date fragments from any source into [`SightingDate`].
///
/// Total: every input maps to a date or to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateNormalizer {
    /// Year prefixed to month-day fragments. Not derived from the bulletin,
    /// so fragments from a bulletin spanning New Year land in the wrong year.
    pub assumed_year: i32,
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self {
            assumed_year: DEFAULT_ASSUMED_YEAR,
        }
    }
}

impl DateNormalizer {
    pub fn new(assumed_year: i32) -> Self {
        Self { assumed_year }
    }

    pub fn normalize(&self, fragment: &str) -> SightingDate {
        if fragment.contains('/') {
            return parse_slash_date(fragment);
        }
        if fragment.contains('月') && fragment.contains('日') {
            let slashed = format!("{}年{}", self.assumed_year, fragment)
                .replace(['年', '月'], "/")
                .replace('日', "");
            return parse_slash_date(&slashed);
        }
        SightingDate::Unknown
    }
}

/// `year/month/day` with exactly three integer fields.
fn parse_slash_date(fragment: &str) -> SightingDate {
    let parts: Vec<&str> = fragment.split('/').map(str::trim).collect();
    let [year, month, day] = parts.as_slice() else {
        return SightingDate::Unknown;
    };
    let (Ok(year), Ok(month), Ok(day)) = (year.parse(), month.parse(), day.parse()) else {
        return SightingDate::Unknown;
    };
    NaiveDate::from_ymd_opt(year, month, day).into()
}
