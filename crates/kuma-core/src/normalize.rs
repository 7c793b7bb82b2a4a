//! Mapping of source records into the canonical shape.

use crate::date::DateNormalizer;
use crate::record::{CanonicalRecord, SourceRecord};

/// Characters that end a municipality name: city, town, village.
pub const LOCALITY_SUFFIXES: [char; 3] = ['市', '町', '村'];

/// Split a run-together address at the earliest locality suffix.
///
/// Everything up to and including the suffix is the locality; the trimmed
/// remainder is the place. Without a suffix the locality is empty and the
/// whole string is the place.
pub fn split_locality(raw: &str) -> (String, String) {
    match raw.find(LOCALITY_SUFFIXES) {
        Some(idx) => {
            let end = idx + raw[idx..].chars().next().map_or(0, char::len_utf8);
            (raw[..end].to_string(), raw[end..].trim().to_string())
        }
        None => (String::new(), raw.to_string()),
    }
}

impl SourceRecord {
    /// Normalize into a [`CanonicalRecord`], resolving the date with `dates`.
    pub fn to_canonical(&self, dates: &DateNormalizer) -> CanonicalRecord {
        let (locality, place) = match self {
            SourceRecord::Kanagawa(r) => split_locality(&r.raw_place),
            SourceRecord::Yamanashi(r) => (r.city.clone(), r.place.clone()),
            SourceRecord::Shizuoka(r) => (r.municipality.clone(), r.place.clone()),
        };
        CanonicalRecord {
            region: self.kind().region().to_string(),
            date: dates.normalize(self.date_fragment()),
            locality,
            place,
        }
    }
}
