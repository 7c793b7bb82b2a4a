//! Record shapes flowing through the pipeline.
//!
//! Each source grammar produces its own [`SourceRecord`] variant. The record
//! normalizer maps those into the shared [`CanonicalRecord`], and the geocode
//! stage attaches coordinates to produce a [`GeocodedRecord`].

use crate::date::SightingDate;
use crate::source::SourceKind;

/// A row of the tabular (Kanagawa) bulletin.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KanagawaRecord {
    /// Month-day fragment, e.g. `6月19日`.
    pub date_fragment: String,
    pub time: String,
    pub head_count: String,
    pub status: String,
    /// Locality and sub-area run together, split later by the normalizer.
    pub raw_place: String,
    pub area_type: String,
    pub observation_type: String,
}

/// A sentence of the prose (Yamanashi) bulletin.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YamanashiRecord {
    /// Year-qualified slash fragment, e.g. `2024/6/4`.
    pub date_fragment: String,
    pub time: String,
    pub city: String,
    pub place: String,
    /// Digits only, or `不明` when the line carries no count.
    pub head_count: String,
}

/// A line of the positional (Shizuoka) bulletin.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShizuokaRecord {
    /// Running number, possibly hyphenated (`12-3`).
    pub sequence_number: String,
    pub date_fragment: String,
    pub municipality: String,
    pub place: String,
}

/// The direct result of one successful grammar match.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum SourceRecord {
    Kanagawa(KanagawaRecord),
    Yamanashi(YamanashiRecord),
    Shizuoka(ShizuokaRecord),
}

impl SourceRecord {
    /// The source whose grammar produced this record.
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceRecord::Kanagawa(_) => SourceKind::Kanagawa,
            SourceRecord::Yamanashi(_) => SourceKind::Yamanashi,
            SourceRecord::Shizuoka(_) => SourceKind::Shizuoka,
        }
    }

    /// The unparsed date fragment.
    pub fn date_fragment(&self) -> &str {
        match self {
            SourceRecord::Kanagawa(r) => &r.date_fragment,
            SourceRecord::Yamanashi(r) => &r.date_fragment,
            SourceRecord::Shizuoka(r) => &r.date_fragment,
        }
    }
}

/// Source-independent sighting: region, date, locality and place.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CanonicalRecord {
    /// One of the three fixed prefecture literals.
    pub region: String,
    pub date: SightingDate,
    pub locality: String,
    pub place: String,
}

/// A point in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    /// Returns `None` unless both components are finite.
    pub fn new(longitude: f64, latitude: f64) -> Option<Self> {
        (longitude.is_finite() && latitude.is_finite()).then_some(Self {
            longitude,
            latitude,
        })
    }
}

/// A canonical record with its resolved coordinate.
///
/// `coordinate` is `None` when the lookup missed; longitude and latitude are
/// therefore always both present or both absent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeocodedRecord {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub record: CanonicalRecord,
    pub coordinate: Option<Coordinate>,
}

impl GeocodedRecord {
    pub fn longitude(&self) -> Option<f64> {
        self.coordinate.map(|c| c.longitude)
    }

    pub fn latitude(&self) -> Option<f64> {
        self.coordinate.map(|c| c.latitude)
    }
}

/// One flat output row: `region,date,locality,place,longitude,latitude`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DatasetRow {
    pub region: String,
    /// ISO date, empty when unknown.
    pub date: String,
    pub locality: String,
    pub place: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

impl From<&GeocodedRecord> for DatasetRow {
    fn from(geocoded: &GeocodedRecord) -> Self {
        let record = &geocoded.record;
        Self {
            region: record.region.clone(),
            date: record.date.to_string(),
            locality: record.locality.clone(),
            place: record.place.clone(),
            longitude: geocoded.longitude(),
            latitude: geocoded.latitude(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn coordinate_rejects_non_finite() {
        assert!(Coordinate::new(139.1, 35.4).is_some());
        assert!(Coordinate::new(f64::NAN, 35.4).is_none());
        assert!(Coordinate::new(139.1, f64::INFINITY).is_none());
    }

    #[test]
    fn dataset_row_from_geocoded() {
        let geocoded = GeocodedRecord {
            record: CanonicalRecord {
                region: "山梨県".to_string(),
                date: SightingDate::Known(NaiveDate::from_ymd_opt(2024, 6, 4).unwrap()),
                locality: "甲府市".to_string(),
                place: "○○町".to_string(),
            },
            coordinate: None,
        };
        let row = DatasetRow::from(&geocoded);
        assert_eq!(row.date, "2024-06-04");
        assert_eq!(row.longitude, None);
        assert_eq!(row.latitude, None);
    }

    #[test]
    fn source_record_reports_kind() {
        let record = SourceRecord::Shizuoka(ShizuokaRecord {
            sequence_number: "1".to_string(),
            date_fragment: "5月2日".to_string(),
            municipality: "浜松市".to_string(),
            place: "天竜区".to_string(),
        });
        assert_eq!(record.kind(), SourceKind::Shizuoka);
        assert_eq!(record.date_fragment(), "5月2日");
    }
}
