//! Geocode dictionary and the geocode stage.

use std::collections::HashMap;

use crate::address::clean_address;
use crate::alias::resolve_alias;
use crate::record::{CanonicalRecord, Coordinate, GeocodedRecord};

/// Sub-area key holding a locality's coordinate for places not listed
/// individually.
pub const FALLBACK_SUB_AREA: &str = "以下に掲載がない場合";

type SubAreas = HashMap<String, Coordinate>;

/// Region → locality → sub-area → coordinate.
///
/// Built once per run and read-only afterwards. Localities are keyed by
/// their county-qualified names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeocodeDictionary {
    regions: HashMap<String, HashMap<String, SubAreas>>,
}

impl GeocodeDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one sub-area coordinate.
    pub fn insert(
        &mut self,
        region: impl Into<String>,
        locality: impl Into<String>,
        sub_area: impl Into<String>,
        coordinate: Coordinate,
    ) {
        self.regions
            .entry(region.into())
            .or_default()
            .entry(locality.into())
            .or_default()
            .insert(sub_area.into(), coordinate);
    }

    /// Number of sub-area entries across all regions.
    pub fn len(&self) -> usize {
        self.regions
            .values()
            .flat_map(HashMap::values)
            .map(HashMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Three-tier lookup: the exact sub-area, then the locality's
    /// [`FALLBACK_SUB_AREA`], then nothing.
    pub fn lookup(&self, region: &str, locality: &str, place: &str) -> Option<Coordinate> {
        let sub_areas = self.regions.get(region)?.get(locality)?;
        sub_areas
            .get(place)
            .or_else(|| sub_areas.get(FALLBACK_SUB_AREA))
            .copied()
    }

    /// Clean the address, qualify the locality, then look it up.
    pub fn resolve(&self, region: &str, locality: &str, place: &str) -> Option<Coordinate> {
        let (locality, place) = clean_address(locality, place);
        let locality = resolve_alias(region, &locality);
        self.lookup(region, locality, &place)
    }

    /// Attach coordinates to a record. The record itself is kept unchanged,
    /// and a miss leaves `coordinate` empty.
    pub fn geocode(&self, record: CanonicalRecord) -> GeocodedRecord {
        let coordinate = self.resolve(&record.region, &record.locality, &record.place);
        GeocodedRecord { record, coordinate }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::SightingDate;

    fn coord(longitude: f64, latitude: f64) -> Coordinate {
        Coordinate::new(longitude, latitude).unwrap()
    }

    fn record(region: &str, locality: &str, place: &str) -> CanonicalRecord {
        CanonicalRecord {
            region: region.to_string(),
            date: SightingDate::Unknown,
            locality: locality.to_string(),
            place: place.to_string(),
        }
    }

    #[test]
    fn exact_match_wins_over_fallback() {
        let mut dict = GeocodeDictionary::new();
        dict.insert("静岡県", "静岡市", "葵区", coord(138.38, 34.97));
        dict.insert("静岡県", "静岡市", FALLBACK_SUB_AREA, coord(138.0, 35.0));
        assert_eq!(dict.lookup("静岡県", "静岡市", "葵区"), Some(coord(138.38, 34.97)));
    }

    #[test]
    fn fallback_used_when_sub_area_missing() {
        let mut dict = GeocodeDictionary::new();
        dict.insert("静岡県", "静岡市", FALLBACK_SUB_AREA, coord(138.0, 35.0));
        assert_eq!(dict.lookup("静岡県", "静岡市", "清水区"), Some(coord(138.0, 35.0)));
    }

    #[test]
    fn miss_without_fallback_is_none() {
        let mut dict = GeocodeDictionary::new();
        dict.insert("静岡県", "静岡市", "葵区", coord(138.38, 34.97));
        assert_eq!(dict.lookup("静岡県", "静岡市", "清水区"), None);
        assert_eq!(dict.lookup("静岡県", "浜松市", "葵区"), None);
        assert_eq!(dict.lookup("山梨県", "静岡市", "葵区"), None);
    }

    #[test]
    fn resolve_cleans_and_qualifies_before_lookup() {
        let mut dict = GeocodeDictionary::new();
        dict.insert("神奈川県", "足柄上郡山北町", "中川", coord(139.05, 35.42));
        assert_eq!(
            dict.resolve("神奈川県", "山北町", "中川付近"),
            Some(coord(139.05, 35.42))
        );
    }

    #[test]
    fn geocode_keeps_uncleaned_fields() {
        let mut dict = GeocodeDictionary::new();
        dict.insert("神奈川県", "相模原市緑区", "青根", coord(139.1, 35.5));
        let geocoded = dict.geocode(record("神奈川県", "相模原市", "緑区青根地区"));
        assert_eq!(geocoded.record.locality, "相模原市");
        assert_eq!(geocoded.record.place, "緑区青根地区");
        assert_eq!(geocoded.coordinate, Some(coord(139.1, 35.5)));
    }

    #[test]
    fn geocode_never_drops_a_miss() {
        let dict = GeocodeDictionary::new();
        for (locality, place) in [("", ""), ("・", "（"), ("???", "🐻"), ("市", "町村")] {
            let geocoded = dict.geocode(record("静岡県", locality, place));
            assert_eq!(geocoded.coordinate, None);
            assert_eq!(geocoded.longitude(), None);
            assert_eq!(geocoded.latitude(), None);
        }
    }

    #[test]
    fn len_counts_sub_areas() {
        let mut dict = GeocodeDictionary::new();
        assert!(dict.is_empty());
        dict.insert("静岡県", "静岡市", "葵区", coord(138.38, 34.97));
        dict.insert("静岡県", "静岡市", "清水区", coord(138.48, 35.01));
        dict.insert("山梨県", "甲府市", FALLBACK_SUB_AREA, coord(138.56, 35.66));
        assert_eq!(dict.len(), 3);
    }
}
