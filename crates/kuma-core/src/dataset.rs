//! Merging per-source records into the final, date-ordered dataset.

use crate::geocode::GeocodeDictionary;
use crate::record::{CanonicalRecord, DatasetRow, GeocodedRecord};

/// Concatenate per-source record lists in the given order and sort by date.
///
/// The sort is stable, so records sharing a date keep their input order.
/// Unknown dates sort after every known date.
pub fn merge_sorted<I>(sources: I) -> Vec<CanonicalRecord>
where
    I: IntoIterator<Item = Vec<CanonicalRecord>>,
{
    let mut merged: Vec<CanonicalRecord> = sources.into_iter().flatten().collect();
    merged.sort_by_key(|record| record.date);
    merged
}

/// The consolidated, geocoded dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<GeocodedRecord>,
}

impl Dataset {
    /// Merge, sort and geocode. Every input record appears in the output.
    pub fn build<I>(sources: I, dictionary: &GeocodeDictionary) -> Self
    where
        I: IntoIterator<Item = Vec<CanonicalRecord>>,
    {
        Self::geocode_sorted(merge_sorted(sources), dictionary)
    }

    /// Geocode records that are already merged and sorted, keeping their order.
    pub fn geocode_sorted(sorted: Vec<CanonicalRecord>, dictionary: &GeocodeDictionary) -> Self {
        let records = sorted
            .into_iter()
            .map(|record| dictionary.geocode(record))
            .collect();
        Self { records }
    }

    pub fn records(&self) -> &[GeocodedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Flat output rows in dataset order.
    pub fn rows(&self) -> impl Iterator<Item = DatasetRow> + '_ {
        self.records.iter().map(DatasetRow::from)
    }

    /// Records whose coordinate resolved.
    pub fn located(&self) -> usize {
        self.records.iter().filter(|r| r.coordinate.is_some()).count()
    }
}
