//! kuma-core: backend-independent types and algorithms for the sighting
//! pipeline.
//!
//! This crate holds everything that does not touch a PDF: positioned
//! characters and line grouping, the three bulletin grammars, date and
//! record normalization, address cleaning, alias resolution, the geocode
//! dictionary, and the merged dataset. All operations here are total;
//! degraded conditions are reported as [`PipelineWarning`]s by the caller.

pub mod address;
pub mod alias;
pub mod dataset;
pub mod date;
pub mod geocode;
pub mod geometry;
pub mod grammar;
pub mod normalize;
pub mod record;
pub mod source;
pub mod text;
pub mod warning;

pub use address::clean_address;
pub use alias::resolve_alias;
pub use dataset::{Dataset, merge_sorted};
pub use date::{DEFAULT_ASSUMED_YEAR, DateNormalizer, SightingDate};
pub use geocode::{FALLBACK_SUB_AREA, GeocodeDictionary};
pub use geometry::{BBox, Matrix};
pub use normalize::split_locality;
pub use record::{
    CanonicalRecord, Coordinate, DatasetRow, GeocodedRecord, KanagawaRecord, ShizuokaRecord,
    SourceRecord, YamanashiRecord,
};
pub use source::SourceKind;
pub use text::{Char, TextOptions, chars_to_lines, chars_within};
pub use warning::{PipelineWarning, WarningCode};
