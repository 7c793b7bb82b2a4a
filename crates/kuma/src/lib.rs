//! kuma: turn prefectural bear sighting bulletins into one geocoded dataset.
//!
//! This is the facade crate. It opens bulletins with kuma-parse, reads the
//! text of each source's layout, parses it with the kuma-core grammars, and
//! writes the merged, geocoded CSV.
//!
//! # Architecture
//!
//! - **kuma-core**: records, grammars, normalization and geocoding
//! - **kuma-parse**: PDF reading and the content stream interpreter
//! - **kuma** (this crate): bulletins, per-source extraction, configuration,
//!   output writers and the [`Pipeline`]
//!
//! ```no_run
//! use kuma::{Pipeline, PipelineConfig};
//!
//! let summary = Pipeline::new(PipelineConfig::default()).run()?;
//! for warning in &summary.warnings {
//!     eprintln!("{warning}");
//! }
//! # Ok::<(), kuma::KumaError>(())
//! ```

pub mod bulletin;
pub mod config;
pub mod emit;
pub mod error;
pub mod extract;
pub mod gazetteer;
pub mod page;
pub mod pipeline;

pub use kuma_core;
pub use kuma_parse;

pub use bulletin::{Bulletin, PagesIter};
pub use config::{Documents, PipelineConfig};
pub use emit::{ArtifactPaths, COMBINED_ARTIFACT, write_dataset_csv};
pub use error::KumaError;
pub use extract::{CandidateLines, SHIZUOKA_REGIONS, SourceLayout, candidate_lines};
pub use gazetteer::{GeocodeLoad, load_geocode, parse_geocode_yaml};
pub use kuma_core::{
    BBox, CanonicalRecord, Dataset, GeocodeDictionary, PipelineWarning, SourceKind, SourceRecord,
    TextOptions, WarningCode,
};
pub use page::{CroppedPage, Page};
pub use pipeline::{Pipeline, RunSummary, SourceRun, SourceSummary, extract_source, read_source};
