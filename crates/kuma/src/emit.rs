//! Output writers.
//!
//! Every file is written to a temporary file in its destination directory
//! and renamed over the target only once complete, so readers never see a
//! truncated dataset.

use std::io::Write;
use std::path::{Path, PathBuf};

use kuma_core::{CanonicalRecord, Dataset, SourceKind, SourceRecord};
use tempfile::NamedTempFile;

use crate::error::KumaError;

const DATASET_HEADER: [&str; 6] = ["region", "date", "locality", "place", "longitude", "latitude"];
const COMBINED_HEADER: [&str; 4] = ["region", "date", "locality", "place"];

/// Name of the merged, pre-geocoding CSV artifact.
pub const COMBINED_ARTIFACT: &str = "bear_sightings_combined.csv";

/// File name of a source's JSON artifact, e.g. `bear_sightings_kanagawa.json`.
pub fn source_artifact_name(kind: SourceKind) -> String {
    format!("bear_sightings_{}.json", kind.slug())
}

fn write_atomically<F>(path: &Path, write: F) -> Result<(), KumaError>
where
    F: FnOnce(&mut std::fs::File) -> Result<(), KumaError>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| KumaError::io(dir, e))?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| KumaError::io(dir, e))?;

    write(tmp.as_file_mut())?;
    tmp.as_file_mut()
        .flush()
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| KumaError::io(tmp.path(), e))?;

    tmp.persist(path).map_err(|source| KumaError::Persist {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// A CSV writer that has already written `header`, so empty outputs still
/// carry one.
fn csv_writer<'f>(
    file: &'f mut std::fs::File,
    header: &[&str],
) -> Result<csv::Writer<&'f mut std::fs::File>, KumaError> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(header)?;
    Ok(writer)
}

/// Write the final dataset as CSV:
/// `region,date,locality,place,longitude,latitude`.
pub fn write_dataset_csv(path: &Path, dataset: &Dataset) -> Result<(), KumaError> {
    write_atomically(path, |file| {
        let mut writer = csv_writer(file, &DATASET_HEADER)?;
        for row in dataset.rows() {
            writer.serialize(row)?;
        }
        writer.flush().map_err(|e| KumaError::io(path, e))
    })
}

/// Write merged canonical records, before geocoding, as CSV.
pub fn write_combined_csv(path: &Path, records: &[CanonicalRecord]) -> Result<(), KumaError> {
    write_atomically(path, |file| {
        let mut writer = csv_writer(file, &COMBINED_HEADER)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush().map_err(|e| KumaError::io(path, e))
    })
}

/// Write one source's parsed records as pretty JSON.
pub fn write_source_json(path: &Path, records: &[SourceRecord]) -> Result<(), KumaError> {
    write_atomically(path, |file| {
        serde_json::to_writer_pretty(&mut *file, records)?;
        file.write_all(b"\n").map_err(|e| KumaError::io(path, e))
    })
}

/// Paths written by [`write_artifacts`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtifactPaths {
    pub sources: Vec<PathBuf>,
    pub combined: Option<PathBuf>,
}

/// Write the per-source JSON artifacts and the combined CSV into `dir`.
pub fn write_artifacts(
    dir: &Path,
    per_source: &[(SourceKind, Vec<SourceRecord>)],
    merged: &[CanonicalRecord],
) -> Result<ArtifactPaths, KumaError> {
    let mut paths = ArtifactPaths::default();
    for (kind, records) in per_source {
        let path = dir.join(source_artifact_name(*kind));
        write_source_json(&path, records)?;
        paths.sources.push(path);
    }
    let combined = dir.join(COMBINED_ARTIFACT);
    write_combined_csv(&combined, merged)?;
    paths.combined = Some(combined);
    Ok(paths)
}
