//! The end-to-end run: bulletins in, one geocoded CSV out.
//!
//! Sources are independent until the merge, so each is read in isolation
//! (concurrently with the `parallel` feature) and a failing source only
//! removes its own records. Only writing output can fail a run.

use std::path::PathBuf;

use kuma_core::{
    Dataset, PipelineWarning, SourceKind, SourceRecord, WarningCode, merge_sorted,
};

use crate::bulletin::Bulletin;
use crate::config::PipelineConfig;
use crate::emit::{ArtifactPaths, write_artifacts, write_dataset_csv};
use crate::error::KumaError;
use crate::extract::candidate_lines;
use crate::gazetteer::load_geocode;

/// Everything read from one source's bulletin.
#[derive(Debug, Clone)]
pub struct SourceRun {
    pub kind: SourceKind,
    /// Candidate lines in page order.
    pub lines: Vec<String>,
    /// Records matched by the source's grammar, in line order.
    pub records: Vec<SourceRecord>,
    pub warnings: Vec<PipelineWarning>,
}

impl SourceRun {
    fn empty(kind: SourceKind) -> Self {
        Self {
            kind,
            lines: Vec::new(),
            records: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn summary(&self) -> SourceSummary {
        SourceSummary {
            kind: self.kind,
            lines: self.lines.len(),
            records: self.records.len(),
        }
    }
}

/// Line and record counts for one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSummary {
    pub kind: SourceKind,
    pub lines: usize,
    pub records: usize,
}

/// Outcome of [`Pipeline::run`].
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Per-source counts, in merge order.
    pub sources: Vec<SourceSummary>,
    pub dataset: Dataset,
    pub output_path: PathBuf,
    /// Artifacts written, when an artifacts directory is configured.
    pub artifacts: Option<ArtifactPaths>,
    pub warnings: Vec<PipelineWarning>,
}

impl RunSummary {
    /// Rows written to the output CSV.
    pub fn rows(&self) -> usize {
        self.dataset.len()
    }

    /// Rows that received coordinates.
    pub fn located(&self) -> usize {
        self.dataset.located()
    }

    pub fn has_warning(&self, code: WarningCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}

/// Extract and parse one source from an opened bulletin.
pub fn extract_source(kind: SourceKind, bulletin: &Bulletin, config: &PipelineConfig) -> SourceRun {
    let layout = config.layout(kind);
    let mut candidates = candidate_lines(kind, bulletin, &layout, &config.text);
    let lines: Vec<String> = candidates.by_ref().collect();

    let mut run = SourceRun::empty(kind);
    run.warnings = candidates.take_warnings();
    for line in &lines {
        match kind.parse_line(line) {
            Some(record) => run.records.push(record),
            None => tracing::debug!(source = %kind, line = %line, "line did not match"),
        }
    }

    if run.records.is_empty() {
        let description = if lines.is_empty() {
            "no text extracted".to_string()
        } else {
            format!("{} candidate lines, none matched", lines.len())
        };
        run.warnings.push(PipelineWarning::for_source(
            WarningCode::LayoutDrift,
            kind,
            description,
        ));
    }
    run.lines = lines;
    run
}

/// Open a source's configured bulletin and extract it.
///
/// A missing or unreadable bulletin yields no records and a
/// [`WarningCode::SourceUnavailable`] warning.
pub fn read_source(kind: SourceKind, config: &PipelineConfig) -> SourceRun {
    let path = config.document_path(kind);
    let run = match Bulletin::open_file(&path) {
        Ok(bulletin) => extract_source(kind, &bulletin, config),
        Err(err) => {
            let mut run = SourceRun::empty(kind);
            run.warnings.push(PipelineWarning::for_source(
                WarningCode::SourceUnavailable,
                kind,
                err.to_string(),
            ));
            run
        }
    };
    tracing::info!(
        source = %kind,
        path = %path.display(),
        lines = run.lines.len(),
        records = run.records.len(),
        "source read"
    );
    run
}

/// A configured pipeline run.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read every source, merge, geocode and write the output CSV.
    ///
    /// # Errors
    ///
    /// Only a failure to write the output CSV is returned. Missing
    /// bulletins, unreadable pages, a missing geocode dictionary and
    /// artifacts that cannot be written are reported as warnings in the
    /// summary.
    pub fn run(&self) -> Result<RunSummary, KumaError> {
        let dates = self.config.date_normalizer();
        let mut warnings = Vec::new();
        let mut sources = Vec::with_capacity(SourceKind::ALL.len());
        let mut canonical = Vec::with_capacity(SourceKind::ALL.len());
        let mut per_source = Vec::with_capacity(SourceKind::ALL.len());

        for run in self.read_sources() {
            sources.push(run.summary());
            warnings.extend(run.warnings);
            canonical.push(
                run.records
                    .iter()
                    .map(|record| record.to_canonical(&dates))
                    .collect::<Vec<_>>(),
            );
            per_source.push((run.kind, run.records));
        }

        let geocode = load_geocode(&self.config.geocode_path);
        warnings.extend(geocode.warnings);
        for warning in &warnings {
            tracing::warn!(code = %warning.code, "{warning}");
        }

        let merged = merge_sorted(canonical);
        let artifacts = match &self.config.artifacts_dir {
            Some(dir) => match write_artifacts(dir, &per_source, &merged) {
                Ok(paths) => Some(paths),
                Err(err) => {
                    let warning = PipelineWarning::new(
                        WarningCode::ArtifactWriteFailed,
                        format!("{}: {err}", dir.display()),
                    );
                    tracing::warn!(code = %warning.code, "{warning}");
                    warnings.push(warning);
                    None
                }
            },
            None => None,
        };

        let dataset = Dataset::geocode_sorted(merged, &geocode.dictionary);
        write_dataset_csv(&self.config.output_path, &dataset)?;
        tracing::info!(
            path = %self.config.output_path.display(),
            rows = dataset.len(),
            located = dataset.located(),
            "dataset written"
        );

        Ok(RunSummary {
            sources,
            dataset,
            output_path: self.config.output_path.clone(),
            artifacts,
            warnings,
        })
    }

    /// Read all sources, returned in merge order.
    #[cfg(feature = "parallel")]
    fn read_sources(&self) -> Vec<SourceRun> {
        use rayon::prelude::*;

        SourceKind::ALL
            .into_par_iter()
            .map(|kind| read_source(kind, &self.config))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn read_sources(&self) -> Vec<SourceRun> {
        SourceKind::ALL
            .into_iter()
            .map(|kind| read_source(kind, &self.config))
            .collect()
    }
}
