//! Non-fatal diagnostics collected during a pipeline run.
//!
//! Nothing on the per-record path aborts a run. Conditions that degrade the
//! result (a missing bulletin, an unreadable page, a missing geocode file)
//! are recorded as [`PipelineWarning`]s and carried alongside the output.

use std::fmt;

use crate::source::SourceKind;

/// Machine-readable category of a [`PipelineWarning`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WarningCode {
    /// A bulletin was missing or could not be opened; the source yields nothing.
    SourceUnavailable,
    /// A single page could not be interpreted and was skipped.
    PageSkipped,
    /// A present bulletin produced no parseable records.
    LayoutDrift,
    /// The geocode configuration was missing or corrupt; no coordinates resolve.
    GeocodeConfigUnavailable,
    /// A geocode entry had a missing or non-finite coordinate and was ignored.
    InvalidCoordinate,
    /// Debugging artifacts could not be written; the dataset is unaffected.
    ArtifactWriteFailed,
}

impl WarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::SourceUnavailable => "SOURCE_UNAVAILABLE",
            WarningCode::PageSkipped => "PAGE_SKIPPED",
            WarningCode::LayoutDrift => "LAYOUT_DRIFT",
            WarningCode::GeocodeConfigUnavailable => "GEOCODE_CONFIG_UNAVAILABLE",
            WarningCode::InvalidCoordinate => "INVALID_COORDINATE",
            WarningCode::ArtifactWriteFailed => "ARTIFACT_WRITE_FAILED",
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal condition observed while running the pipeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipelineWarning {
    /// Machine-readable warning code.
    pub code: WarningCode,
    /// Human-readable description of the warning.
    pub description: String,
    /// Source the warning concerns, if it is source-specific.
    pub source: Option<SourceKind>,
}

impl PipelineWarning {
    /// Create a warning that is not tied to a particular source.
    pub fn new(code: WarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            source: None,
        }
    }

    /// Create a warning concerning one source.
    pub fn for_source(code: WarningCode, source: SourceKind, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            source: Some(source),
        }
    }
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.code)?;
        if let Some(source) = self.source {
            write!(f, " {source}:")?;
        }
        write!(f, " {}", self.description)
    }
}
