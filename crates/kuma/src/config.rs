//! Pipeline configuration.
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! describes the standard run: the three bulletins in the working
//! directory, `areas_with_coords.yml` for coordinates, and
//! `bear_sightings_with_coords.csv` as output.

use std::path::{Path, PathBuf};

use kuma_core::{BBox, DEFAULT_ASSUMED_YEAR, DateNormalizer, SourceKind, TextOptions};
use serde::{Deserialize, Serialize};

use crate::error::KumaError;
use crate::extract::{SHIZUOKA_REGIONS, SourceLayout};

/// Bulletin file names, resolved against [`PipelineConfig::input_dir`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Documents {
    pub kanagawa: PathBuf,
    pub yamanashi: PathBuf,
    pub shizuoka: PathBuf,
}

impl Default for Documents {
    fn default() -> Self {
        Self {
            kanagawa: PathBuf::from("kuma_r6_kanagawa.pdf"),
            yamanashi: PathBuf::from("kuma_r6_yamanashi.pdf"),
            shizuoka: PathBuf::from("kuma_r6_shizuoka.pdf"),
        }
    }
}

impl Documents {
    pub fn get(&self, kind: SourceKind) -> &Path {
        match kind {
            SourceKind::Kanagawa => &self.kanagawa,
            SourceKind::Yamanashi => &self.yamanashi,
            SourceKind::Shizuoka => &self.shizuoka,
        }
    }
}

/// Settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    pub documents: Documents,
    /// YAML geocode dictionary.
    pub geocode_path: PathBuf,
    /// Final CSV dataset.
    pub output_path: PathBuf,
    /// Directory for per-source JSON and the combined CSV; `None` disables them.
    pub artifacts_dir: Option<PathBuf>,
    /// Year given to month-day dates. Not derived from the bulletin.
    pub assumed_year: i32,
    pub shizuoka_regions: Vec<BBox>,
    pub text: TextOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            documents: Documents::default(),
            geocode_path: PathBuf::from("areas_with_coords.yml"),
            output_path: PathBuf::from("bear_sightings_with_coords.csv"),
            artifacts_dir: None,
            assumed_year: DEFAULT_ASSUMED_YEAR,
            shizuoka_regions: SHIZUOKA_REGIONS.to_vec(),
            text: TextOptions::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse a YAML configuration; absent fields keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        // an empty document deserializes as unit, not as an empty map
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Read a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KumaError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| KumaError::io(path, e))?;
        Self::from_yaml_str(&yaml).map_err(|source| KumaError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Full path of a source's bulletin.
    pub fn document_path(&self, kind: SourceKind) -> PathBuf {
        self.input_dir.join(self.documents.get(kind))
    }

    pub fn layout(&self, kind: SourceKind) -> SourceLayout {
        SourceLayout::for_source(kind, &self.shizuoka_regions)
    }

    pub fn date_normalizer(&self) -> DateNormalizer {
        DateNormalizer::new(self.assumed_year)
    }
}
