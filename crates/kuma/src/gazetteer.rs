//! Loader for the YAML geocode dictionary.
//!
//! The document maps `region → locality → sub-area → {longitude, latitude}`.
//! Loading never fails the run: an unreadable file yields an empty
//! dictionary, and entries with a missing or non-finite coordinate are
//! dropped, each with a warning.

use std::collections::BTreeMap;
use std::path::Path;

use kuma_core::{Coordinate, GeocodeDictionary, PipelineWarning, WarningCode};
use serde_yaml::Value;

type RawDictionary = BTreeMap<String, BTreeMap<String, BTreeMap<String, Value>>>;

/// A loaded dictionary and the warnings raised while loading it.
#[derive(Debug, Clone, Default)]
pub struct GeocodeLoad {
    pub dictionary: GeocodeDictionary,
    pub warnings: Vec<PipelineWarning>,
}

/// Parse a geocode dictionary from YAML text.
pub fn parse_geocode_yaml(yaml: &str) -> Result<GeocodeLoad, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(GeocodeLoad::default());
    }
    let raw: RawDictionary = serde_yaml::from_str(yaml)?;

    let mut load = GeocodeLoad::default();
    for (region, localities) in raw {
        for (locality, sub_areas) in localities {
            for (sub_area, entry) in sub_areas {
                match coordinate(&entry) {
                    Some(coordinate) => {
                        load.dictionary
                            .insert(region.clone(), locality.clone(), sub_area, coordinate);
                    }
                    None => load.warnings.push(PipelineWarning::new(
                        WarningCode::InvalidCoordinate,
                        format!("{region}/{locality}/{sub_area}: missing or non-finite coordinate"),
                    )),
                }
            }
        }
    }
    Ok(load)
}

/// Load the geocode dictionary from `path`.
///
/// A missing or malformed file produces an empty dictionary and a
/// [`WarningCode::GeocodeConfigUnavailable`] warning.
pub fn load_geocode(path: &Path) -> GeocodeLoad {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|yaml| parse_geocode_yaml(&yaml).map_err(|e| e.to_string()));
    match parsed {
        Ok(load) => {
            tracing::info!(path = %path.display(), entries = load.dictionary.len(), "loaded geocode dictionary");
            load
        }
        Err(reason) => GeocodeLoad {
            dictionary: GeocodeDictionary::new(),
            warnings: vec![PipelineWarning::new(
                WarningCode::GeocodeConfigUnavailable,
                format!("{}: {reason}; no coordinates will resolve", path.display()),
            )],
        },
    }
}

fn coordinate(entry: &Value) -> Option<Coordinate> {
    let longitude = entry.get("longitude")?.as_f64()?;
    let latitude = entry.get("latitude")?.as_f64()?;
    Coordinate::new(longitude, latitude)
}
