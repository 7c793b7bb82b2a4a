use std::path::Path;

use kuma::PipelineConfig;

/// Load the configuration file if given, else the defaults.
///
/// Returns `Err(1)` with a message printed to stderr if the file cannot be
/// read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig, i32> {
    match path {
        Some(path) => PipelineConfig::load(path).map_err(|e| {
            eprintln!("Error: {e}");
            1
        }),
        None => Ok(PipelineConfig::default()),
    }
}
