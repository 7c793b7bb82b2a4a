use std::path::Path;

use kuma::{Bulletin, SourceKind, extract_source};

use crate::shared::load_config;

pub fn run(source: SourceKind, file: &Path, records: bool, config: Option<&Path>) -> Result<(), i32> {
    let config = load_config(config)?;
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }
    let bulletin = Bulletin::open_file(file).map_err(|e| {
        eprintln!("Error: failed to open bulletin: {e}");
        1
    })?;

    let run = extract_source(source, &bulletin, &config);
    if records {
        for record in &run.records {
            let line = serde_json::to_string(record).map_err(|e| {
                eprintln!("Error: {e}");
                1
            })?;
            println!("{line}");
        }
    } else {
        for line in &run.lines {
            println!("{line}");
        }
    }
    for warning in &run.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(())
}
