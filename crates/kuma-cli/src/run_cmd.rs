use kuma::{Pipeline, RunSummary};

use crate::cli::{RunArgs, SummaryFormat};
use crate::shared::load_config;

pub fn run(args: RunArgs) -> Result<(), i32> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(dir) = args.input_dir {
        config.input_dir = dir;
    }
    if let Some(path) = args.geocode {
        config.geocode_path = path;
    }
    if let Some(path) = args.output {
        config.output_path = path;
    }
    if let Some(dir) = args.artifacts_dir {
        config.artifacts_dir = Some(dir);
    }
    if let Some(year) = args.year {
        config.assumed_year = year;
    }

    let summary = Pipeline::new(config).run().map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    match args.format {
        SummaryFormat::Text => print_text(&summary),
        SummaryFormat::Json => print_json(&summary),
    }
    Ok(())
}

fn print_text(summary: &RunSummary) {
    for source in &summary.sources {
        println!(
            "{:<10} {:>5} lines {:>5} records",
            source.kind, source.lines, source.records
        );
    }
    println!(
        "wrote {} rows ({} located) to {}",
        summary.rows(),
        summary.located(),
        summary.output_path.display()
    );
    for warning in &summary.warnings {
        println!("warning: {warning}");
    }
}

fn print_json(summary: &RunSummary) {
    let sources: Vec<_> = summary
        .sources
        .iter()
        .map(|s| {
            serde_json::json!({
                "source": s.kind,
                "lines": s.lines,
                "records": s.records,
            })
        })
        .collect();
    let obj = serde_json::json!({
        "output": summary.output_path.display().to_string(),
        "rows": summary.rows(),
        "located": summary.located(),
        "sources": sources,
        "warnings": summary.warnings,
    });
    println!("{obj}");
}
