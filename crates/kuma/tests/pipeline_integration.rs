//! End-to-end pipeline runs over synthesized bulletins.

mod common;

use std::path::Path;

use common::{SHIZUOKA_ROW, write_bulletin, write_standard_inputs};
use kuma::{
    BBox, Bulletin, COMBINED_ARTIFACT, KumaError, Pipeline, PipelineConfig, SourceKind,
    TextOptions, WarningCode, extract_source,
};

fn config_in(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        input_dir: dir.to_path_buf(),
        geocode_path: dir.join("areas_with_coords.yml"),
        output_path: dir.join("bear_sightings_with_coords.csv"),
        shizuoka_regions: vec![BBox::new(30.0, 40.0, 560.0, 540.0)],
        ..PipelineConfig::default()
    }
}

fn read_output(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join("bear_sightings_with_coords.csv"))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn three_sources_merge_sorted_by_date() {
    let dir = tempfile::tempdir().unwrap();
    write_standard_inputs(dir.path());

    let summary = Pipeline::new(config_in(dir.path())).run().unwrap();
    assert!(summary.warnings.is_empty(), "{:?}", summary.warnings);
    assert_eq!(summary.rows(), 3);
    assert_eq!(summary.located(), 2);
    // no 静岡県 entries: every Shizuoka row stays unlocated
    assert!(
        summary
            .dataset
            .records()
            .iter()
            .filter(|r| r.record.region == "静岡県")
            .all(|r| r.longitude().is_none() && r.latitude().is_none())
    );

    assert_eq!(
        read_output(dir.path()),
        vec![
            "region,date,locality,place,longitude,latitude",
            "静岡県,2024-05-03,静岡市,葵区,,",
            "山梨県,2024-06-04,甲府市,○○町,138.57,35.66",
            "神奈川県,2024-06-19,山北町,中川,139.01,35.45",
        ]
    );
}

#[test]
fn per_source_counts_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    write_standard_inputs(dir.path());

    let summary = Pipeline::new(config_in(dir.path())).run().unwrap();
    let kanagawa = summary.sources[0];
    assert_eq!(kanagawa.kind, SourceKind::Kanagawa);
    // caption line plus one row
    assert_eq!(kanagawa.lines, 2);
    assert_eq!(kanagawa.records, 1);
    assert!(summary.sources.iter().all(|s| s.records == 1));
}

#[test]
fn missing_source_contributes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_standard_inputs(dir.path());
    std::fs::remove_file(dir.path().join("kuma_r6_yamanashi.pdf")).unwrap();

    let summary = Pipeline::new(config_in(dir.path())).run().unwrap();
    assert_eq!(summary.rows(), 2);
    assert_eq!(summary.warnings.len(), 1);
    assert_eq!(summary.warnings[0].code, WarningCode::SourceUnavailable);
    assert_eq!(summary.warnings[0].source, Some(SourceKind::Yamanashi));
    assert!(read_output(dir.path()).iter().all(|row| !row.starts_with("山梨県")));
}

#[test]
fn missing_geocode_file_leaves_every_coordinate_empty() {
    let dir = tempfile::tempdir().unwrap();
    write_standard_inputs(dir.path());
    std::fs::remove_file(dir.path().join("areas_with_coords.yml")).unwrap();

    let summary = Pipeline::new(config_in(dir.path())).run().unwrap();
    assert!(summary.has_warning(WarningCode::GeocodeConfigUnavailable));
    assert_eq!(summary.rows(), 3);
    assert_eq!(summary.located(), 0);
    assert!(read_output(dir.path())[1..].iter().all(|row| row.ends_with(",,")));
}

#[test]
fn bulletin_without_rows_reports_layout_drift() {
    let dir = tempfile::tempdir().unwrap();
    write_standard_inputs(dir.path());
    write_bulletin(
        dir.path(),
        "kuma_r6_kanagawa.pdf",
        &[(50.0, 700.0, "令和6年度 ツキノワグマ出没情報")],
    );

    let summary = Pipeline::new(config_in(dir.path())).run().unwrap();
    let drift: Vec<_> = summary
        .warnings
        .iter()
        .filter(|w| w.code == WarningCode::LayoutDrift)
        .collect();
    assert_eq!(drift.len(), 1);
    assert_eq!(drift[0].source, Some(SourceKind::Kanagawa));
    assert_eq!(summary.rows(), 2);
}

#[test]
fn artifacts_are_written_when_configured() {
    let dir = tempfile::tempdir().unwrap();
    write_standard_inputs(dir.path());
    let artifacts = dir.path().join("artifacts");
    let config = PipelineConfig {
        artifacts_dir: Some(artifacts.clone()),
        ..config_in(dir.path())
    };

    let summary = Pipeline::new(config).run().unwrap();
    let paths = summary.artifacts.unwrap();
    assert_eq!(paths.sources.len(), 3);
    assert!(artifacts.join("bear_sightings_shizuoka.json").exists());

    let json = std::fs::read_to_string(artifacts.join("bear_sightings_kanagawa.json")).unwrap();
    let records: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(records[0]["raw_place"], "山北町 中川");

    let combined = std::fs::read_to_string(artifacts.join(COMBINED_ARTIFACT)).unwrap();
    assert_eq!(combined.lines().count(), 4);
    assert!(combined.starts_with("region,date,locality,place\n"));
}

#[test]
fn unwritable_artifacts_still_write_the_dataset() {
    let dir = tempfile::tempdir().unwrap();
    write_standard_inputs(dir.path());
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "a file, not a directory").unwrap();
    let config = PipelineConfig {
        artifacts_dir: Some(blocker.join("sub")),
        ..config_in(dir.path())
    };

    let summary = Pipeline::new(config).run().unwrap();
    assert!(summary.artifacts.is_none());
    assert!(summary.has_warning(WarningCode::ArtifactWriteFailed));
    assert_eq!(summary.rows(), 3);
    assert_eq!(read_output(dir.path()).len(), 4);
}

#[test]
fn unwritable_output_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write_standard_inputs(dir.path());
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "a file, not a directory").unwrap();
    let config = PipelineConfig {
        output_path: blocker.join("out.csv"),
        ..config_in(dir.path())
    };

    let err = Pipeline::new(config).run().unwrap_err();
    assert!(matches!(err, KumaError::Io { .. }));
}

#[test]
fn default_regions_exclude_text_outside_the_table() {
    let dir = tempfile::tempdir().unwrap();
    // the row sits right of the first default region and above the second
    write_bulletin(dir.path(), "kuma_r6_shizuoka.pdf", &[(300.0, 800.0, SHIZUOKA_ROW)]);
    let config = PipelineConfig {
        input_dir: dir.path().to_path_buf(),
        ..PipelineConfig::default()
    };

    let bulletin = Bulletin::open_file(config.document_path(SourceKind::Shizuoka)).unwrap();
    let run = extract_source(SourceKind::Shizuoka, &bulletin, &config);
    assert!(run.lines.is_empty());
    assert_eq!(run.warnings[0].code, WarningCode::LayoutDrift);
    assert_eq!(run.warnings[0].description, "no text extracted");
}

#[test]
fn bulletin_pages_expose_text() {
    let bytes = common::bulletin_pdf(&[&[(50.0, 700.0, "一頁")], &[(50.0, 700.0, "二頁")]]);
    let bulletin = Bulletin::open(&bytes).unwrap();
    assert_eq!(bulletin.page_count(), 2);

    let texts: Vec<String> = bulletin
        .pages()
        .map(|page| page.unwrap().extract_text(&TextOptions::default()))
        .collect();
    assert_eq!(texts, vec!["一頁", "二頁"]);

    let page = bulletin.page(1).unwrap();
    assert_eq!(page.page_number(), 1);
    assert_eq!(page.width(), 595.0);
    let cropped = page.crop(BBox::new(0.0, 0.0, 40.0, 842.0));
    assert!(cropped.chars().is_empty());

    assert!(matches!(bulletin.page(2), Err(KumaError::Backend(_))));
}
