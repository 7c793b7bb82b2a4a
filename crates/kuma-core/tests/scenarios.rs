//! Line-to-row scenarios through every core stage.

use chrono::NaiveDate;
use kuma_core::*;

fn date(y: i32, m: u32, d: u32) -> SightingDate {
    SightingDate::Known(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

#[test]
fn tabular_row_is_cleaned_for_lookup() {
    let record = SourceKind::Kanagawa
        .parse_line("6月19日 14:00 1頭 徘徊 ○○地区付近 A 目撃")
        .unwrap();
    let SourceRecord::Kanagawa(row) = &record else {
        panic!("expected a tabular record, got {record:?}");
    };
    assert_eq!(row.raw_place, "○○地区付近");

    let canonical = record.to_canonical(&DateNormalizer::default());
    assert_eq!(canonical.date, date(2024, 6, 19));
    assert_eq!(canonical.locality, "");
    assert_eq!(canonical.place, "○○地区付近");

    let (_, place) = clean_address(&canonical.locality, &canonical.place);
    assert_eq!(place, "○○");
}

#[test]
fn prose_sentence_resolves_through_fallback_sub_area() {
    let mut dictionary = GeocodeDictionary::new();
    dictionary.insert(
        "山梨県",
        "甲府市",
        FALLBACK_SUB_AREA,
        Coordinate::new(138.568, 35.662).unwrap(),
    );

    let record = SourceKind::Yamanashi
        .parse_line("2024/6/4 14:00頃 甲府市 ○○町地内 晴れ 2頭")
        .unwrap();
    let canonical = record.to_canonical(&DateNormalizer::default());
    assert_eq!(canonical.locality, "甲府市");
    assert_eq!(canonical.place, "○○町");

    let geocoded = dictionary.geocode(canonical);
    assert_eq!(geocoded.longitude(), Some(138.568));
    assert_eq!(geocoded.latitude(), Some(35.662));
}

#[test]
fn three_sources_merge_into_one_ordered_dataset() {
    let normalizer = DateNormalizer::new(2024);
    let kanagawa = SourceKind::Kanagawa.parse_lines([
        "月日 時間 頭数 状況 場所等 区分 目撃・痕跡 その他",
        "6月19日 14:00 1頭 徘徊 山北町中川 A 目撃",
        "5月1日 早朝 1頭 移動 箱根町仙石原（別荘地） B 痕跡",
    ]);
    let shizuoka = SourceKind::Shizuoka.parse_lines(["1 6月19日 静岡市 葵区井川", "ページ 1"]);
    let yamanashi =
        SourceKind::Yamanashi.parse_lines(["2024/6/4 14:00頃 甲府市 ○○町地内 晴れ 2頭"]);

    let canonical = |records: Vec<SourceRecord>| -> Vec<CanonicalRecord> {
        records.iter().map(|r| r.to_canonical(&normalizer)).collect()
    };

    let mut dictionary = GeocodeDictionary::new();
    dictionary.insert(
        "神奈川県",
        "足柄下郡箱根町",
        "仙石原",
        Coordinate::new(139.0, 35.26).unwrap(),
    );

    let dataset = Dataset::build(
        [canonical(kanagawa), canonical(shizuoka), canonical(yamanashi)],
        &dictionary,
    );
    let rows: Vec<DatasetRow> = dataset.rows().collect();

    let summary: Vec<(&str, &str, &str)> = rows
        .iter()
        .map(|r| (r.region.as_str(), r.date.as_str(), r.locality.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("神奈川県", "2024-05-01", "箱根町"),
            ("山梨県", "2024-06-04", "甲府市"),
            ("神奈川県", "2024-06-19", "山北町"),
            ("静岡県", "2024-06-19", "静岡市"),
        ]
    );
    assert_eq!(rows[0].place, "仙石原（別荘地）");
    assert_eq!((rows[0].longitude, rows[0].latitude), (Some(139.0), Some(35.26)));
    assert!(rows[1..].iter().all(|r| r.longitude.is_none() && r.latitude.is_none()));
}
