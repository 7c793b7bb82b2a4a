#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Document, Object, Stream, dictionary};

/// A one-page A4 bulletin drawing each `(x, y, text)` with a Type0
/// Identity-H font whose ToUnicode CMap covers every character used.
pub fn bulletin_pdf(lines: &[(f64, f64, &str)]) -> Vec<u8> {
    let mut codes: BTreeMap<char, u16> = BTreeMap::new();
    for (_, _, text) in lines {
        for ch in text.chars() {
            let next = codes.len() as u16 + 1;
            codes.entry(ch).or_insert(next);
        }
    }

    let mut cmap = format!("begincmap\n{} beginbfchar\n", codes.len());
    for (ch, code) in &codes {
        let mut units = [0u16; 2];
        let hex: String = ch
            .encode_utf16(&mut units)
            .iter()
            .map(|u| format!("{u:04X}"))
            .collect();
        cmap.push_str(&format!("<{code:04X}> <{hex}>\n"));
    }
    cmap.push_str("endbfchar\nendcmap\n");

    let mut content = String::from("BT /F1 10 Tf\n");
    for (x, y, text) in lines {
        let hex: String = text.chars().map(|c| format!("{:04X}", codes[&c])).collect();
        content.push_str(&format!("1 0 0 1 {x} {y} Tm <{hex}> Tj\n"));
    }
    content.push_str("ET\n");

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let to_unicode = doc.add_object(Stream::new(dictionary! {}, cmap.into_bytes()));
    let descendant = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => "MS-Gothic",
        "DW" => 1000,
    });
    let font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "MS-Gothic",
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![descendant.into()],
        "ToUnicode" => to_unicode,
    });
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        "Contents" => content_id,
        "Resources" => dictionary! { "Font" => dictionary! { "F1" => font } },
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::from(page_id)],
            "Count" => 1i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}

pub const KANAGAWA_ROW: &str = "6月19日 10:00 1 目撃 山北町 中川 山林 痕跡";
pub const YAMANASHI_ROW: &str = "2024/6/4 14:00頃 甲府市 ○○町地内 晴れ 2頭";

/// Kanagawa and Yamanashi bulletins plus a geocode dictionary; no
/// Shizuoka bulletin.
pub fn write_inputs(dir: &Path) {
    std::fs::write(
        dir.join("kuma_r6_kanagawa.pdf"),
        bulletin_pdf(&[(50.0, 760.0, "《目撃・痕跡・その他》"), (50.0, 700.0, KANAGAWA_ROW)]),
    )
    .unwrap();
    std::fs::write(
        dir.join("kuma_r6_yamanashi.pdf"),
        bulletin_pdf(&[(50.0, 700.0, YAMANASHI_ROW)]),
    )
    .unwrap();
    std::fs::write(
        dir.join("areas_with_coords.yml"),
        "山梨県:\n  甲府市:\n    以下に掲載がない場合:\n      longitude: 138.57\n      latitude: 35.66\n",
    )
    .unwrap();
}
