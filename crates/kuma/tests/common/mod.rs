//! Synthesized bulletins for integration tests.
//!
//! Real bulletins embed a Type0 font with an Identity-H encoding and a
//! ToUnicode CMap; these helpers build the same structure with lopdf.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Document, Object, ObjectId, Stream, dictionary};

/// A line of text drawn with its baseline origin at `(x, y)`, PDF space.
pub type TextLine<'a> = (f64, f64, &'a str);

fn codes_for(pages: &[&[TextLine<'_>]]) -> BTreeMap<char, u16> {
    let mut codes = BTreeMap::new();
    for (_, _, text) in pages.iter().flat_map(|lines| lines.iter()) {
        for ch in text.chars() {
            let next = codes.len() as u16 + 1;
            codes.entry(ch).or_insert(next);
        }
    }
    codes
}

fn to_unicode(codes: &BTreeMap<char, u16>) -> Vec<u8> {
    let mut cmap = String::from("begincmap\n");
    cmap.push_str(&format!("{} beginbfchar\n", codes.len()));
    for (ch, code) in codes {
        let mut units = [0u16; 2];
        let hex: String = ch
            .encode_utf16(&mut units)
            .iter()
            .map(|u| format!("{u:04X}"))
            .collect();
        cmap.push_str(&format!("<{code:04X}> <{hex}>\n"));
    }
    cmap.push_str("endbfchar\nendcmap\n");
    cmap.into_bytes()
}

fn add_font(doc: &mut Document, codes: &BTreeMap<char, u16>) -> ObjectId {
    let cmap = doc.add_object(Stream::new(dictionary! {}, to_unicode(codes)));
    let descendant = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => "MS-Gothic",
        "DW" => 1000,
    });
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "MS-Gothic",
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![descendant.into()],
        "ToUnicode" => cmap,
    })
}

/// Build an A4 bulletin with one page per entry of `pages`, size 10 text.
pub fn bulletin_pdf(pages: &[&[TextLine<'_>]]) -> Vec<u8> {
    let codes = codes_for(pages);
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font = add_font(&mut doc, &codes);

    let mut kids = Vec::new();
    for lines in pages {
        let mut content = String::from("BT /F1 10 Tf\n");
        for (x, y, text) in lines.iter() {
            let hex: String = text.chars().map(|c| format!("{:04X}", codes[&c])).collect();
            content.push_str(&format!("1 0 0 1 {x} {y} Tm <{hex}> Tj\n"));
        }
        content.push_str("ET\n");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font } },
        });
        kids.push(Object::from(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
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

/// Write a one-page bulletin to `dir/name`.
pub fn write_bulletin(dir: &Path, name: &str, lines: &[TextLine<'_>]) {
    std::fs::write(dir.join(name), bulletin_pdf(&[lines])).expect("failed to write bulletin");
}

pub const KANAGAWA_ROW: &str = "6月19日 10:00 1 目撃 山北町 中川 山林 痕跡";
pub const YAMANASHI_ROW: &str = "2024/6/4 14:00頃 甲府市 ○○町地内 晴れ 2頭";
pub const SHIZUOKA_ROW: &str = "1 5月3日 静岡市 葵区";

pub const GEOCODE_YAML: &str = "\
神奈川県:
  足柄上郡山北町:
    中川:
      longitude: 139.01
      latitude: 35.45
山梨県:
  甲府市:
    以下に掲載がない場合:
      longitude: 138.57
      latitude: 35.66
";

/// Write all three bulletins and the geocode dictionary into `dir`.
pub fn write_standard_inputs(dir: &Path) {
    write_bulletin(
        dir,
        "kuma_r6_kanagawa.pdf",
        &[(50.0, 760.0, "《目撃・痕跡・その他》"), (50.0, 700.0, KANAGAWA_ROW)],
    );
    write_bulletin(dir, "kuma_r6_yamanashi.pdf", &[(50.0, 700.0, YAMANASHI_ROW)]);
    write_bulletin(
        dir,
        "kuma_r6_shizuoka.pdf",
        &[(40.0, 700.0, SHIZUOKA_ROW), (300.0, 820.0, "欄外")],
    );
    std::fs::write(dir.join("areas_with_coords.yml"), GEOCODE_YAML).expect("failed to write YAML");
}
