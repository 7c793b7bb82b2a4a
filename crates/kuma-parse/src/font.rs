//! Font loading and glyph decoding.
//!
//! A [`Font`] turns the bytes of a shown string into [`Glyph`]s carrying the
//! character code, its Unicode text and its advance width. Unicode comes
//! from the `/ToUnicode` CMap when present, then from a legacy CJK encoding
//! named by a Type0 font's predefined CMap, then from the code itself.

use std::collections::HashMap;

use encoding_rs::Encoding;
use lopdf::{Dictionary, Document, Object};

use crate::cmap::CMap;
use crate::error::BackendError;
use crate::objects::{get, get_dict, get_name, get_number, number, resolve, stream_bytes};

const DEFAULT_ASCENT: f64 = 750.0;
const DEFAULT_DESCENT: f64 = -250.0;
const DEFAULT_MISSING_WIDTH: f64 = 600.0;

const DEFAULT_CID_ASCENT: f64 = 880.0;
const DEFAULT_CID_DESCENT: f64 = -120.0;
const DEFAULT_CID_WIDTH: f64 = 1000.0;

const REPLACEMENT: &str = "\u{FFFD}";

/// One decoded glyph of a shown string.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Character code as read from the string (one or two bytes).
    pub code: u32,
    pub text: String,
    /// Horizontal displacement in thousandths of text space.
    pub width: f64,
    /// Single-byte code 32, the only code word spacing applies to.
    pub is_space: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CodeScheme {
    SingleByte,
    /// Identity and UCS-2 style CMaps: fixed two-byte codes.
    TwoByte,
    /// Predefined legacy CMaps: one or two bytes depending on the lead byte.
    Cjk(&'static Encoding),
}

#[derive(Debug, Clone)]
enum Widths {
    Simple {
        first_char: u32,
        widths: Vec<f64>,
        missing: f64,
    },
    Cid {
        default: f64,
        widths: HashMap<u32, f64>,
    },
}

impl Widths {
    fn get(&self, code: u32) -> f64 {
        match self {
            Widths::Simple {
                first_char,
                widths,
                missing,
            } => code
                .checked_sub(*first_char)
                .and_then(|i| widths.get(i as usize))
                .copied()
                .unwrap_or(*missing),
            Widths::Cid { default, widths } => widths.get(&code).copied().unwrap_or(*default),
        }
    }
}

/// A loaded font resource.
#[derive(Debug, Clone)]
pub struct Font {
    base_font: String,
    scheme: CodeScheme,
    to_unicode: Option<CMap>,
    widths: Widths,
    ascent: f64,
    descent: f64,
}

impl Default for Font {
    /// Single-byte font with default metrics, used when a `Tf` names a
    /// resource that is missing or unreadable.
    fn default() -> Self {
        Self {
            base_font: String::new(),
            scheme: CodeScheme::SingleByte,
            to_unicode: None,
            widths: Widths::Simple {
                first_char: 0,
                widths: Vec::new(),
                missing: DEFAULT_MISSING_WIDTH,
            },
            ascent: DEFAULT_ASCENT,
            descent: DEFAULT_DESCENT,
        }
    }
}

impl Font {
    /// Load a font from its dictionary.
    ///
    /// A malformed `/ToUnicode` stream is dropped rather than failing the
    /// font; text then falls back to the encoding.
    pub fn load(doc: &Document, dict: &Dictionary) -> Result<Self, BackendError> {
        let base_font = get_name(doc, dict, b"BaseFont")
            .map(|name| String::from_utf8_lossy(name).into_owned())
            .unwrap_or_default();
        let to_unicode = load_to_unicode(doc, dict);

        if get_name(doc, dict, b"Subtype") == Some(b"Type0".as_slice()) {
            let descendant = descendant_font(doc, dict)?;
            let encoding = get_name(doc, dict, b"Encoding")
                .map(|name| String::from_utf8_lossy(name).into_owned())
                .unwrap_or_default();
            let scheme = match encoding_for_cmap(&encoding) {
                Some(enc) => CodeScheme::Cjk(enc),
                None => CodeScheme::TwoByte,
            };
            let widths = Widths::Cid {
                default: get_number(doc, descendant, b"DW").unwrap_or(DEFAULT_CID_WIDTH),
                widths: get(doc, descendant, b"W")
                    .and_then(|w| w.as_array().ok())
                    .map(|w| parse_w_array(doc, w))
                    .unwrap_or_default(),
            };
            let (ascent, descent) =
                descriptor_metrics(doc, descendant, DEFAULT_CID_ASCENT, DEFAULT_CID_DESCENT);
            return Ok(Self {
                base_font,
                scheme,
                to_unicode,
                widths,
                ascent,
                descent,
            });
        }

        let missing = get_dict(doc, dict, b"FontDescriptor")
            .and_then(|desc| get_number(doc, desc, b"MissingWidth"))
            .unwrap_or(DEFAULT_MISSING_WIDTH);
        let widths = Widths::Simple {
            first_char: get_number(doc, dict, b"FirstChar").map_or(0, |c| c.max(0.0) as u32),
            widths: get(doc, dict, b"Widths")
                .and_then(|w| w.as_array().ok())
                .map(|w| {
                    w.iter()
                        .map(|obj| number(resolve(doc, obj)).unwrap_or(missing))
                        .collect()
                })
                .unwrap_or_default(),
            missing,
        };
        let (ascent, descent) = descriptor_metrics(doc, dict, DEFAULT_ASCENT, DEFAULT_DESCENT);
        Ok(Self {
            base_font,
            scheme: CodeScheme::SingleByte,
            to_unicode,
            widths,
            ascent,
            descent,
        })
    }

    pub fn base_font(&self) -> &str {
        &self.base_font
    }

    /// Ascent in thousandths of text space.
    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    /// Descent in thousandths of text space (negative below the baseline).
    pub fn descent(&self) -> f64 {
        self.descent
    }

    /// Split a shown string into glyphs.
    pub fn decode(&self, bytes: &[u8]) -> Vec<Glyph> {
        match self.scheme {
            CodeScheme::SingleByte => bytes
                .iter()
                .map(|&b| {
                    let text = self.unicode(u32::from(b)).unwrap_or_else(|| {
                        let (text, _) = encoding_rs::WINDOWS_1252
                            .decode_without_bom_handling(std::slice::from_ref(&b));
                        text.into_owned()
                    });
                    self.glyph(u32::from(b), text, b == b' ')
                })
                .collect(),
            CodeScheme::TwoByte => bytes
                .chunks(2)
                .map(|pair| {
                    let code = pair.iter().fold(0u32, |acc, &b| acc << 8 | u32::from(b));
                    let text = self.unicode(code).unwrap_or_else(|| {
                        char::from_u32(code).map_or_else(|| REPLACEMENT.to_string(), String::from)
                    });
                    self.glyph(code, text, false)
                })
                .collect(),
            CodeScheme::Cjk(encoding) => {
                let mut glyphs = Vec::new();
                let mut i = 0;
                while i < bytes.len() {
                    let len = if is_lead_byte(bytes[i], encoding) && i + 1 < bytes.len() {
                        2
                    } else {
                        1
                    };
                    let raw = &bytes[i..i + len];
                    let code = raw.iter().fold(0u32, |acc, &b| acc << 8 | u32::from(b));
                    let text = self.unicode(code).unwrap_or_else(|| {
                        let (text, _) = encoding.decode_without_bom_handling(raw);
                        text.into_owned()
                    });
                    glyphs.push(self.glyph(code, text, raw == b" "));
                    i += len;
                }
                glyphs
            }
        }
    }

    fn unicode(&self, code: u32) -> Option<String> {
        self.to_unicode
            .as_ref()
            .and_then(|cmap| cmap.lookup(code))
            .map(str::to_string)
    }

    fn glyph(&self, code: u32, text: String, is_space: bool) -> Glyph {
        Glyph {
            code,
            text,
            width: self.widths.get(code),
            is_space,
        }
    }
}

fn load_to_unicode(doc: &Document, dict: &Dictionary) -> Option<CMap> {
    let stream = get(doc, dict, b"ToUnicode")?.as_stream().ok()?;
    match stream_bytes(stream).and_then(|data| CMap::parse(&data)) {
        Ok(cmap) => Some(cmap),
        Err(_err) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(error = %_err, "ignoring unreadable ToUnicode CMap");
            None
        }
    }
}

/// First entry of a Type0 font's `/DescendantFonts`.
fn descendant_font<'a>(doc: &'a Document, dict: &'a Dictionary) -> Result<&'a Dictionary, BackendError> {
    get(doc, dict, b"DescendantFonts")
        .and_then(|obj| obj.as_array().ok())
        .and_then(|fonts| fonts.first())
        .and_then(|font| resolve(doc, font).as_dict().ok())
        .ok_or_else(|| BackendError::Font("Type0 font without /DescendantFonts".to_string()))
}

fn descriptor_metrics(
    doc: &Document,
    font: &Dictionary,
    default_ascent: f64,
    default_descent: f64,
) -> (f64, f64) {
    let Some(desc) = get_dict(doc, font, b"FontDescriptor") else {
        return (default_ascent, default_descent);
    };
    let ascent = get_number(doc, desc, b"Ascent")
        .filter(|a| *a != 0.0)
        .unwrap_or(default_ascent);
    let descent = get_number(doc, desc, b"Descent")
        .filter(|d| *d != 0.0)
        .unwrap_or(default_descent);
    (ascent, descent)
}

/// Parse a CID font `/W` array: `c [w1 w2 ...]` and `c_first c_last w`.
fn parse_w_array(doc: &Document, items: &[Object]) -> HashMap<u32, f64> {
    let mut widths = HashMap::new();
    let mut iter = items.iter().map(|obj| resolve(doc, obj)).peekable();

    while let Some(first) = iter.next() {
        let Some(start) = number(first).map(|n| n as u32) else {
            continue;
        };
        match iter.next() {
            Some(Object::Array(run)) => {
                for (offset, w) in run.iter().enumerate() {
                    if let Some(w) = number(resolve(doc, w)) {
                        widths.insert(start + offset as u32, w);
                    }
                }
            }
            Some(last) => {
                let (Some(end), Some(w)) = (number(last), iter.next().and_then(number)) else {
                    continue;
                };
                for cid in start..=end as u32 {
                    widths.insert(cid, w);
                }
            }
            None => break,
        }
    }
    widths
}

/// The `encoding_rs` encoding behind a predefined CMap name, or `None` for
/// Identity, UCS-2 style and unknown CMaps.
pub(crate) fn encoding_for_cmap(cmap_name: &str) -> Option<&'static Encoding> {
    let base = cmap_name
        .strip_suffix("-H")
        .or_else(|| cmap_name.strip_suffix("-V"))
        .unwrap_or(cmap_name);

    match base {
        "90ms-RKSJ" | "90msp-RKSJ" | "90pv-RKSJ" | "83pv-RKSJ" | "78-RKSJ" | "Add-RKSJ"
        | "Ext-RKSJ" | "78ms-RKSJ" => Some(encoding_rs::SHIFT_JIS),
        "EUC" | "78-EUC" | "Add-EUC" | "Ext-EUC" => Some(encoding_rs::EUC_JP),
        "GBK-EUC" | "GB-EUC" | "GBpc-EUC" | "GBKp-EUC" => Some(encoding_rs::GBK),
        "B5pc" | "ETen-B5" | "HKscs-B5" | "ETenms-B5" => Some(encoding_rs::BIG5),
        "KSC-EUC" | "KSCms-UHC" | "KSCpc-EUC" => Some(encoding_rs::EUC_KR),
        _ => None,
    }
}

fn is_lead_byte(byte: u8, encoding: &'static Encoding) -> bool {
    if encoding == encoding_rs::SHIFT_JIS {
        (0x81..=0x9F).contains(&byte) || (0xE0..=0xFC).contains(&byte)
    } else if encoding == encoding_rs::EUC_JP {
        (0xA1..=0xFE).contains(&byte) || byte == 0x8E
    } else {
        // GBK, Big5 and EUC-KR share the lead byte range
        (0x81..=0xFE).contains(&byte)
    }
}
