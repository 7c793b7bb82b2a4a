//! ToUnicode CMap parser.
//!
//! Supports `beginbfchar` (single mappings) and `beginbfrange` (incrementing
//! and array forms) with UTF-16BE destination strings. This is what
//! embedded Japanese fonts use to make their glyph codes extractable.

use std::collections::HashMap;

use crate::error::BackendError;

/// Character code → Unicode string mapping from a `/ToUnicode` stream.
#[derive(Debug, Clone, Default)]
pub struct CMap {
    mappings: HashMap<u32, String>,
}

impl CMap {
    /// Parse a ToUnicode CMap from its raw (decompressed) bytes.
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let text = String::from_utf8_lossy(data);
        let mut mappings = HashMap::new();

        for section in sections(&text, "beginbfchar", "endbfchar") {
            for line in section.lines() {
                if let [src, dst, ..] = hex_tokens(line).as_slice() {
                    mappings.insert(parse_code(src)?, decode_utf16be(dst)?);
                }
            }
        }

        for section in sections(&text, "beginbfrange", "endbfrange") {
            for line in section.lines() {
                parse_bfrange_line(line, &mut mappings)?;
            }
        }

        Ok(CMap { mappings })
    }

    /// The Unicode text for a character code, if mapped.
    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Bodies of every `begin ... end` section, in order.
fn sections<'a>(text: &'a str, begin: &'a str, end: &'a str) -> impl Iterator<Item = &'a str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let start = rest.find(begin)? + begin.len();
        let len = rest[start..].find(end)?;
        let body = &rest[start..start + len];
        rest = &rest[start + len + end.len()..];
        Some(body)
    })
}

/// `<low> <high> <dst>` or `<low> <high> [<dst0> <dst1> ...]`.
fn parse_bfrange_line(line: &str, mappings: &mut HashMap<u32, String>) -> Result<(), BackendError> {
    let (head, array) = match line.find('[') {
        Some(idx) => (&line[..idx], Some(&line[idx + 1..])),
        None => (line, None),
    };
    let tokens = hex_tokens(head);
    let (Some(low), Some(high)) = (tokens.first(), tokens.get(1)) else {
        return Ok(());
    };
    let low = parse_code(low)?;
    let high = parse_code(high)?;
    if high < low {
        return Ok(());
    }

    match array {
        Some(array) => {
            let array = array.split(']').next().unwrap_or(array);
            for (code, dst) in (low..=high).zip(hex_tokens(array)) {
                mappings.insert(code, decode_utf16be(dst)?);
            }
        }
        None => {
            let Some(dst) = tokens.get(2) else {
                return Ok(());
            };
            // only the last UTF-16 unit increments across the range
            let mut units = utf16_units(dst)?;
            let Some(&last) = units.last() else {
                return Ok(());
            };
            for (offset, code) in (low..=high).enumerate() {
                let Some(slot) = units.last_mut() else {
                    break;
                };
                *slot = last.wrapping_add(offset as u16);
                if let Ok(text) = String::from_utf16(&units) {
                    mappings.insert(code, text);
                }
            }
        }
    }
    Ok(())
}

/// Every `<hex>` token on a line, without the brackets.
fn hex_tokens(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = line;
    while let Some(start) = rest.find('<') {
        let Some(len) = rest[start + 1..].find('>') else {
            break;
        };
        tokens.push(rest[start + 1..start + 1 + len].trim());
        rest = &rest[start + 1 + len + 1..];
    }
    tokens
}

fn parse_code(hex: &str) -> Result<u32, BackendError> {
    u32::from_str_radix(hex, 16)
        .map_err(|e| BackendError::Parse(format!("invalid CMap code '{hex}': {e}")))
}

fn utf16_units(hex: &str) -> Result<Vec<u16>, BackendError> {
    // two-digit destinations are single bytes
    let padded;
    let hex = if hex.len() == 2 {
        padded = format!("00{hex}");
        padded.as_str()
    } else {
        hex
    };
    if hex.len() % 4 != 0 {
        return Err(BackendError::Parse(format!(
            "UTF-16BE destination must have a multiple of 4 hex digits: '{hex}'"
        )));
    }
    (0..hex.len())
        .step_by(4)
        .map(|i| {
            hex.get(i..i + 4)
                .and_then(|unit| u16::from_str_radix(unit, 16).ok())
                .ok_or_else(|| BackendError::Parse(format!("invalid UTF-16BE unit in '{hex}'")))
        })
        .collect()
}

fn decode_utf16be(hex: &str) -> Result<String, BackendError> {
    let units = utf16_units(hex)?;
    String::from_utf16(&units)
        .map_err(|e| BackendError::Parse(format!("invalid UTF-16BE sequence '{hex}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CMAP: &[u8] = b"\
/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
2 beginbfchar
<0001> <718A>
<0002> <76EE>
endbfchar
2 beginbfrange
<0010> <0012> <3042>
<0020> <0021> [<5E02> <753A>]
endbfrange
endcmap
";

    #[test]
    fn bfchar_maps_single_codes() {
        let cmap = CMap::parse(CMAP).unwrap();
        assert_eq!(cmap.lookup(0x0001), Some("熊"));
        assert_eq!(cmap.lookup(0x0002), Some("目"));
    }

    #[test]
    fn bfrange_increments_destination() {
        let cmap = CMap::parse(CMAP).unwrap();
        assert_eq!(cmap.lookup(0x0010), Some("あ"));
        assert_eq!(cmap.lookup(0x0011), Some("ぃ"));
        assert_eq!(cmap.lookup(0x0012), Some("い"));
        assert_eq!(cmap.lookup(0x0013), None);
    }

    #[test]
    fn bfrange_array_form() {
        let cmap = CMap::parse(CMAP).unwrap();
        assert_eq!(cmap.lookup(0x0020), Some("市"));
        assert_eq!(cmap.lookup(0x0021), Some("町"));
        assert_eq!(cmap.len(), 7);
    }

    #[test]
    fn two_digit_destinations_are_bytes() {
        let cmap = CMap::parse(b"beginbfchar\n<20> <20>\nendbfchar\n").unwrap();
        assert_eq!(cmap.lookup(0x20), Some(" "));
    }

    #[test]
    fn surrogate_pair_destination() {
        let cmap = CMap::parse(b"beginbfchar\n<0001> <D83DDC3B>\nendbfchar\n").unwrap();
        assert_eq!(cmap.lookup(1), Some("🐻"));
    }

    #[test]
    fn empty_cmap() {
        let cmap = CMap::parse(b"").unwrap();
        assert!(cmap.is_empty());
        assert_eq!(cmap.lookup(0x41), None);
    }

    #[test]
    fn malformed_destination_is_an_error() {
        assert!(CMap::parse(b"beginbfchar\n<0001> <123>\nendbfchar\n").is_err());
    }
}
