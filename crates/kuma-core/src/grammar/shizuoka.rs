//! Positional bulletin grammar: `<no> <month>月<day>日 <municipality> <place>`.

use std::sync::LazyLock;

use regex::Regex;

use crate::record::ShizuokaRecord;

static ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:-\d+)?)\s+(\d+月\d+日)\s+(\S+)\s+(.+)$").expect("valid row regex")
});

/// Parse one line of a cropped region, or `None` if it does not match.
pub fn parse_line(line: &str) -> Option<ShizuokaRecord> {
    let caps = ROW.captures(line.trim())?;
    Some(ShizuokaRecord {
        sequence_number: caps[1].to_string(),
        date_fragment: caps[2].to_string(),
        municipality: caps[3].to_string(),
        place: caps[4].trim().to_string(),
    })
}
