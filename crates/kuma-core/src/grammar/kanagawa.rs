//! Tabular bulletin grammar.
//!
//! A row reads `<month>月<day>日 <time> <count> <status> <place...> <area> <kind>`.
//! Rows are found by their month-day date; the header row and the section
//! caption are skipped.

use std::sync::LazyLock;

use regex::Regex;

use crate::record::KanagawaRecord;

// Month and day are range-checked here, so `6月40日` never becomes a row.
static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(1[0-2]|[1-9])月(3[01]|[12][0-9]|0?[1-9])日").expect("valid date regex")
});

/// Keywords that all appear in the table's column header row.
const HEADER_KEYWORDS: [&str; 8] = [
    "月日",
    "時間",
    "頭数",
    "状況",
    "場所等",
    "区分",
    "目撃・痕跡",
    "その他",
];

/// Section caption printed above the table.
pub(crate) const CAPTION: &str = "《目撃・痕跡・その他》";

/// Fewest tokens after the date: time, count, status, area, kind.
const MIN_TOKENS: usize = 5;

fn is_noise(line: &str) -> bool {
    line.trim().is_empty()
        || line.contains(CAPTION)
        || HEADER_KEYWORDS.iter().all(|keyword| line.contains(keyword))
}

/// Parse one candidate line, or `None` if it is not a sighting row.
pub fn parse_line(line: &str) -> Option<KanagawaRecord> {
    if is_noise(line) {
        return None;
    }
    let date = DATE.find(line)?;
    let tokens: Vec<&str> = line[date.end()..].split_whitespace().collect();
    if tokens.len() < MIN_TOKENS {
        return None;
    }
    let n = tokens.len();
    Some(KanagawaRecord {
        date_fragment: date.as_str().to_string(),
        time: tokens[0].to_string(),
        head_count: tokens[1].to_string(),
        status: tokens[2].to_string(),
        raw_place: tokens[3..n - 2].join(" "),
        area_type: tokens[n - 2].to_string(),
        observation_type: tokens[n - 1].to_string(),
    })
}
