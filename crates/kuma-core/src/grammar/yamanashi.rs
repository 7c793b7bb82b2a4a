//! Prose bulletin grammar.
//!
//! A sentence reads `<yyyy/m/d> <time>頃 <city><place><weather...> <count>`,
//! with inconsistent spacing between the place and the weather clause.

use std::sync::LazyLock;

use regex::Regex;

use super::kanagawa::CAPTION;
use crate::record::YamanashiRecord;

static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4}/\d{1,2}/\d{1,2})").expect("valid date regex"));

/// Shortest leading run ending in a locality suffix, then the rest.
static CITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?[市町村])(.*)$").expect("valid city regex"));

/// Place text up to the first weather or `地内` marker.
static PLACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^晴雨曇]{2,}?)((?:晴|雨|曇|霧|雪|地内).*)$").expect("valid place regex")
});

static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").expect("valid regex"));
static NON_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\D").expect("valid regex"));

/// Approximate-time marker, as in `14:00頃`.
const APPROX: char = '頃';

/// Count written when no token carries a number.
pub const UNKNOWN_COUNT: &str = "不明";

/// Ensure every `頃` is followed by whitespace so the time is its own token.
fn space_after_approx(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == APPROX && !chars.peek().is_some_and(|next| next.is_whitespace()) {
            out.push(' ');
        }
    }
    out
}

fn split_place(rest: &str) -> String {
    match PLACE.captures(rest) {
        Some(caps) => caps[1].trim().to_string(),
        None => rest.split_whitespace().next().unwrap_or(rest).to_string(),
    }
}

fn head_count(tokens: &[&str]) -> String {
    tokens
        .iter()
        .rev()
        .find(|token| DIGIT.is_match(token))
        .map(|token| NON_DIGIT.replace_all(token, "").into_owned())
        .unwrap_or_else(|| UNKNOWN_COUNT.to_string())
}

/// Parse one candidate line, or `None` if it is not a sighting sentence.
pub fn parse_line(line: &str) -> Option<YamanashiRecord> {
    if line.trim().is_empty() || line.contains(CAPTION) {
        return None;
    }
    let date = DATE.find(line)?;
    let rest = space_after_approx(line[date.end()..].trim());
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    if tokens.len() < 3 {
        return None;
    }

    let remaining = tokens[1..].join(" ");
    let (city, place) = match CITY.captures(&remaining) {
        Some(caps) => (caps[1].to_string(), split_place(caps[2].trim())),
        None => (tokens[1].to_string(), tokens[2].to_string()),
    };

    Some(YamanashiRecord {
        date_fragment: date.as_str().to_string(),
        time: tokens[0].to_string(),
        city,
        place,
        head_count: head_count(&tokens[3..]),
    })
}
