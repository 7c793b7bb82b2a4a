//! Address cleaning applied before geocode lookup.
//!
//! Bulletin places carry approximation markers, terrain words, bracketed
//! asides and duplicated municipality prefixes that never appear as keys in
//! the geocode dictionary. [`clean_address`] strips them.

use std::sync::LazyLock;

use regex::Regex;

/// Ward whose name is written into the place instead of the locality.
const MIDORI_WARD: &str = "緑区";

/// Separator between alternative places; only the first is kept.
const MIDDLE_DOT: char = '・';

/// Substrings removed from every place.
pub const NOISE_TOKENS: [&str; 11] = [
    "付近", "峠", "地区", "地内", "山地", "徳間", "鯨野", "釜の口", "諏訪内", "大道", "佐野区",
];

static FULLWIDTH_ASIDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"（.*?）").expect("valid aside regex"));
static HALFWIDTH_ASIDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("valid aside regex"));

fn clean_once(locality: &str, place: &str) -> (String, String) {
    let mut locality = locality.to_string();
    let mut place = place.to_string();

    if !locality.is_empty() {
        if let Some(rest) = place.strip_prefix(locality.as_str()) {
            place = rest.trim().to_string();
        }
    }

    if place.contains(MIDORI_WARD) && !locality.ends_with(MIDORI_WARD) {
        locality.push_str(MIDORI_WARD);
        place = place.replace(MIDORI_WARD, "");
    }

    if let Some((head, _)) = place.split_once(MIDDLE_DOT) {
        place = head.to_string();
    }

    place = FULLWIDTH_ASIDE.replace_all(&place, "").into_owned();
    place = HALFWIDTH_ASIDE.replace_all(&place, "").into_owned();

    for token in NOISE_TOKENS {
        place = place.replace(token, "");
    }

    (locality.trim().to_string(), place.trim().to_string())
}

/// Clean a `(locality, place)` pair for lookup.
///
/// Steps: drop a duplicated locality prefix from the place, move `緑区`
/// into the locality, keep the text before the first `・`, remove bracketed
/// asides, remove noise tokens, trim. Removing one token can expose another
/// (`付付近近`), so the steps repeat until nothing changes; the result is
/// idempotent.
pub fn clean_address(locality: &str, place: &str) -> (String, String) {
    let mut current = clean_once(locality, place);
    loop {
        let next = clean_once(&current.0, &current.1);
        if next == current {
            return current;
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(locality: &str, place: &str) -> (String, String) {
        clean_address(locality, place)
    }

    fn pair(locality: &str, place: &str) -> (String, String) {
        (locality.to_string(), place.to_string())
    }

    #[test]
    fn strips_marker_and_terrain_noise() {
        assert_eq!(clean("", "○○地区付近"), pair("", "○○"));
    }

    #[test]
    fn strips_duplicated_locality_prefix() {
        assert_eq!(clean("山北町", "山北町 中川"), pair("山北町", "中川"));
    }

    #[test]
    fn moves_midori_ward_into_locality() {
        assert_eq!(clean("相模原市", "緑区青根"), pair("相模原市緑区", "青根"));
        assert_eq!(clean("相模原市緑区", "青根"), pair("相模原市緑区", "青根"));
    }

    #[test]
    fn keeps_text_before_middle_dot() {
        assert_eq!(clean("甲府市", "千塚・羽黒町"), pair("甲府市", "千塚"));
    }

    #[test]
    fn removes_bracketed_asides() {
        assert_eq!(clean("箱根町", "仙石原（別荘地）"), pair("箱根町", "仙石原"));
        assert_eq!(clean("箱根町", "宮城野(国道沿い)"), pair("箱根町", "宮城野"));
        assert_eq!(clean("箱根町", "宮城野（a）b（c）"), pair("箱根町", "宮城野b"));
    }

    #[test]
    fn unmatched_bracket_is_left_alone() {
        assert_eq!(clean("箱根町", "宮城野（国道"), pair("箱根町", "宮城野（国道"));
    }

    #[test]
    fn trims_both_fields() {
        assert_eq!(clean(" 甲府市 ", "  千塚  "), pair("甲府市", "千塚"));
    }

    #[test]
    fn nested_noise_is_fully_removed() {
        assert_eq!(clean("", "付付近近"), pair("", ""));
        assert_eq!(clean("", "地地内内区"), pair("", "区"));
    }

    #[test]
    fn idempotent_on_tricky_inputs() {
        let inputs = [
            ("", ""),
            ("", "○○地区付近"),
            ("山北町", " 山北町山北町中川"),
            ("甲府市", " 甲府市千塚"),
            ("", "緑区緑区"),
            ("相模原市", "（緑区）緑区・青根"),
            ("箱根町", "(仙石原（a)）"),
            ("", "付付近近"),
            ("", "地地区区付近"),
            ("x", "x x x"),
            ("  ", "・"),
            ("佐野", "佐野区大道"),
            ("緑区", "緑区"),
        ];
        for (locality, place) in inputs {
            let once = clean(locality, place);
            let twice = clean(&once.0, &once.1);
            assert_eq!(once, twice, "not idempotent for ({locality:?}, {place:?})");
        }
    }
}
