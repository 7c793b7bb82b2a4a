//! County-qualified municipality names.
//!
//! Bulletins write towns and villages without their enclosing county
//! (`葉山町`), while the geocode dictionary keys them with it
//! (`三浦郡葉山町`).

/// `(region, locality, county-qualified locality)`.
const ALIASES: &[(&str, &str, &str)] = &[
    // 神奈川県
    ("神奈川県", "葉山町", "三浦郡葉山町"),
    ("神奈川県", "二宮町", "中郡二宮町"),
    ("神奈川県", "大磯町", "中郡大磯町"),
    ("神奈川県", "愛川町", "愛甲郡愛川町"),
    ("神奈川県", "清川村", "愛甲郡清川村"),
    ("神奈川県", "中井町", "足柄上郡中井町"),
    ("神奈川県", "大井町", "足柄上郡大井町"),
    ("神奈川県", "山北町", "足柄上郡山北町"),
    ("神奈川県", "松田町", "足柄上郡松田町"),
    ("神奈川県", "開成町", "足柄上郡開成町"),
    ("神奈川県", "湯河原町", "足柄下郡湯河原町"),
    ("神奈川県", "真鶴町", "足柄下郡真鶴町"),
    ("神奈川県", "箱根町", "足柄下郡箱根町"),
    ("神奈川県", "寒川町", "高座郡寒川町"),
    // 山梨県
    ("山梨県", "昭和町", "中巨摩郡昭和町"),
    ("山梨県", "丹波山村", "北都留郡丹波山村"),
    ("山梨県", "小菅村", "北都留郡小菅村"),
    ("山梨県", "南部町", "南巨摩郡南部町"),
    ("山梨県", "富士川町", "南巨摩郡富士川町"),
    ("山梨県", "早川町", "南巨摩郡早川町"),
    ("山梨県", "身延町", "南巨摩郡身延町"),
    ("山梨県", "富士河口湖町", "南都留郡富士河口湖町"),
    ("山梨県", "山中湖村", "南都留郡山中湖村"),
    ("山梨県", "忍野村", "南都留郡忍野村"),
    ("山梨県", "西桂町", "南都留郡西桂町"),
    ("山梨県", "道志村", "南都留郡道志村"),
    ("山梨県", "鳴沢村", "南都留郡鳴沢村"),
    ("山梨県", "市川三郷町", "西八代郡市川三郷町"),
    // 静岡県
    ("静岡県", "森町", "周智郡森町"),
    ("静岡県", "吉田町", "榛原郡吉田町"),
    ("静岡県", "川根本町", "榛原郡川根本町"),
    ("静岡県", "函南町", "田方郡函南町"),
    ("静岡県", "南伊豆町", "賀茂郡南伊豆町"),
    ("静岡県", "東伊豆町", "賀茂郡東伊豆町"),
    ("静岡県", "松崎町", "賀茂郡松崎町"),
    ("静岡県", "河津町", "賀茂郡河津町"),
    ("静岡県", "西伊豆町", "賀茂郡西伊豆町"),
    ("静岡県", "小山町", "駿東郡小山町"),
    ("静岡県", "清水町", "駿東郡清水町"),
    ("静岡県", "長泉町", "駿東郡長泉町"),
];

/// The county-qualified name of `locality` in `region`, or `locality` itself.
pub fn resolve_alias<'a>(region: &str, locality: &'a str) -> &'a str {
    ALIASES
        .iter()
        .find(|(r, l, _)| *r == region && *l == locality)
        .map_or(locality, |&(_, _, qualified)| qualified)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualifies_known_towns() {
        assert_eq!(resolve_alias("神奈川県", "葉山町"), "三浦郡葉山町");
        assert_eq!(resolve_alias("山梨県", "富士河口湖町"), "南都留郡富士河口湖町");
        assert_eq!(resolve_alias("静岡県", "長泉町"), "駿東郡長泉町");
    }

    #[test]
    fn unknown_locality_passes_through() {
        assert_eq!(resolve_alias("山梨県", "甲府市"), "甲府市");
        assert_eq!(resolve_alias("山梨県", ""), "");
    }

    #[test]
    fn region_scopes_the_alias() {
        assert_eq!(resolve_alias("静岡県", "山北町"), "山北町");
        assert_eq!(resolve_alias("神奈川県", "森町"), "森町");
    }

    #[test]
    fn table_has_no_duplicate_keys() {
        for (i, (r, l, _)) in ALIASES.iter().enumerate() {
            assert!(
                !ALIASES[i + 1..].iter().any(|(r2, l2, _)| r2 == r && l2 == l),
                "duplicate alias for {r} {l}"
            );
        }
        assert_eq!(ALIASES.len(), 40);
    }
}
