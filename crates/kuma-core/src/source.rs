//! The three bulletin sources and their fixed identities.

use std::fmt;

/// One of the three prefectures publishing sighting bulletins.
///
/// Each source has its own document layout and line grammar; everything
/// source-specific dispatches on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SourceKind {
    /// Tabular bulletin, month-day dates.
    Kanagawa,
    /// Prose bulletin, year-qualified slash dates.
    Yamanashi,
    /// Positional bulletin, text read from fixed page regions.
    Shizuoka,
}

impl SourceKind {
    /// All sources in processing order; merged output concatenates in this order.
    pub const ALL: [SourceKind; 3] = [
        SourceKind::Kanagawa,
        SourceKind::Shizuoka,
        SourceKind::Yamanashi,
    ];

    /// The region literal written into every canonical record of this source.
    pub fn region(&self) -> &'static str {
        match self {
            SourceKind::Kanagawa => "神奈川県",
            SourceKind::Yamanashi => "山梨県",
            SourceKind::Shizuoka => "静岡県",
        }
    }

    /// Lowercase identifier used in file names and CLI arguments.
    pub fn slug(&self) -> &'static str {
        match self {
            SourceKind::Kanagawa => "kanagawa",
            SourceKind::Yamanashi => "yamanashi",
            SourceKind::Shizuoka => "shizuoka",
        }
    }

    /// Parse a slug (`"kanagawa"`) or a region literal (`"神奈川県"`).
    pub fn from_name(name: &str) -> Option<SourceKind> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.slug().eq_ignore_ascii_case(name) || kind.region() == name)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
