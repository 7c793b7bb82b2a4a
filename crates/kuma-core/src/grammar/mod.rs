//! Line grammars, one per bulletin source.
//!
//! Each grammar is a pure function from a candidate line to an optional
//! record. A line that does not match produces nothing; there are no
//! partially filled records.

pub mod kanagawa;
pub mod shizuoka;
pub mod yamanashi;

use crate::record::SourceRecord;
use crate::source::SourceKind;

impl SourceKind {
    /// Parse one candidate line with this source's grammar.
    pub fn parse_line(&self, line: &str) -> Option<SourceRecord> {
        match self {
            SourceKind::Kanagawa => kanagawa::parse_line(line).map(SourceRecord::Kanagawa),
            SourceKind::Yamanashi => yamanashi::parse_line(line).map(SourceRecord::Yamanashi),
            SourceKind::Shizuoka => shizuoka::parse_line(line).map(SourceRecord::Shizuoka),
        }
    }

    /// Parse every line, keeping only the matches, in input order.
    pub fn parse_lines<I, S>(&self, lines: I) -> Vec<SourceRecord>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .filter_map(|line| self.parse_line(line.as_ref()))
            .collect()
    }
}
