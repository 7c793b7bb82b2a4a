//! Per-source extractors: bulletin pages to candidate lines.

use std::collections::VecDeque;

use kuma_core::{BBox, PipelineWarning, SourceKind, TextOptions, WarningCode};

use crate::bulletin::{Bulletin, PagesIter};
use crate::page::Page;

/// Regions of the positional bulletin's table, `(x0, top, x1, bottom)`.
pub const SHIZUOKA_REGIONS: [BBox; 2] = [
    BBox {
        x0: 30.0,
        top: 40.0,
        x1: 120.0,
        bottom: 540.0,
    },
    BBox {
        x0: 125.0,
        top: 100.0,
        x1: 200.0,
        bottom: 470.0,
    },
];

/// Where on each page an extractor reads text.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceLayout {
    /// All text on the page.
    FullPage,
    /// Only text inside these regions, visited in order.
    Regions(Vec<BBox>),
}

impl SourceLayout {
    /// The layout a source's bulletin is read with. `regions` applies to the
    /// positional bulletin only.
    pub fn for_source(kind: SourceKind, regions: &[BBox]) -> Self {
        match kind {
            SourceKind::Kanagawa | SourceKind::Yamanashi => SourceLayout::FullPage,
            SourceKind::Shizuoka => SourceLayout::Regions(regions.to_vec()),
        }
    }

    fn page_lines(&self, page: &Page, options: &TextOptions) -> Vec<String> {
        let lines = match self {
            SourceLayout::FullPage => page.extract_lines(options),
            SourceLayout::Regions(regions) => regions
                .iter()
                .flat_map(|region| page.crop(*region).extract_lines(options))
                .collect(),
        };
        lines
            .into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    }
}

/// Lazily yields the candidate lines of a bulletin, one page at a time.
///
/// Pages that fail to interpret are skipped; a [`WarningCode::PageSkipped`]
/// warning is recorded for each and can be taken with
/// [`CandidateLines::take_warnings`]. Calling [`candidate_lines`] again on
/// the same bulletin restarts extraction from the first page.
pub struct CandidateLines<'a> {
    source: SourceKind,
    pages: PagesIter<'a>,
    layout: &'a SourceLayout,
    options: &'a TextOptions,
    next_page: usize,
    pending: VecDeque<String>,
    warnings: Vec<PipelineWarning>,
}

impl CandidateLines<'_> {
    /// Warnings recorded so far.
    pub fn take_warnings(&mut self) -> Vec<PipelineWarning> {
        std::mem::take(&mut self.warnings)
    }
}

impl Iterator for CandidateLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Some(line);
            }
            let page_number = self.next_page + 1;
            let result = self.pages.next()?;
            self.next_page += 1;
            match result {
                Ok(page) => self.pending = self.layout.page_lines(&page, self.options).into(),
                Err(err) => {
                    tracing::warn!(source = %self.source, page = page_number, error = %err, "skipping page");
                    self.warnings.push(PipelineWarning::for_source(
                        WarningCode::PageSkipped,
                        self.source,
                        format!("page {page_number}: {err}"),
                    ));
                }
            }
        }
    }
}

/// Start extracting a source's candidate lines from its bulletin.
pub fn candidate_lines<'a>(
    source: SourceKind,
    bulletin: &'a Bulletin,
    layout: &'a SourceLayout,
    options: &'a TextOptions,
) -> CandidateLines<'a> {
    CandidateLines {
        source,
        pages: bulletin.pages(),
        layout,
        options,
        next_page: 0,
        pending: VecDeque::new(),
        warnings: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuma_core::Char;

    fn text_at(text: &str, x0: f64, top: f64) -> Vec<Char> {
        text.chars()
            .enumerate()
            .map(|(i, c)| {
                let x = x0 + 5.0 * i as f64;
                Char::new(c.to_string(), BBox::new(x, top, x + 5.0, top + 8.0), 8.0)
            })
            .collect()
    }

    #[test]
    fn layout_per_source() {
        assert_eq!(
            SourceLayout::for_source(SourceKind::Kanagawa, &SHIZUOKA_REGIONS),
            SourceLayout::FullPage
        );
        assert_eq!(
            SourceLayout::for_source(SourceKind::Shizuoka, &SHIZUOKA_REGIONS),
            SourceLayout::Regions(SHIZUOKA_REGIONS.to_vec())
        );
    }

    #[test]
    fn regions_are_visited_in_configured_order() {
        let mut chars = text_at("2 5月3日 浜松市 天竜区", 130.0, 200.0);
        chars.extend(text_at("1", 35.0, 300.0));
        chars.extend(text_at("欄外の注記", 250.0, 50.0));
        let page = Page::new(0, 595.0, 842.0, chars);

        let layout = SourceLayout::Regions(vec![
            BBox::new(30.0, 40.0, 120.0, 540.0),
            BBox::new(125.0, 100.0, 260.0, 470.0),
        ]);
        let lines = layout.page_lines(&page, &TextOptions::default());
        assert_eq!(lines, vec!["1", "2 5月3日 浜松市 天竜区"]);
    }

    #[test]
    fn full_page_reads_everything() {
        let mut chars = text_at("見出し", 50.0, 20.0);
        chars.extend(text_at("本文", 50.0, 60.0));
        let page = Page::new(0, 595.0, 842.0, chars);
        let lines = SourceLayout::FullPage.page_lines(&page, &TextOptions::default());
        assert_eq!(lines, vec!["見出し", "本文"]);
    }
}
