//! An opened sighting bulletin.

use std::path::Path;

use kuma_parse::PdfDocument;

use crate::error::KumaError;
use crate::page::Page;

/// Iterator over the pages of a bulletin, interpreting each page on demand.
///
/// Created by [`Bulletin::pages`]. A page that fails to interpret yields an
/// `Err` and iteration continues with the next page.
pub struct PagesIter<'a> {
    bulletin: &'a Bulletin,
    current: usize,
    count: usize,
}

impl Iterator for PagesIter<'_> {
    type Item = Result<Page, KumaError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.count {
            return None;
        }
        let result = self.bulletin.page(self.current);
        self.current += 1;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PagesIter<'_> {}

/// A PDF bulletin opened for text extraction.
#[derive(Debug)]
pub struct Bulletin {
    doc: PdfDocument,
}

impl Bulletin {
    /// Open a bulletin from bytes.
    pub fn open(bytes: &[u8]) -> Result<Self, KumaError> {
        Ok(Self {
            doc: PdfDocument::open(bytes)?,
        })
    }

    /// Read and open a bulletin file.
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self, KumaError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| KumaError::io(path, e))?;
        Self::open(&bytes)
    }

    pub fn page_count(&self) -> usize {
        self.doc.page_count()
    }

    /// Interpret one page (0-based).
    pub fn page(&self, index: usize) -> Result<Page, KumaError> {
        let bbox = self.doc.page_bbox(index)?;
        let chars = self.doc.page_chars(index)?;
        Ok(Page::new(index, bbox.width(), bbox.height(), chars))
    }

    pub fn pages(&self) -> PagesIter<'_> {
        PagesIter {
            bulletin: self,
            current: 0,
            count: self.page_count(),
        }
    }
}
