//! PDF document access backed by `lopdf`.

use std::path::Path;

use kuma_core::{BBox, Char};
use lopdf::{Document, Object, ObjectId};

use crate::error::BackendError;
use crate::interpreter::{Interpreter, PageOrigin};
use crate::objects::{inherited, number, page_content, page_resources, resolve};

/// US Letter, used when a page tree carries no `/MediaBox` at all.
const FALLBACK_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// An opened PDF with its page ids cached in document order.
pub struct PdfDocument {
    inner: Document,
    page_ids: Vec<ObjectId>,
}

impl std::fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

impl PdfDocument {
    /// Parse a PDF from memory. Encrypted documents are rejected.
    pub fn open(bytes: &[u8]) -> Result<Self, BackendError> {
        let inner = Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;
        if inner.is_encrypted() {
            return Err(BackendError::Encrypted);
        }
        // get_pages is keyed by 1-based page number
        let page_ids = inner.get_pages().values().copied().collect();
        Ok(Self { inner, page_ids })
    }

    /// Read and parse a PDF file.
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        let bytes = std::fs::read(path)?;
        Self::open(&bytes)
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// The page's MediaBox in PDF user space, normalized so that
    /// `[x0, y0, x1, y1]` has `x0 <= x1` and `y0 <= y1`.
    fn media_box(&self, page_id: ObjectId) -> Result<[f64; 4], BackendError> {
        let Some(obj) = inherited(&self.inner, page_id, b"MediaBox")? else {
            return Ok(FALLBACK_MEDIA_BOX);
        };
        let values = obj
            .as_array()
            .map_err(|e| BackendError::Parse(format!("MediaBox is not an array: {e}")))?
            .iter()
            .map(|v| number(resolve(&self.inner, v)))
            .collect::<Option<Vec<f64>>>();
        match values.as_deref() {
            Some(&[x0, y0, x1, y1]) => Ok([x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)]),
            _ => Err(BackendError::Parse(
                "MediaBox must hold four numbers".to_string(),
            )),
        }
    }

    fn page_id(&self, index: usize) -> Result<ObjectId, BackendError> {
        self.page_ids
            .get(index)
            .copied()
            .ok_or(BackendError::PageOutOfRange {
                index,
                count: self.page_ids.len(),
            })
    }

    /// Page bounds in top-left page space: `(0, 0)` to `(width, height)`.
    pub fn page_bbox(&self, index: usize) -> Result<BBox, BackendError> {
        let [x0, y0, x1, y1] = self.media_box(self.page_id(index)?)?;
        Ok(BBox::new(0.0, 0.0, x1 - x0, y1 - y0))
    }

    /// Every character painted on a page (0-based), in content stream order.
    pub fn page_chars(&self, index: usize) -> Result<Vec<Char>, BackendError> {
        let page_id = self.page_id(index)?;
        let [x0, _, _, top] = self.media_box(page_id)?;
        let page = self
            .inner
            .get_object(page_id)
            .and_then(Object::as_dict)
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;
        let content = page_content(&self.inner, page)?;
        let resources = page_resources(&self.inner, page_id)?;
        Interpreter::new(&self.inner, PageOrigin { x0, top }).run(&content, resources)
    }
}
