//! Page and cropped-page views over extracted characters.

use kuma_core::{BBox, Char, TextOptions, chars_to_lines, chars_within};

/// A single page of a bulletin.
#[derive(Debug, Clone)]
pub struct Page {
    /// Page index (0-based).
    page_number: usize,
    width: f64,
    height: f64,
    chars: Vec<Char>,
}

impl Page {
    pub fn new(page_number: usize, width: f64, height: f64, chars: Vec<Char>) -> Self {
        Self {
            page_number,
            width,
            height,
            chars,
        }
    }

    /// Returns the page index (0-based).
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Characters in content stream order.
    pub fn chars(&self) -> &[Char] {
        &self.chars
    }

    /// Text lines, top to bottom.
    pub fn extract_lines(&self, options: &TextOptions) -> Vec<String> {
        chars_to_lines(&self.chars, options)
    }

    /// Text lines joined with `\n`.
    pub fn extract_text(&self, options: &TextOptions) -> String {
        self.extract_lines(options).join("\n")
    }

    /// Keep the characters lying entirely inside `bbox`.
    pub fn crop(&self, bbox: BBox) -> CroppedPage {
        CroppedPage::new(&self.chars, bbox)
    }
}

/// A rectangular region of a page.
///
/// Holds only the characters fully inside the crop box, with coordinates
/// shifted so the crop box's top-left corner is the origin.
#[derive(Debug, Clone)]
pub struct CroppedPage {
    width: f64,
    height: f64,
    chars: Vec<Char>,
}

impl CroppedPage {
    fn new(chars: &[Char], bbox: BBox) -> Self {
        let chars = chars_within(chars, &bbox)
            .into_iter()
            .map(|mut ch| {
                ch.bbox = BBox::new(
                    ch.bbox.x0 - bbox.x0,
                    ch.bbox.top - bbox.top,
                    ch.bbox.x1 - bbox.x0,
                    ch.bbox.bottom - bbox.top,
                );
                ch
            })
            .collect();
        Self {
            width: bbox.width(),
            height: bbox.height(),
            chars,
        }
    }

    /// The crop box in its own coordinates.
    pub fn bbox(&self) -> BBox {
        BBox::new(0.0, 0.0, self.width, self.height)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn chars(&self) -> &[Char] {
        &self.chars
    }

    pub fn extract_lines(&self, options: &TextOptions) -> Vec<String> {
        chars_to_lines(&self.chars, options)
    }

    pub fn extract_text(&self, options: &TextOptions) -> String {
        self.extract_lines(options).join("\n")
    }

    /// Apply a further crop, in this view's coordinates.
    pub fn crop(&self, bbox: BBox) -> CroppedPage {
        CroppedPage::new(&self.chars, bbox)
    }
}
