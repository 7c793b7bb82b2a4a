//! Positioned characters and their grouping into text lines.

use crate::geometry::BBox;

/// A single rendered glyph with its Unicode text and position on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Char {
    /// The text content of this character (usually one code point).
    pub text: String,
    /// Bounding box in top-left origin coordinates.
    pub bbox: BBox,
    /// Effective font size in points.
    pub size: f64,
}

impl Char {
    pub fn new(text: impl Into<String>, bbox: BBox, size: f64) -> Self {
        Self {
            text: text.into(),
            bbox,
            size,
        }
    }

    fn is_blank(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

/// Options controlling how characters are grouped into words and lines.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TextOptions {
    /// Horizontal gap (points) above which two glyphs belong to different words.
    pub x_tolerance: f64,
    /// Vertical distance (points) within which glyphs share a line.
    pub y_tolerance: f64,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
        }
    }
}

/// Keep only the characters lying entirely inside `bbox`.
pub fn chars_within(chars: &[Char], bbox: &BBox) -> Vec<Char> {
    chars
        .iter()
        .filter(|c| bbox.contains(&c.bbox))
        .cloned()
        .collect()
}

/// Group characters into text lines, top to bottom.
///
/// Characters whose `top` lies within `y_tolerance` of the first character of a
/// line join that line. Within a line, glyphs are ordered left to right and
/// split into words at whitespace glyphs or at gaps wider than `x_tolerance`;
/// words are joined with a single space. Lines with no words are dropped.
pub fn chars_to_lines(chars: &[Char], options: &TextOptions) -> Vec<String> {
    let mut sorted: Vec<&Char> = chars.iter().collect();
    sorted.sort_by(|a, b| {
        a.bbox
            .top
            .total_cmp(&b.bbox.top)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut lines: Vec<Vec<&Char>> = Vec::new();
    let mut line_top = f64::NEG_INFINITY;
    for ch in sorted {
        match lines.last_mut() {
            Some(line) if (ch.bbox.top - line_top).abs() <= options.y_tolerance => line.push(ch),
            _ => {
                line_top = ch.bbox.top;
                lines.push(vec![ch]);
            }
        }
    }

    lines
        .into_iter()
        .map(|mut line| {
            line.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
            line_to_words(&line, options.x_tolerance).join(" ")
        })
        .filter(|line| !line.is_empty())
        .collect()
}

/// Join a line's characters into words.
fn line_to_words(line: &[&Char], x_tolerance: f64) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_x1: Option<f64> = None;

    for ch in line {
        if ch.is_blank() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_x1 = None;
            continue;
        }
        if let Some(x1) = prev_x1 {
            if ch.bbox.x0 - x1 > x_tolerance && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push_str(&ch.text);
        prev_x1 = Some(ch.bbox.x1);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
