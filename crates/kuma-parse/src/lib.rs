//! kuma-parse: the PDF text layer for sighting bulletins.
//!
//! Opens a PDF with `lopdf`, interprets each page's content stream and
//! returns positioned [`Char`](kuma_core::Char)s in top-left page space.
//! Japanese text is recovered through `/ToUnicode` CMaps, predefined CJK
//! CMaps (decoded with `encoding_rs`) and UCS-2 style CID codes.

pub mod cmap;
pub mod document;
pub mod error;
pub mod font;
mod interpreter;
mod objects;
pub mod text_state;
pub mod tokenizer;

pub use cmap::CMap;
pub use document::PdfDocument;
pub use error::BackendError;
pub use font::{Font, Glyph};
pub use kuma_core;
