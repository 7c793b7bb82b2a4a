//! Content stream interpreter.
//!
//! Walks the operators of a page (and any Form XObjects it paints) and
//! emits one [`Char`] per shown glyph, positioned in top-left page space.
//! Only the operators that affect where text lands are interpreted; paths,
//! colors and images are skipped.

use std::collections::HashMap;
use std::rc::Rc;

use kuma_core::{BBox, Char, Matrix};
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::BackendError;
use crate::font::Font;
use crate::objects::{get, get_dict, get_name, number, resolve, stream_bytes};
use crate::text_state::{TextParams, TextState};
use crate::tokenizer::{Operand, Operator, tokenize};

/// Nesting limit for Form XObjects painting other Form XObjects.
pub(crate) const MAX_FORM_DEPTH: usize = 10;

/// Where page space starts: the MediaBox's left edge and top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PageOrigin {
    pub x0: f64,
    pub top: f64,
}

/// Graphics state saved by `q` and Form XObjects.
#[derive(Debug, Clone)]
struct Saved {
    ctm: Matrix,
    params: TextParams,
    font: Rc<Font>,
}

#[derive(Debug, Default)]
struct State {
    ctm: Matrix,
    text: TextState,
    font: Rc<Font>,
    stack: Vec<Saved>,
}

impl State {
    fn save(&self) -> Saved {
        Saved {
            ctm: self.ctm,
            params: self.text.params.clone(),
            font: Rc::clone(&self.font),
        }
    }

    fn restore(&mut self, saved: Saved) {
        self.ctm = saved.ctm;
        self.text.params = saved.params;
        self.font = saved.font;
    }
}

pub(crate) struct Interpreter<'a> {
    doc: &'a Document,
    origin: PageOrigin,
    fonts: HashMap<ObjectId, Rc<Font>>,
    chars: Vec<Char>,
}

impl<'a> Interpreter<'a> {
    pub(crate) fn new(doc: &'a Document, origin: PageOrigin) -> Self {
        Self {
            doc,
            origin,
            fonts: HashMap::new(),
            chars: Vec::new(),
        }
    }

    /// Interpret a page's content and return its characters in stream order.
    pub(crate) fn run(
        mut self,
        content: &[u8],
        resources: &Dictionary,
    ) -> Result<Vec<Char>, BackendError> {
        let mut state = State::default();
        self.interpret(content, resources, &mut state, 0)?;
        Ok(self.chars)
    }

    fn interpret(
        &mut self,
        content: &[u8],
        resources: &Dictionary,
        state: &mut State,
        depth: usize,
    ) -> Result<(), BackendError> {
        if depth > MAX_FORM_DEPTH {
            return Err(BackendError::Interpreter(format!(
                "Form XObject nesting exceeds {MAX_FORM_DEPTH} levels"
            )));
        }

        for op in tokenize(content)? {
            self.apply(&op, resources, state, depth)?;
        }
        Ok(())
    }

    fn apply(
        &mut self,
        op: &Operator,
        resources: &Dictionary,
        state: &mut State,
        depth: usize,
    ) -> Result<(), BackendError> {
        let operands = op.operands.as_slice();
        match op.name.as_str() {
            "q" => state.stack.push(state.save()),
            "Q" => {
                if let Some(saved) = state.stack.pop() {
                    state.restore(saved);
                }
            }
            "cm" => {
                if let Some([a, b, c, d, e, f]) = numbers(operands) {
                    state.ctm = Matrix::new(a, b, c, d, e, f).concat(&state.ctm);
                }
            }

            "BT" => state.text.begin_text(),
            "ET" => state.text.end_text(),

            "Tf" => {
                let name = operands.first().and_then(Operand::as_name).unwrap_or_default();
                if let Some([size]) = numbers(operands) {
                    state.text.params.font_size = size;
                }
                state.text.params.font_name = name.to_string();
                state.font = self.font(resources, name);
            }
            "Tc" => set_param(operands, &mut state.text.params.char_spacing),
            "Tw" => set_param(operands, &mut state.text.params.word_spacing),
            "Tz" => set_param(operands, &mut state.text.params.h_scaling),
            "TL" => set_param(operands, &mut state.text.params.leading),
            "Ts" => set_param(operands, &mut state.text.params.rise),

            "Td" => {
                if let Some([tx, ty]) = numbers(operands) {
                    state.text.move_text_position(tx, ty);
                }
            }
            "TD" => {
                if let Some([tx, ty]) = numbers(operands) {
                    state.text.move_text_position_and_set_leading(tx, ty);
                }
            }
            "Tm" => {
                if let Some([a, b, c, d, e, f]) = numbers(operands) {
                    state.text.set_text_matrix(Matrix::new(a, b, c, d, e, f));
                }
            }
            "T*" => state.text.move_to_next_line(),

            "Tj" => {
                if let Some(bytes) = last_string(operands) {
                    self.show(state, bytes);
                }
            }
            "'" => {
                state.text.move_to_next_line();
                if let Some(bytes) = last_string(operands) {
                    self.show(state, bytes);
                }
            }
            "\"" => {
                if let [aw, ac, ..] = operands {
                    if let (Some(aw), Some(ac)) = (aw.as_f64(), ac.as_f64()) {
                        state.text.params.word_spacing = aw;
                        state.text.params.char_spacing = ac;
                    }
                }
                state.text.move_to_next_line();
                if let Some(bytes) = last_string(operands) {
                    self.show(state, bytes);
                }
            }
            "TJ" => {
                if let Some(Operand::Array(items)) = operands.last() {
                    for item in items {
                        match item {
                            Operand::String(bytes) => self.show(state, bytes),
                            other => {
                                if let Some(adjustment) = other.as_f64() {
                                    let tx = state.text.adjustment_advance(adjustment);
                                    state.text.advance(tx);
                                }
                            }
                        }
                    }
                }
            }

            "Do" => {
                if let Some(name) = operands.last().and_then(Operand::as_name) {
                    self.paint_form(resources, name, state, depth)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Font for a `Tf` resource name. Missing or unreadable fonts fall back
    /// to [`Font::default`] so the glyphs still advance.
    fn font(&mut self, resources: &Dictionary, name: &str) -> Rc<Font> {
        let Some(entry) = get_dict(self.doc, resources, b"Font")
            .and_then(|fonts| fonts.get(name.as_bytes()).ok())
        else {
            return Rc::default();
        };
        let id = match entry {
            Object::Reference(id) => Some(*id),
            _ => None,
        };
        if let Some(cached) = id.and_then(|id| self.fonts.get(&id)) {
            return Rc::clone(cached);
        }

        let loaded = resolve(self.doc, entry)
            .as_dict()
            .map_err(|_| BackendError::Font(format!("font /{name} is not a dictionary")))
            .and_then(|dict| Font::load(self.doc, dict));
        let font = match loaded {
            Ok(font) => Rc::new(font),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(font = name, error = %_err, "using default metrics for font");
                Rc::default()
            }
        };
        if let Some(id) = id {
            self.fonts.insert(id, Rc::clone(&font));
        }
        font
    }

    fn show(&mut self, state: &mut State, bytes: &[u8]) {
        let font = Rc::clone(&state.font);
        let ascent = font.ascent() / 1000.0;
        let descent = font.descent() / 1000.0;

        for glyph in font.decode(bytes) {
            let trm = state.text.render_matrix(&state.ctm);
            let width = glyph.width / 1000.0;
            let corners = [
                trm.apply(0.0, descent),
                trm.apply(width, descent),
                trm.apply(width, ascent),
                trm.apply(0.0, ascent),
            ];
            let (min_x, max_x) = span(corners.iter().map(|p| p.0));
            let (min_y, max_y) = span(corners.iter().map(|p| p.1));

            if !glyph.text.is_empty() {
                let bbox = BBox::new(
                    min_x - self.origin.x0,
                    self.origin.top - max_y,
                    max_x - self.origin.x0,
                    self.origin.top - min_y,
                );
                self.chars
                    .push(Char::new(glyph.text, bbox, trm.vertical_scale()));
            }

            let tx = state.text.glyph_advance(glyph.width, glyph.is_space);
            state.text.advance(tx);
        }
    }

    fn paint_form(
        &mut self,
        resources: &Dictionary,
        name: &str,
        state: &mut State,
        depth: usize,
    ) -> Result<(), BackendError> {
        let doc = self.doc;
        let Some(stream) = get_dict(doc, resources, b"XObject")
            .and_then(|xobjects| get(doc, xobjects, name.as_bytes()))
            .and_then(|obj| obj.as_stream().ok())
        else {
            return Ok(());
        };
        // images carry no text
        if get_name(doc, &stream.dict, b"Subtype") != Some(b"Form".as_slice()) {
            return Ok(());
        }

        let matrix = get(doc, &stream.dict, b"Matrix")
            .and_then(|m| m.as_array().ok())
            .and_then(|m| matrix_from_array(doc, m))
            .unwrap_or_default();
        let form_resources = get_dict(doc, &stream.dict, b"Resources").unwrap_or(resources);
        let content = stream_bytes(stream)?;

        let saved = state.save();
        let outer_stack = std::mem::take(&mut state.stack);
        state.ctm = matrix.concat(&state.ctm);
        let result = self.interpret(&content, form_resources, state, depth + 1);
        state.stack = outer_stack;
        state.restore(saved);
        result
    }
}

/// The last `N` operands as numbers, if they all are.
fn numbers<const N: usize>(operands: &[Operand]) -> Option<[f64; N]> {
    let start = operands.len().checked_sub(N)?;
    let mut values = [0.0; N];
    for (slot, operand) in values.iter_mut().zip(&operands[start..]) {
        *slot = operand.as_f64()?;
    }
    Some(values)
}

fn set_param(operands: &[Operand], param: &mut f64) {
    if let Some([value]) = numbers(operands) {
        *param = value;
    }
}

fn last_string(operands: &[Operand]) -> Option<&[u8]> {
    match operands.last() {
        Some(Operand::String(bytes)) => Some(bytes),
        _ => None,
    }
}

fn matrix_from_array(doc: &Document, items: &[Object]) -> Option<Matrix> {
    let values: Vec<f64> = items
        .iter()
        .map(|obj| number(resolve(doc, obj)))
        .collect::<Option<_>>()?;
    match values.as_slice() {
        &[a, b, c, d, e, f] => Some(Matrix::new(a, b, c, d, e, f)),
        _ => None,
    }
}

fn span(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}
