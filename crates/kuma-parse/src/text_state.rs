//! Text state machine: text object tracking (`BT`/`ET`), the text and line
//! matrices, and the text parameters saved with the graphics state.

use kuma_core::Matrix;

/// Text parameters that belong to the graphics state and are saved and
/// restored by `q`/`Q`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextParams {
    /// `Tc`: extra space after every glyph.
    pub char_spacing: f64,
    /// `Tw`: extra space after single-byte code 32.
    pub word_spacing: f64,
    /// `Tz`: horizontal scaling in percent.
    pub h_scaling: f64,
    /// `TL`: distance between baselines.
    pub leading: f64,
    /// Resource name selected by `Tf`.
    pub font_name: String,
    pub font_size: f64,
    /// `Ts`: baseline offset.
    pub rise: f64,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 100.0,
            leading: 0.0,
            font_name: String::new(),
            font_size: 0.0,
            rise: 0.0,
        }
    }
}

/// Text state tracked while interpreting a content stream.
#[derive(Debug, Clone, Default)]
pub struct TextState {
    pub params: TextParams,
    in_text_object: bool,
    text_matrix: Matrix,
    line_matrix: Matrix,
}

impl TextState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_text_object(&self) -> bool {
        self.in_text_object
    }

    pub fn text_matrix(&self) -> &Matrix {
        &self.text_matrix
    }

    /// `BT`: reset both matrices to identity.
    pub fn begin_text(&mut self) {
        self.text_matrix = Matrix::identity();
        self.line_matrix = Matrix::identity();
        self.in_text_object = true;
    }

    /// `ET`.
    pub fn end_text(&mut self) {
        self.in_text_object = false;
    }

    /// `Tm`: replace both matrices.
    pub fn set_text_matrix(&mut self, m: Matrix) {
        self.text_matrix = m;
        self.line_matrix = m;
    }

    /// `Td`: offset from the start of the current line.
    pub fn move_text_position(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Matrix::translation(tx, ty).concat(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    /// `TD`: like `Td`, also setting leading to `-ty`.
    pub fn move_text_position_and_set_leading(&mut self, tx: f64, ty: f64) {
        self.params.leading = -ty;
        self.move_text_position(tx, ty);
    }

    /// `T*`.
    pub fn move_to_next_line(&mut self) {
        let leading = self.params.leading;
        self.move_text_position(0.0, -leading);
    }

    /// Horizontal advance in text space for a glyph `w0` thousandths wide.
    pub fn glyph_advance(&self, w0: f64, is_space: bool) -> f64 {
        let p = &self.params;
        let word_spacing = if is_space { p.word_spacing } else { 0.0 };
        ((w0 / 1000.0) * p.font_size + p.char_spacing + word_spacing) * (p.h_scaling / 100.0)
    }

    /// Advance for a `TJ` adjustment; positive values move left.
    pub fn adjustment_advance(&self, adjustment: f64) -> f64 {
        -(adjustment / 1000.0) * self.params.font_size * (self.params.h_scaling / 100.0)
    }

    /// Move the text matrix right by `tx` text-space units.
    pub fn advance(&mut self, tx: f64) {
        self.text_matrix = Matrix::translation(tx, 0.0).concat(&self.text_matrix);
    }

    /// The glyph-space to text-space matrix for the current font size,
    /// scaling and rise, premultiplied into the text matrix.
    pub fn render_matrix(&self, ctm: &Matrix) -> Matrix {
        let p = &self.params;
        Matrix::new(
            p.font_size * p.h_scaling / 100.0,
            0.0,
            0.0,
            p.font_size,
            0.0,
            p.rise,
        )
        .concat(&self.text_matrix)
        .concat(ctm)
    }
}
