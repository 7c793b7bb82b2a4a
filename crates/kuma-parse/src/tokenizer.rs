//! Content stream tokenizer.
//!
//! Splits raw content stream bytes into [`Operator`]s, each carrying the
//! [`Operand`]s that preceded it. Comments are dropped and inline images
//! (`BI ... ID ... EI`) are skipped entirely, since only text is extracted.

use crate::error::BackendError;

/// A content stream operand value.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Integer(i64),
    Real(f64),
    /// Name without the leading `/`.
    Name(String),
    /// Bytes of a literal `(...)` or hex `<...>` string.
    String(Vec<u8>),
    Array(Vec<Operand>),
    Boolean(bool),
    Null,
    Dictionary(Vec<(String, Operand)>),
}

impl Operand {
    /// Numeric value of an integer or real operand.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Operand::Integer(i) => Some(*i as f64),
            Operand::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Operand::Name(name) => Some(name),
            _ => None,
        }
    }
}

/// An operator with its operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    /// Operator keyword (e.g. `"BT"`, `"Tf"`, `"TJ"`).
    pub name: String,
    pub operands: Vec<Operand>,
}

/// Parse content stream bytes into a sequence of operators.
///
/// # Errors
///
/// Returns [`BackendError::Interpreter`] for unterminated strings, arrays
/// or dictionaries and for malformed numbers.
pub fn tokenize(input: &[u8]) -> Result<Vec<Operator>, BackendError> {
    let mut cursor = Cursor { input, pos: 0 };
    let mut ops = Vec::new();
    let mut stack: Vec<Operand> = Vec::new();

    loop {
        cursor.skip_blank();
        let Some(b) = cursor.peek() else {
            break;
        };
        if is_keyword_start(b) {
            let keyword = cursor.keyword();
            match keyword.as_str() {
                "true" => stack.push(Operand::Boolean(true)),
                "false" => stack.push(Operand::Boolean(false)),
                "null" => stack.push(Operand::Null),
                "BI" => {
                    cursor.skip_inline_image()?;
                    stack.clear();
                }
                _ => ops.push(Operator {
                    name: keyword,
                    operands: std::mem::take(&mut stack),
                }),
            }
        } else if b == b']' {
            return Err(BackendError::Interpreter(
                "unexpected ']' outside array".to_string(),
            ));
        } else if let Some(operand) = cursor.operand()? {
            stack.push(operand);
        } else {
            cursor.pos += 1;
        }
    }

    Ok(ops)
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0C | 0x00)
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn is_keyword_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || matches!(b, b'*' | b'\'' | b'"')
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn unterminated(what: &str) -> BackendError {
    BackendError::Interpreter(format!("unterminated {what}"))
}

struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn skip_blank(&mut self) {
        while let Some(b) = self.peek() {
            if is_whitespace(b) {
                self.pos += 1;
            } else if b == b'%' {
                while self.peek().is_some_and(|b| b != b'\n' && b != b'\r') {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    /// Parse one operand at the cursor, or `None` if the byte starts none.
    fn operand(&mut self) -> Result<Option<Operand>, BackendError> {
        let Some(b) = self.peek() else {
            return Ok(None);
        };
        let operand = match b {
            b'(' => Operand::String(self.literal_string()?),
            b'<' if self.peek_at(1) == Some(b'<') => Operand::Dictionary(self.dictionary()?),
            b'<' => Operand::String(self.hex_string()?),
            b'[' => Operand::Array(self.array()?),
            b'/' => Operand::Name(self.name()),
            b'0'..=b'9' | b'+' | b'-' | b'.' => self.number()?,
            _ => return Ok(None),
        };
        Ok(Some(operand))
    }

    /// An operand nested in an array or dictionary, where bare keywords
    /// are values rather than operators.
    fn nested_value(&mut self) -> Result<Operand, BackendError> {
        if let Some(operand) = self.operand()? {
            return Ok(operand);
        }
        match self.peek() {
            Some(b) if is_keyword_start(b) => Ok(match self.keyword().as_str() {
                "true" => Operand::Boolean(true),
                "false" => Operand::Boolean(false),
                "null" => Operand::Null,
                other => Operand::Name(other.to_string()),
            }),
            Some(b) => Err(BackendError::Interpreter(format!(
                "unexpected byte 0x{b:02X} at offset {}",
                self.pos
            ))),
            None => Err(unterminated("value")),
        }
    }

    fn literal_string(&mut self) -> Result<Vec<u8>, BackendError> {
        self.pos += 1;
        let mut out = Vec::new();
        let mut depth = 1u32;

        while let Some(b) = self.peek() {
            self.pos += 1;
            match b {
                b'(' => {
                    depth += 1;
                    out.push(b);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(out);
                    }
                    out.push(b);
                }
                b'\\' => self.escape(&mut out)?,
                _ => out.push(b),
            }
        }
        Err(unterminated("literal string"))
    }

    /// Decode the escape following a backslash inside a literal string.
    fn escape(&mut self, out: &mut Vec<u8>) -> Result<(), BackendError> {
        let Some(escaped) = self.peek() else {
            return Err(unterminated("escape in literal string"));
        };
        self.pos += 1;
        match escaped {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0C),
            // line continuation
            b'\r' => {
                if self.peek() == Some(b'\n') {
                    self.pos += 1;
                }
            }
            b'\n' => {}
            b'0'..=b'7' => {
                let mut value = escaped - b'0';
                for _ in 0..2 {
                    match self.peek() {
                        Some(d @ b'0'..=b'7') => {
                            value = value.wrapping_mul(8).wrapping_add(d - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                out.push(value);
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn hex_string(&mut self) -> Result<Vec<u8>, BackendError> {
        self.pos += 1;
        let mut digits = Vec::new();
        loop {
            match self.peek() {
                None => return Err(unterminated("hex string")),
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b) => {
                    self.pos += 1;
                    if is_whitespace(b) {
                        continue;
                    }
                    let value = hex_value(b).ok_or_else(|| {
                        BackendError::Interpreter(format!("invalid hex digit: {:?}", b as char))
                    })?;
                    digits.push(value);
                }
            }
        }
        // odd count: the final digit is followed by an implicit 0
        Ok(digits
            .chunks(2)
            .map(|pair| (pair[0] << 4) | pair.get(1).copied().unwrap_or(0))
            .collect())
    }

    fn array(&mut self) -> Result<Vec<Operand>, BackendError> {
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            self.skip_blank();
            match self.peek() {
                None => return Err(unterminated("array")),
                Some(b']') => {
                    self.pos += 1;
                    return Ok(items);
                }
                Some(_) => items.push(self.nested_value()?),
            }
        }
    }

    fn dictionary(&mut self) -> Result<Vec<(String, Operand)>, BackendError> {
        self.pos += 2;
        let mut entries = Vec::new();
        loop {
            self.skip_blank();
            match (self.peek(), self.peek_at(1)) {
                (None, _) => return Err(unterminated("dictionary")),
                (Some(b'>'), Some(b'>')) => {
                    self.pos += 2;
                    return Ok(entries);
                }
                (Some(b'/'), _) => {
                    let key = self.name();
                    self.skip_blank();
                    let value = self.nested_value()?;
                    entries.push((key, value));
                }
                _ => {
                    return Err(BackendError::Interpreter(
                        "expected name key in dictionary".to_string(),
                    ));
                }
            }
        }
    }

    fn name(&mut self) -> String {
        self.pos += 1;
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| !is_whitespace(b) && !is_delimiter(b))
        {
            self.pos += 1;
        }

        let raw = &self.input[start..self.pos];
        let mut name = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            // #XX escapes
            if raw[i] == b'#' && i + 2 < raw.len() {
                if let (Some(hi), Some(lo)) = (hex_value(raw[i + 1]), hex_value(raw[i + 2])) {
                    name.push((hi << 4) | lo);
                    i += 3;
                    continue;
                }
            }
            name.push(raw[i]);
            i += 1;
        }
        String::from_utf8_lossy(&name).into_owned()
    }

    fn number(&mut self) -> Result<Operand, BackendError> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let mut has_dot = false;
        while let Some(b) = self.peek() {
            match b {
                b'.' if !has_dot => has_dot = true,
                b'0'..=b'9' => {}
                _ => break,
            }
            self.pos += 1;
        }

        let token = String::from_utf8_lossy(&self.input[start..self.pos]);
        let invalid = || BackendError::Interpreter(format!("invalid number: {token}"));
        if has_dot {
            // "-." and "." read as zero, as viewers do
            let text = token.trim_start_matches(['+', '-']);
            if text == "." {
                return Ok(Operand::Real(0.0));
            }
            token.parse().map(Operand::Real).map_err(|_| invalid())
        } else {
            token.parse().map(Operand::Integer).map_err(|_| invalid())
        }
    }

    /// Alphabetic keyword; trailing digits are kept for `d0` / `d1`.
    fn keyword(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(|b| {
            is_keyword_start(b) || (self.pos > start && b.is_ascii_digit())
        }) {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    /// Skip from after `BI` to just past the matching `EI`.
    fn skip_inline_image(&mut self) -> Result<(), BackendError> {
        let at_boundary = |input: &[u8], i: usize| input.get(i).is_none_or(|&b| is_whitespace(b));
        // dictionary entries up to ID
        while self.pos + 1 < self.input.len() {
            if self.input[self.pos] == b'I'
                && self.input[self.pos + 1] == b'D'
                && (self.pos == 0 || is_whitespace(self.input[self.pos - 1]))
                && at_boundary(self.input, self.pos + 2)
            {
                self.pos += 3;
                break;
            }
            self.pos += 1;
        }
        // binary data up to whitespace-delimited EI
        while self.pos + 1 < self.input.len() {
            if self.input[self.pos] == b'E'
                && self.input[self.pos + 1] == b'I'
                && self.pos > 0
                && is_whitespace(self.input[self.pos - 1])
                && (at_boundary(self.input, self.pos + 2)
                    || is_delimiter(self.input[self.pos + 2]))
            {
                self.pos += 2;
                return Ok(());
            }
            self.pos += 1;
        }
        Err(unterminated("inline image"))
    }
}
