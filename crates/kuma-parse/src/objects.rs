//! Small helpers over `lopdf` objects shared by the document and font code.

use std::sync::LazyLock;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::error::BackendError;

static EMPTY_DICT: LazyLock<Dictionary> = LazyLock::new(Dictionary::new);

/// Follow an indirect reference; other objects are returned as is.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Numeric value of an integer or real object.
pub(crate) fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

/// Look up `key` in a dictionary, resolving a reference value.
pub(crate) fn get<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    dict.get(key).ok().map(|obj| resolve(doc, obj))
}

pub(crate) fn get_dict<'a>(
    doc: &'a Document,
    dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Dictionary> {
    get(doc, dict, key)?.as_dict().ok()
}

pub(crate) fn get_name<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a [u8]> {
    get(doc, dict, key)?.as_name().ok()
}

pub(crate) fn get_number(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<f64> {
    get(doc, dict, key).and_then(number)
}

/// Look up `key` on a page, walking up `/Parent` links for inherited
/// attributes such as `/MediaBox` and `/Resources`.
pub(crate) fn inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, BackendError> {
    let mut current = page_id;
    // a malformed tree could loop; real trees are shallow
    for _ in 0..64 {
        let dict = doc
            .get_object(current)
            .and_then(Object::as_dict)
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(resolve(doc, value)));
        }
        match dict.get(b"Parent") {
            Ok(parent) => {
                current = parent
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
    Err(BackendError::Parse("page tree too deep".to_string()))
}

/// A page's resource dictionary, or an empty one if it has none.
pub(crate) fn page_resources(doc: &Document, page_id: ObjectId) -> Result<&Dictionary, BackendError> {
    match inherited(doc, page_id, b"Resources")? {
        Some(obj) => obj
            .as_dict()
            .map_err(|_| BackendError::Parse("/Resources is not a dictionary".to_string())),
        None => Ok(&EMPTY_DICT),
    }
}

/// Stream bytes, decompressed when a `/Filter` is present.
pub(crate) fn stream_bytes(stream: &Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Parse(format!("failed to decompress stream: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}

/// Concatenated content of a page's `/Contents` (a stream or an array of
/// streams). A page without contents yields no bytes.
pub(crate) fn page_content(doc: &Document, page: &Dictionary) -> Result<Vec<u8>, BackendError> {
    let Some(contents) = get(doc, page, b"Contents") else {
        return Ok(Vec::new());
    };
    match contents {
        Object::Stream(stream) => stream_bytes(stream),
        Object::Array(items) => {
            let mut content = Vec::new();
            for item in items {
                let stream = resolve(doc, item).as_stream().map_err(|e| {
                    BackendError::Parse(format!("/Contents array item is not a stream: {e}"))
                })?;
                if !content.is_empty() {
                    content.push(b'\n');
                }
                content.extend(stream_bytes(stream)?);
            }
            Ok(content)
        }
        _ => Err(BackendError::Parse(
            "/Contents is not a stream or array".to_string(),
        )),
    }
}
