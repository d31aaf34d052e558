//! Structural scanning of container bodies.
//!
//! The scanner finds where children begin and end without decoding them. It
//! tracks string boundaries, bracket nesting and the extent of scalar
//! literals, so it is cheap and never fails: on malformed input it still returns some set of spans, and
//! the bytes are reported as errors later if anything decodes them. On input
//! that passed validation the spans are exact.

use alloc::{sync::Arc, vec::Vec};

use bstr::ByteSlice;

use super::{LazyValue, container::ObjectIndex};
use crate::{
    MAX_DEPTH, Span, ValueType,
    error::{DecodeError, SyntaxError},
    escape,
};

fn skip_ws(bytes: &[u8], mut pos: usize, end: usize) -> usize {
    while pos < end && matches!(bytes[pos], b' ' | b'\t' | b'\n' | b'\r') {
        pos += 1;
    }
    pos
}

/// Position of the closing quote of the string opening at `pos`.
fn closing_quote(bytes: &[u8], pos: usize, end: usize) -> Option<usize> {
    let mut i = pos + 1;
    while i < end {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

fn skip_string(bytes: &[u8], pos: usize, end: usize) -> usize {
    closing_quote(bytes, pos, end).map_or(end, |q| q + 1)
}

/// End of the container opening at `pos`, or `Err` with the offset just past
/// the bracket that nests deeper than [`MAX_DEPTH`].
fn skip_container(bytes: &[u8], pos: usize, end: usize) -> Result<usize, usize> {
    let mut depth = 0usize;
    let mut i = pos;
    while i < end {
        match bytes[i] {
            b'"' => {
                i = skip_string(bytes, i, end);
                continue;
            }
            b'[' | b'{' => {
                depth += 1;
                if depth > MAX_DEPTH {
                    return Err(i + 1);
                }
            }
            b']' | b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Ok(i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    Ok(end)
}

fn skip_digits(bytes: &[u8], mut pos: usize, end: usize) -> usize {
    while pos < end && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    pos
}

/// Follows the number grammar as far as the bytes allow.
fn skip_number(bytes: &[u8], mut pos: usize, end: usize) -> usize {
    let peek = |pos: usize| (pos < end).then(|| bytes[pos]);
    if peek(pos) == Some(b'-') {
        pos += 1;
    }
    if peek(pos) == Some(b'0') {
        pos += 1;
    } else {
        pos = skip_digits(bytes, pos, end);
    }
    if peek(pos) == Some(b'.') {
        pos = skip_digits(bytes, pos + 1, end);
    }
    if let Some(b'e' | b'E') = peek(pos) {
        pos += 1;
        if let Some(b'+' | b'-') = peek(pos) {
            pos += 1;
        }
        pos = skip_digits(bytes, pos, end);
    }
    pos
}

/// Consumes the longest prefix of `literal` found at `pos`.
fn skip_literal(bytes: &[u8], pos: usize, end: usize, literal: &[u8]) -> usize {
    let matched = bytes[pos..end]
        .iter()
        .zip(literal)
        .take_while(|(b, l)| b == l)
        .count();
    pos + matched
}

/// Runs of bytes that cannot start a value extend to the next delimiter.
fn skip_garbage(bytes: &[u8], mut pos: usize, end: usize) -> usize {
    while pos < end
        && !matches!(
            bytes[pos],
            b',' | b':' | b'[' | b']' | b'{' | b'}' | b'"' | b' ' | b'\t' | b'\n' | b'\r'
        )
    {
        pos += 1;
    }
    pos
}

/// End of the value starting at `pos`, or `Err` when a container nests too
/// deep. Returns `pos` itself when the byte there is a delimiter.
fn try_skip_value(bytes: &[u8], pos: usize, end: usize) -> Result<usize, usize> {
    if pos >= end {
        return Ok(pos);
    }
    Ok(match bytes[pos] {
        b'"' => skip_string(bytes, pos, end),
        b'[' | b'{' => return skip_container(bytes, pos, end),
        b'-' | b'0'..=b'9' => skip_number(bytes, pos, end),
        b't' => skip_literal(bytes, pos, end, b"true"),
        b'f' => skip_literal(bytes, pos, end, b"false"),
        b'n' => skip_literal(bytes, pos, end, b"null"),
        _ => skip_garbage(bytes, pos, end),
    })
}

/// As [`try_skip_value`], treating a container that nests too deep as
/// running to `end`.
fn skip_value(bytes: &[u8], pos: usize, end: usize) -> usize {
    try_skip_value(bytes, pos, end).unwrap_or(end)
}

/// The range between a container's brackets. An unterminated container
/// runs to the end of its span.
fn body(span: &Span, close: u8) -> (usize, usize) {
    let end = match span.as_bytes() {
        [_, .., last] if *last == close => span.end() - 1,
        _ => span.end(),
    };
    ((span.start() + 1).min(end), end)
}

/// Consumes the comma after an element. `None` once the body is exhausted
/// or the separator is missing.
fn next_element(bytes: &[u8], pos: usize, end: usize) -> Option<usize> {
    let pos = skip_ws(bytes, pos, end);
    (pos < end && bytes[pos] == b',').then_some(pos + 1)
}

pub(super) fn array_items(span: &Span) -> Vec<LazyValue> {
    let bytes = &span.buffer()[..];
    let (mut pos, end) = body(span, b']');
    let mut items = Vec::new();
    loop {
        pos = skip_ws(bytes, pos, end);
        if pos >= end {
            break;
        }
        let stop = skip_value(bytes, pos, end);
        items.push(LazyValue::from_span(span.child(pos, stop)));
        match next_element(bytes, stop, end) {
            Some(next) => pos = next,
            None => break,
        }
    }
    log::trace!("indexed {} array items at {}", items.len(), span.start());
    items
}

pub(super) fn object_fields(span: &Span) -> ObjectIndex {
    let bytes = &span.buffer()[..];
    let (mut pos, end) = body(span, b'}');
    let mut index = ObjectIndex::default();
    loop {
        pos = skip_ws(bytes, pos, end);
        if pos >= end || bytes[pos] != b'"' {
            break;
        }
        let Some(quote) = closing_quote(bytes, pos, end) else {
            break;
        };
        let key = decode_key(&bytes[pos + 1..quote]);

        pos = skip_ws(bytes, quote + 1, end);
        if pos >= end || bytes[pos] != b':' {
            break;
        }
        pos = skip_ws(bytes, pos + 1, end);
        let stop = skip_value(bytes, pos, end);
        index.insert(key, LazyValue::from_span(span.child(pos, stop)));
        match next_element(bytes, stop, end) {
            Some(next) => pos = next,
            None => break,
        }
    }
    index
}

fn decode_key(raw: &[u8]) -> Arc<str> {
    if raw.contains(&b'\\') {
        let mut decoded = Vec::with_capacity(raw.len());
        escape::unescape_into(raw, &mut decoded);
        Arc::from(&*decoded.to_str_lossy())
    } else {
        Arc::from(&*raw.to_str_lossy())
    }
}

/// Finds the first value in `span` without validating it.
///
/// Returns its absolute `(start, end)`. Only the leading byte and the
/// nesting depth are checked. Unless `allow_trailing` is set, anything but
/// whitespace after the value is an error.
pub(super) fn locate_value(
    span: &Span,
    allow_trailing: bool,
) -> Result<(usize, usize), DecodeError> {
    let bytes = &span.buffer()[..];
    let end = span.end();
    let start = skip_ws(bytes, span.start(), end);
    if start >= end {
        return Err(DecodeError::new(SyntaxError::UnexpectedEndOfInput, end));
    }
    if ValueType::of_leading_byte(bytes[start]) == ValueType::Invalid {
        let ch = bytes[start..end]
            .chars()
            .next()
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        return Err(DecodeError::new(SyntaxError::InvalidCharacter(ch), start));
    }
    let stop = try_skip_value(bytes, start, end)
        .map_err(|at| DecodeError::new(SyntaxError::DepthLimitExceeded, at))?;
    if !allow_trailing {
        let rest = skip_ws(bytes, stop, end);
        if rest < end {
            return Err(DecodeError::new(SyntaxError::TrailingCharacters, rest));
        }
    }
    Ok((start, stop))
}
