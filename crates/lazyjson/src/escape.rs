//! Decoding of JSON string escape sequences.
//!
//! The decoder validates escapes while skipping a string and only calls into
//! this module when the string actually contains a backslash. The functions
//! here are total: on bytes that were never validated (non-validating parse)
//! a malformed escape is copied through verbatim instead of failing.

use alloc::vec::Vec;

const REPLACEMENT: char = '\u{FFFD}';

#[inline]
pub(crate) fn hex_digit(b: u8) -> Option<u16> {
    match b {
        b'0'..=b'9' => Some(u16::from(b - b'0')),
        b'a'..=b'f' => Some(u16::from(b - b'a' + 10)),
        b'A'..=b'F' => Some(u16::from(b - b'A' + 10)),
        _ => None,
    }
}

/// Reads the four hex digits of a `\u` escape.
#[inline]
pub(crate) fn hex4(digits: &[u8]) -> Option<u16> {
    match digits {
        [a, b, c, d, ..] => Some(
            hex_digit(*a)? << 12 | hex_digit(*b)? << 8 | hex_digit(*c)? << 4 | hex_digit(*d)?,
        ),
        _ => None,
    }
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut tmp = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
}

/// Appends the decoded form of a string body (the bytes between the quotes)
/// to `out`.
///
/// Unpaired surrogate escapes decode to U+FFFD.
pub(crate) fn unescape_into(raw: &[u8], out: &mut Vec<u8>) {
    out.reserve(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let Some(offset) = raw[i..].iter().position(|&b| b == b'\\') else {
            out.extend_from_slice(&raw[i..]);
            return;
        };
        out.extend_from_slice(&raw[i..i + offset]);
        i += offset;

        let Some(&esc) = raw.get(i + 1) else {
            out.push(b'\\');
            return;
        };
        let simple = match esc {
            b'"' => Some(b'"'),
            b'\\' => Some(b'\\'),
            b'/' => Some(b'/'),
            b'b' => Some(0x08),
            b'f' => Some(0x0C),
            b'n' => Some(b'\n'),
            b'r' => Some(b'\r'),
            b't' => Some(b'\t'),
            _ => None,
        };
        if let Some(byte) = simple {
            out.push(byte);
            i += 2;
            continue;
        }
        if esc != b'u' {
            out.extend_from_slice(&raw[i..i + 2]);
            i += 2;
            continue;
        }

        let Some(unit) = hex4(&raw[i + 2..]) else {
            out.extend_from_slice(&raw[i..i + 2]);
            i += 2;
            continue;
        };
        i += 6;
        match unit {
            0xD800..=0xDBFF => {
                let low = match raw.get(i..i + 2) {
                    Some(b"\\u") => hex4(&raw[i + 2..]).filter(|u| (0xDC00..=0xDFFF).contains(u)),
                    _ => None,
                };
                if let Some(low) = low {
                    let code =
                        0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                    push_char(out, char::from_u32(code).unwrap_or(REPLACEMENT));
                    i += 6;
                } else {
                    push_char(out, REPLACEMENT);
                }
            }
            0xDC00..=0xDFFF => push_char(out, REPLACEMENT),
            _ => push_char(out, char::from_u32(u32::from(unit)).unwrap_or(REPLACEMENT)),
        }
    }
}
