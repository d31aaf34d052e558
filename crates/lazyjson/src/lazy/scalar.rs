use alloc::{borrow::Cow, string::String};

use super::LazyNode;
use crate::{Decoder, Error, Span, ValueType, error::DecodeError, pool};

/// Reads one value with `read` and requires that nothing follows it.
fn decode_whole<T>(
    span: &Span,
    read: impl FnOnce(&mut Decoder) -> Result<T, DecodeError>,
) -> Result<T, Error> {
    pool::with_decoder(span, |d| {
        let value = read(d)?;
        d.finish()?;
        Ok(value)
    })
}

macro_rules! scalar_node {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            span: Span,
        }

        impl $name {
            pub(crate) fn new(span: Span) -> Self {
                Self { span }
            }
        }
    };
}

scalar_node!(
    /// A `null` literal.
    NullNode
);
scalar_node!(
    /// A `true` or `false` literal.
    BooleanNode
);
scalar_node!(
    /// A number literal, decoded on each coercion.
    NumberNode
);
scalar_node!(
    /// A string literal, quotes included in its span.
    StringNode
);
scalar_node!(
    /// Bytes that do not start like any JSON value. Only reachable through
    /// non-validating parses or hand-built spans.
    InvalidNode
);

impl LazyNode for NullNode {
    fn value_type(&self) -> ValueType {
        ValueType::Null
    }

    fn span(&self) -> &Span {
        &self.span
    }
}

impl LazyNode for BooleanNode {
    fn value_type(&self) -> ValueType {
        ValueType::Boolean
    }

    fn span(&self) -> &Span {
        &self.span
    }

    fn to_bool(&self) -> Result<bool, Error> {
        decode_whole(&self.span, Decoder::read_bool)
    }
}

impl LazyNode for NumberNode {
    fn value_type(&self) -> ValueType {
        ValueType::Number
    }

    fn span(&self) -> &Span {
        &self.span
    }

    fn to_i32(&self) -> Result<i32, Error> {
        decode_whole(&self.span, Decoder::read_i32)
    }

    fn to_i64(&self) -> Result<i64, Error> {
        decode_whole(&self.span, Decoder::read_i64)
    }

    fn to_f32(&self) -> Result<f32, Error> {
        decode_whole(&self.span, Decoder::read_f32)
    }

    fn to_f64(&self) -> Result<f64, Error> {
        decode_whole(&self.span, Decoder::read_f64)
    }
}

impl StringNode {
    /// The unescaped content of the string.
    ///
    /// Borrows from the input when the literal contains no escapes; only
    /// escaped strings go through the decoder.
    ///
    /// # Errors
    ///
    /// A decode error if the literal is malformed.
    pub fn to_str(&self) -> Result<Cow<'_, str>, Error> {
        if let [b'"', body @ .., b'"'] = self.span.as_bytes() {
            if !body.iter().any(|&b| b == b'\\' || b == b'"' || b < 0x20) {
                if let Ok(text) = core::str::from_utf8(body) {
                    return Ok(Cow::Borrowed(text));
                }
            }
        }
        decode_whole(&self.span, |d| d.read_str().map(String::from)).map(Cow::Owned)
    }
}

impl LazyNode for StringNode {
    fn value_type(&self) -> ValueType {
        ValueType::String
    }

    fn span(&self) -> &Span {
        &self.span
    }
}

impl LazyNode for InvalidNode {
    fn value_type(&self) -> ValueType {
        ValueType::Invalid
    }

    fn span(&self) -> &Span {
        &self.span
    }
}
