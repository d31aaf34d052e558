//! A reusable JSON decoder positioned over a [`Span`].
//!
//! The decoder is the only place where bytes are interpreted. A lazy node
//! resets it onto its own span, asks for one representation, and hands it
//! back. Between uses nothing survives a [`Decoder::reset`]: cursor, nesting
//! depth and the scratch buffer used for unescaped strings are all cleared,
//! while the scratch allocation itself is kept for the next string.
//!
//! Offsets in errors are absolute positions in the underlying buffer.

#[cfg(feature = "serde")]
mod de;
mod numbers;

use alloc::{borrow::ToOwned, string::String, vec::Vec};

use bstr::ByteSlice;
use bytes::Bytes;
pub use numbers::NumberLexeme;

use crate::{
    Span, StdFactory, Value, ValueType,
    error::{DecodeError, SyntaxError},
    escape,
    factory::JsonFactory,
};

/// Maximum nesting of arrays and objects the decoder accepts.
pub const MAX_DEPTH: usize = 512;

#[derive(Debug, Default)]
pub struct Decoder {
    buf: Bytes,
    pos: usize,
    end: usize,
    depth: usize,
    scratch: Vec<u8>,
}

impl Decoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repositions the decoder onto `span`, discarding all prior state.
    pub fn reset(&mut self, span: &Span) {
        self.buf = span.buffer().clone();
        self.pos = span.start();
        self.end = span.end();
        self.depth = 0;
        self.scratch.clear();
    }

    /// Drops the reference to the last buffer so an idle decoder does not
    /// keep a document alive.
    pub(crate) fn release(&mut self) {
        self.buf = Bytes::new();
        self.pos = 0;
        self.end = 0;
        self.depth = 0;
        self.scratch.clear();
    }

    #[cfg(test)]
    pub(crate) fn scratch_capacity(&self) -> usize {
        self.scratch.capacity()
    }

    /// Absolute offset of the cursor.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    // --------------------------------------------------------------------
    // Cursor primitives
    // --------------------------------------------------------------------

    #[inline]
    fn peek(&self) -> Option<u8> {
        if self.pos < self.end {
            self.buf.get(self.pos).copied()
        } else {
            None
        }
    }

    #[inline]
    fn error(&self, source: SyntaxError) -> DecodeError {
        DecodeError::new(source, self.pos)
    }

    /// Error for whatever sits at the cursor.
    fn unexpected(&self) -> DecodeError {
        match self.peek() {
            Some(b) if b.is_ascii() => self.error(SyntaxError::InvalidCharacter(b as char)),
            Some(_) => {
                let ch = self.buf[self.pos..self.end]
                    .chars()
                    .next()
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                self.error(SyntaxError::InvalidCharacter(ch))
            }
            None => self.error(SyntaxError::UnexpectedEndOfInput),
        }
    }

    pub(crate) fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    /// Skips whitespace and returns the next byte without consuming it.
    fn peek_token(&mut self) -> Result<u8, DecodeError> {
        self.skip_whitespace();
        self.peek()
            .ok_or_else(|| self.error(SyntaxError::UnexpectedEndOfInput))
    }

    /// Skips whitespace and consumes `expected`.
    fn expect_token(&mut self, expected: u8) -> Result<(), DecodeError> {
        if self.peek_token()? == expected {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_literal(&mut self, literal: &'static [u8]) -> Result<(), DecodeError> {
        for &expected in literal {
            if self.peek() != Some(expected) {
                return Err(self.unexpected());
            }
            self.pos += 1;
        }
        Ok(())
    }

    /// Requires that only whitespace remains in the span.
    pub fn finish(&mut self) -> Result<(), DecodeError> {
        self.skip_whitespace();
        if self.pos < self.end {
            Err(self.error(SyntaxError::TrailingCharacters))
        } else {
            Ok(())
        }
    }

    /// The type of the next value, without consuming it.
    pub fn peek_type(&mut self) -> Result<ValueType, DecodeError> {
        self.peek_token().map(ValueType::of_leading_byte)
    }

    // --------------------------------------------------------------------
    // Containers
    // --------------------------------------------------------------------

    fn begin(&mut self, open: u8) -> Result<(), DecodeError> {
        self.expect_token(open)?;
        if self.depth >= MAX_DEPTH {
            return Err(self.error(SyntaxError::DepthLimitExceeded));
        }
        self.depth += 1;
        Ok(())
    }

    /// Advances to the next element of the open container.
    ///
    /// Consumes the separating comma, or the closing byte when the container
    /// is exhausted (returning `false`).
    fn has_next(&mut self, first: &mut bool, close: u8) -> Result<bool, DecodeError> {
        let b = self.peek_token()?;
        if b == close {
            self.pos += 1;
            self.depth -= 1;
            return Ok(false);
        }
        if *first {
            *first = false;
        } else if b == b',' {
            self.pos += 1;
        } else {
            return Err(self.unexpected());
        }
        Ok(true)
    }

    /// Closes a container whose elements were not all visited.
    fn end_container(&mut self, close: u8) -> Result<(), DecodeError> {
        if self.peek_token()? == close {
            self.pos += 1;
            self.depth -= 1;
            Ok(())
        } else {
            Err(self.error(SyntaxError::TrailingCharacters))
        }
    }

    /// Reads an object key and the `:` that follows it.
    fn read_key(&mut self) -> Result<&str, DecodeError> {
        if self.peek_token()? != b'"' {
            return Err(self.unexpected());
        }
        let (start, end, escaped) = self.scan_string()?;
        self.expect_token(b':')?;
        self.decode_string(start, end, escaped)
    }

    // --------------------------------------------------------------------
    // Strings
    // --------------------------------------------------------------------

    /// Consumes a string literal and returns the byte range of its body.
    fn scan_string(&mut self) -> Result<(usize, usize, bool), DecodeError> {
        self.expect_token(b'"')?;
        let start = self.pos;
        let mut escaped = false;
        loop {
            let Some(b) = self.peek() else {
                return Err(self.error(SyntaxError::UnexpectedEndOfInput));
            };
            match b {
                b'"' => {
                    let end = self.pos;
                    self.pos += 1;
                    return Ok((start, end, escaped));
                }
                b'\\' => {
                    escaped = true;
                    self.pos += 1;
                    self.skip_escape()?;
                }
                0x00..=0x1F => return Err(self.error(SyntaxError::ControlCharacterInString(b))),
                _ => self.pos += 1,
            }
        }
    }

    /// Validates the escape after a backslash.
    fn skip_escape(&mut self) -> Result<(), DecodeError> {
        match self.peek() {
            Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => {
                self.pos += 1;
                Ok(())
            }
            Some(b'u') => {
                if escape::hex4(&self.buf[self.pos + 1..self.end]).is_some() {
                    self.pos += 5;
                    Ok(())
                } else {
                    Err(self.error(SyntaxError::InvalidUnicodeEscapeSequence))
                }
            }
            Some(b) if b.is_ascii() => Err(self.error(SyntaxError::InvalidEscape(b as char))),
            Some(_) => Err(self.unexpected()),
            None => Err(self.error(SyntaxError::UnexpectedEndOfInput)),
        }
    }

    /// Text of a scanned string body. Borrows the input when the body has no
    /// escapes, otherwise decodes into the scratch buffer.
    fn decode_string(
        &mut self,
        start: usize,
        end: usize,
        escaped: bool,
    ) -> Result<&str, DecodeError> {
        if escaped {
            self.scratch.clear();
            escape::unescape_into(&self.buf[start..end], &mut self.scratch);
            core::str::from_utf8(&self.scratch)
                .map_err(|_| DecodeError::new(SyntaxError::InvalidUtf8, start))
        } else {
            core::str::from_utf8(&self.buf[start..end])
                .map_err(|e| DecodeError::new(SyntaxError::InvalidUtf8, start + e.valid_up_to()))
        }
    }

    /// Reads a string value.
    pub fn read_str(&mut self) -> Result<&str, DecodeError> {
        let (start, end, escaped) = self.scan_string()?;
        self.decode_string(start, end, escaped)
    }

    fn skip_string(&mut self) -> Result<(), DecodeError> {
        let (start, end, _) = self.scan_string()?;
        core::str::from_utf8(&self.buf[start..end])
            .map(drop)
            .map_err(|e| DecodeError::new(SyntaxError::InvalidUtf8, start + e.valid_up_to()))
    }

    // --------------------------------------------------------------------
    // Scalars
    // --------------------------------------------------------------------

    pub fn read_null(&mut self) -> Result<(), DecodeError> {
        if self.peek_token()? == b'n' {
            self.expect_literal(b"null")
        } else {
            Err(self.unexpected())
        }
    }

    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        match self.peek_token()? {
            b't' => self.expect_literal(b"true").map(|()| true),
            b'f' => self.expect_literal(b"false").map(|()| false),
            _ => Err(self.unexpected()),
        }
    }

    fn consume_digits(&mut self) -> usize {
        let start = self.pos;
        while let Some(b'0'..=b'9') = self.peek() {
            self.pos += 1;
        }
        self.pos - start
    }

    /// Consumes a number literal and returns its text.
    pub fn read_number(&mut self) -> Result<NumberLexeme<'_>, DecodeError> {
        self.skip_whitespace();
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        match self.peek() {
            Some(b'0') => self.pos += 1,
            Some(b'1'..=b'9') => {
                self.consume_digits();
            }
            _ => return Err(self.unexpected()),
        }

        let mut is_float = false;
        if self.peek() == Some(b'.') {
            self.pos += 1;
            if self.consume_digits() == 0 {
                return Err(self.unexpected());
            }
            is_float = true;
        }
        if let Some(b'e' | b'E') = self.peek() {
            self.pos += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            if self.consume_digits() == 0 {
                return Err(self.unexpected());
            }
            is_float = true;
        }

        let text = core::str::from_utf8(&self.buf[start..self.pos])
            .map_err(|_| DecodeError::new(SyntaxError::InvalidUtf8, start))?;
        Ok(NumberLexeme::new(text, start, is_float))
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        self.read_number()?.to_i64()
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        let lexeme = self.read_number()?;
        let offset = lexeme.offset();
        let value = lexeme.to_i64()?;
        i32::try_from(value).map_err(|_| DecodeError::new(SyntaxError::NumberOutOfRange, offset))
    }

    pub fn read_f64(&mut self) -> Result<f64, DecodeError> {
        self.read_number()?.to_f64()
    }

    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        self.read_number()?.to_f32()
    }

    // --------------------------------------------------------------------
    // Whole values
    // --------------------------------------------------------------------

    /// Consumes one value, checking it for syntax errors without building
    /// anything.
    pub fn skip_value(&mut self) -> Result<(), DecodeError> {
        match self.peek_token()? {
            b'n' => self.read_null(),
            b't' | b'f' => self.read_bool().map(drop),
            b'-' | b'0'..=b'9' => self.read_number().map(drop),
            b'"' => self.skip_string(),
            b'[' => {
                self.begin(b'[')?;
                let mut first = true;
                while self.has_next(&mut first, b']')? {
                    self.skip_value()?;
                }
                Ok(())
            }
            b'{' => {
                self.begin(b'{')?;
                let mut first = true;
                while self.has_next(&mut first, b'}')? {
                    if self.peek_token()? != b'"' {
                        return Err(self.unexpected());
                    }
                    self.skip_string()?;
                    self.expect_token(b':')?;
                    self.skip_value()?;
                }
                Ok(())
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Finds the extent of the first value in the span.
    ///
    /// Returns the absolute `(start, end)` of the value with surrounding
    /// whitespace excluded. Unless `allow_trailing` is set, anything but
    /// whitespace after the value is an error.
    pub fn locate_value(&mut self, allow_trailing: bool) -> Result<(usize, usize), DecodeError> {
        self.skip_whitespace();
        let start = self.pos;
        self.skip_value()?;
        let end = self.pos;
        if !allow_trailing {
            self.finish()?;
        }
        Ok((start, end))
    }

    /// Decodes the whole span into a [`Value`].
    pub fn materialize(&mut self) -> Result<Value, DecodeError> {
        self.materialize_with(&StdFactory)
    }

    /// Decodes the whole span, building the result through `factory`.
    pub fn materialize_with<F: JsonFactory>(&mut self, factory: &F) -> Result<F::Value, DecodeError> {
        let value = self.build(factory)?;
        self.finish()?;
        Ok(value)
    }

    fn build<F: JsonFactory>(&mut self, f: &F) -> Result<F::Value, DecodeError> {
        match self.peek_token()? {
            b'n' => {
                self.read_null()?;
                Ok(f.null())
            }
            b't' | b'f' => {
                let b = self.read_bool()?;
                Ok(f.boolean(b))
            }
            b'-' | b'0'..=b'9' => {
                let lexeme = self.read_number()?;
                f.number(lexeme)
            }
            b'"' => {
                let s = self.read_str()?;
                Ok(f.string(s))
            }
            b'[' => {
                self.begin(b'[')?;
                let mut array = f.begin_array();
                let mut first = true;
                while self.has_next(&mut first, b']')? {
                    let item = self.build(f)?;
                    f.push(&mut array, item);
                }
                Ok(f.end_array(array))
            }
            b'{' => {
                self.begin(b'{')?;
                let mut object = f.begin_object();
                let mut first = true;
                let mut key = String::new();
                while self.has_next(&mut first, b'}')? {
                    self.read_key()?.clone_into(&mut key);
                    let value = self.build(f)?;
                    f.insert(&mut object, &key, value);
                }
                Ok(f.end_object(object))
            }
            _ => Err(self.unexpected()),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use rstest::rstest;

    use super::{Decoder, MAX_DEPTH};
    use crate::{Span, SyntaxError, Value, ValueType};

    fn decoder(input: &'static str) -> Decoder {
        let mut d = Decoder::new();
        d.reset(&Span::full(input.into()));
        d
    }

    #[rstest]
    #[case::null("null")]
    #[case::nested(r#" {"a": [1, -2.5e3, true, false, null, "xé"], "b": {}} "#)]
    #[case::empty_array("[]")]
    #[case::string_escapes(r#""\"\\\/\b\f\n\r\t""#)]
    fn skips_valid_documents(#[case] input: &'static str) {
        let mut d = decoder(input);
        d.skip_value().unwrap();
        d.finish().unwrap();
    }

    #[test]
    fn peek_type_only_moves_past_whitespace() {
        let mut d = decoder(r#"  ["a", 2]"#);
        assert_eq!(d.peek_type().unwrap(), ValueType::Array);
        assert_eq!(d.position(), 2);
        d.skip_value().unwrap();
        assert_eq!(d.position(), 10);
        assert_eq!(
            d.peek_type().unwrap_err().kind(),
            &SyntaxError::UnexpectedEndOfInput
        );
    }

    #[rstest]
    #[case::trailing_comma("[1,]", SyntaxError::InvalidCharacter(']'))]
    #[case::leading_zero("01", SyntaxError::TrailingCharacters)]
    #[case::bare_minus("-", SyntaxError::UnexpectedEndOfInput)]
    #[case::missing_fraction("1.", SyntaxError::UnexpectedEndOfInput)]
    #[case::bad_literal("nul", SyntaxError::UnexpectedEndOfInput)]
    #[case::bad_escape(r#""\x""#, SyntaxError::InvalidEscape('x'))]
    #[case::short_unicode(r#""\u12""#, SyntaxError::InvalidUnicodeEscapeSequence)]
    #[case::raw_newline("\"a\nb\"", SyntaxError::ControlCharacterInString(b'\n'))]
    #[case::unterminated(r#""abc"#, SyntaxError::UnexpectedEndOfInput)]
    #[case::missing_colon(r#"{"a" 1}"#, SyntaxError::InvalidCharacter('1'))]
    #[case::numeric_key(r#"{1:2}"#, SyntaxError::InvalidCharacter('1'))]
    #[case::missing_comma("[1 2]", SyntaxError::InvalidCharacter('2'))]
    fn rejects_malformed_documents(#[case] input: &'static str, #[case] expected: SyntaxError) {
        let mut d = decoder(input);
        let err = d.skip_value().and_then(|()| d.finish()).unwrap_err();
        assert_eq!(err.kind(), &expected);
    }

    #[test]
    fn reset_discards_previous_state() {
        let mut d = decoder("[1, 2");
        assert!(d.skip_value().is_err());
        d.reset(&Span::full("[3]".into()));
        assert_eq!(d.materialize().unwrap(), Value::Array(vec![Value::Number(3.0)]));
    }

    #[test]
    fn reads_only_its_span() {
        let buf = bytes::Bytes::from_static(b"[12345, 6]");
        let mut d = Decoder::new();
        d.reset(&Span::new(buf, 1, 4).unwrap());
        assert_eq!(d.read_i64().unwrap(), 123);
        d.finish().unwrap();
    }

    #[test]
    fn error_offsets_are_absolute() {
        let buf = bytes::Bytes::from_static(b"{\"k\": tru}");
        let mut d = Decoder::new();
        d.reset(&Span::new(buf, 6, 9).unwrap());
        let err = d.read_bool().unwrap_err();
        assert_eq!(err.offset(), 9);
        assert_eq!(err.kind(), &SyntaxError::UnexpectedEndOfInput);
    }

    #[test]
    fn escaped_strings_use_scratch() {
        let mut d = decoder(r#""tab\there""#);
        assert_eq!(d.read_str().unwrap(), "tab\there");
        d.reset(&Span::full(r#""plain""#.into()));
        assert_eq!(d.read_str().unwrap(), "plain");
    }

    #[test]
    fn depth_limit() {
        let deep = "[".repeat(MAX_DEPTH + 1) + &"]".repeat(MAX_DEPTH + 1);
        let mut d = Decoder::new();
        d.reset(&Span::full(deep.into()));
        assert_eq!(d.skip_value().unwrap_err().kind(), &SyntaxError::DepthLimitExceeded);

        let ok = "[".repeat(MAX_DEPTH) + &"]".repeat(MAX_DEPTH);
        d.reset(&Span::full(ok.into()));
        d.skip_value().unwrap();
    }

    #[test]
    fn materialize_keeps_last_duplicate_key() {
        let mut d = decoder(r#"{"a":1,"a":2}"#);
        assert_eq!(d.materialize().unwrap().to_string(), r#"{"a":2}"#);
    }

    #[rstest]
    #[case("0", 0)]
    #[case("-17", -17)]
    #[case("9223372036854775807", i64::MAX)]
    #[case("1.9", 1)]
    #[case("-1.9", -1)]
    #[case("2e3", 2000)]
    fn reads_i64(#[case] input: &'static str, #[case] expected: i64) {
        assert_eq!(decoder(input).read_i64().unwrap(), expected);
    }

    #[rstest]
    #[case("9223372036854775808")]
    #[case("1e19")]
    fn i64_out_of_range(#[case] input: &'static str) {
        let err = decoder(input).read_i64().unwrap_err();
        assert_eq!(err.kind(), &SyntaxError::NumberOutOfRange);
    }

    #[test]
    fn i32_out_of_range() {
        let err = decoder("2147483648").read_i32().unwrap_err();
        assert_eq!(err.kind(), &SyntaxError::NumberOutOfRange);
        assert_eq!(decoder("-2147483648").read_i32().unwrap(), i32::MIN);
    }

    #[test]
    fn huge_float_is_out_of_range() {
        let err = decoder("1e400").read_f64().unwrap_err();
        assert_eq!(err.kind(), &SyntaxError::NumberOutOfRange);
        let err = decoder("1e39").read_f32().unwrap_err();
        assert_eq!(err.kind(), &SyntaxError::NumberOutOfRange);
    }

    #[test]
    fn materialize_with_custom_factory() {
        use crate::{DecodeError, JsonFactory, NumberLexeme};

        /// Sums integer literals exactly and discards everything else.
        struct IntegerSum;
        impl JsonFactory for IntegerSum {
            type Value = i128;
            type Array = i128;
            type Object = i128;

            fn null(&self) -> i128 {
                0
            }
            fn boolean(&self, _: bool) -> i128 {
                0
            }
            fn number(&self, lexeme: NumberLexeme<'_>) -> Result<i128, DecodeError> {
                Ok(if lexeme.is_float() { 0 } else { i128::from(lexeme.to_i64()?) })
            }
            fn string(&self, _: &str) -> i128 {
                0
            }
            fn begin_array(&self) -> i128 {
                0
            }
            fn push(&self, array: &mut i128, value: i128) {
                *array += value;
            }
            fn end_array(&self, array: i128) -> i128 {
                array
            }
            fn begin_object(&self) -> i128 {
                0
            }
            fn insert(&self, object: &mut i128, _: &str, value: i128) {
                *object += value;
            }
            fn end_object(&self, object: i128) -> i128 {
                object
            }
        }

        let mut d = decoder(
            r#"{"a":[9007199254740993,2.5,{"b":null}],"c":"s","d":[9007199254740993]}"#,
        );
        assert_eq!(d.materialize_with(&IntegerSum).unwrap(), 18_014_398_509_481_986);
    }
}
