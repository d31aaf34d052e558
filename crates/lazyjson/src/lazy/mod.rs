//! Lazily decoded JSON values.
//!
//! A [`LazyValue`] is a byte span plus a type tag read off its first byte.
//! Nothing else is decoded until asked for: containers find their children's
//! spans on first navigation, and scalars go through the thread's
//! [`Decoder`](crate::Decoder) each time they are coerced.

mod container;
mod node;
mod scalar;
mod scan;

use alloc::borrow::Cow;
use core::fmt;

use bytes::Bytes;
pub use container::{ArrayNode, Field, ObjectNode};
pub use node::{Iter, Keys, LazyNode};
pub use scalar::{BooleanNode, InvalidNode, NullNode, NumberNode, StringNode};

use crate::{Error, ParseOptions, PathComponent, Span, Value, ValueType, path, pool};

/// A JSON value that has not been decoded yet.
///
/// Cloning is cheap: the input buffer is shared, and only the child index of
/// an already navigated container is copied.
///
/// # Examples
///
/// ```
/// use lazyjson::{LazyNode, LazyValue, path};
///
/// let doc = LazyValue::parse(r#"{"user": {"id": 7, "tags": ["a", "b"]}}"#).unwrap();
/// assert_eq!(doc.get(&path!["user", "id"]).unwrap().to_i32().unwrap(), 7);
/// assert_eq!(doc.to_i32_at(&path!["user", "missing"]).unwrap(), 0);
/// assert_eq!(doc.get(&path!["user", "tags"]).map(LazyNode::size), Some(2));
/// ```
#[derive(Clone)]
pub enum LazyValue {
    Null(NullNode),
    Boolean(BooleanNode),
    Number(NumberNode),
    String(StringNode),
    Array(ArrayNode),
    Object(ObjectNode),
    Invalid(InvalidNode),
}

macro_rules! dispatch {
    ($value:expr, $node:ident => $body:expr) => {
        match $value {
            LazyValue::Null($node) => $body,
            LazyValue::Boolean($node) => $body,
            LazyValue::Number($node) => $body,
            LazyValue::String($node) => $body,
            LazyValue::Array($node) => $body,
            LazyValue::Object($node) => $body,
            LazyValue::Invalid($node) => $body,
        }
    };
}

impl LazyNode for LazyValue {
    fn value_type(&self) -> ValueType {
        dispatch!(self, n => n.value_type())
    }

    fn span(&self) -> &Span {
        dispatch!(self, n => n.span())
    }

    fn size(&self) -> usize {
        dispatch!(self, n => n.size())
    }

    fn keys(&self) -> Keys<'_> {
        dispatch!(self, n => n.keys())
    }

    fn iter(&self) -> Iter<'_> {
        dispatch!(self, n => n.iter())
    }

    fn get_index(&self, index: usize) -> Option<&LazyValue> {
        dispatch!(self, n => n.get_index(index))
    }

    fn get_key(&self, key: &str) -> Option<&LazyValue> {
        dispatch!(self, n => n.get_key(key))
    }

    fn to_bool(&self) -> Result<bool, Error> {
        dispatch!(self, n => n.to_bool())
    }

    fn to_i32(&self) -> Result<i32, Error> {
        dispatch!(self, n => n.to_i32())
    }

    fn to_i64(&self) -> Result<i64, Error> {
        dispatch!(self, n => n.to_i64())
    }

    fn to_f32(&self) -> Result<f32, Error> {
        dispatch!(self, n => n.to_f32())
    }

    fn to_f64(&self) -> Result<f64, Error> {
        dispatch!(self, n => n.to_f64())
    }

    fn to_text(&self) -> Cow<'_, str> {
        dispatch!(self, n => n.to_text())
    }

    fn object(&self) -> Result<Value, Error> {
        dispatch!(self, n => n.object())
    }
}

impl LazyValue {
    /// Builds a root value over `input` with [`ParseOptions::default`].
    ///
    /// # Errors
    ///
    /// Fails if the input is not a single valid JSON value.
    pub fn parse(input: impl Into<Bytes>) -> Result<Self, Error> {
        Self::parse_with(input, ParseOptions::default())
    }

    /// Builds a root value over a copy of `input`.
    ///
    /// # Errors
    ///
    /// As [`parse`](Self::parse).
    pub fn parse_slice(input: &[u8]) -> Result<Self, Error> {
        Self::parse(Bytes::copy_from_slice(input))
    }

    /// Builds a root value over `input`.
    ///
    /// Whitespace around the value is excluded from its span.
    ///
    /// # Errors
    ///
    /// An empty or blank input is [`UnexpectedEndOfInput`]. With
    /// [`ParseOptions::validate`] any syntax error in the document is
    /// reported here; without it only errors that prevent locating the root
    /// are. Trailing data is an error unless
    /// [`ParseOptions::allow_trailing`] is set.
    ///
    /// [`UnexpectedEndOfInput`]: crate::SyntaxError::UnexpectedEndOfInput
    pub fn parse_with(input: impl Into<Bytes>, options: ParseOptions) -> Result<Self, Error> {
        let whole = Span::full(input.into());
        let (start, end) = if options.validate {
            pool::with_decoder(&whole, |d| d.locate_value(options.allow_trailing))?
        } else {
            scan::locate_value(&whole, options.allow_trailing)?
        };
        log::trace!(
            "root value at {start}..{end} of {} bytes (validated: {})",
            whole.len(),
            options.validate
        );
        Ok(Self::from_span(whole.child(start, end)))
    }

    /// Wraps an existing span without looking past its first byte.
    ///
    /// The span must start exactly at the value; an empty span, or one that
    /// starts with whitespace, is [`ValueType::Invalid`].
    #[must_use]
    pub fn from_span(span: Span) -> Self {
        let kind = span
            .as_bytes()
            .first()
            .map_or(ValueType::Invalid, |&b| ValueType::of_leading_byte(b));
        match kind {
            ValueType::Null => Self::Null(NullNode::new(span)),
            ValueType::Boolean => Self::Boolean(BooleanNode::new(span)),
            ValueType::Number => Self::Number(NumberNode::new(span)),
            ValueType::String => Self::String(StringNode::new(span)),
            ValueType::Array => Self::Array(ArrayNode::new(span)),
            ValueType::Object => Self::Object(ObjectNode::new(span)),
            ValueType::Invalid => Self::Invalid(InvalidNode::new(span)),
        }
    }

    /// Follows `path` from this value. An empty path returns `self`.
    ///
    /// Resolution stops at the first component that does not match and
    /// never decodes anything.
    #[must_use]
    pub fn get(&self, path: &[PathComponent<'_>]) -> Option<&LazyValue> {
        path::resolve(self, path)
    }

    /// [`to_bool`](LazyNode::to_bool) of the value at `path`, or `false` if
    /// there is none.
    ///
    /// # Errors
    ///
    /// Only when the value exists and cannot be coerced.
    pub fn to_bool_at(&self, path: &[PathComponent<'_>]) -> Result<bool, Error> {
        self.get(path).map_or(Ok(false), LazyNode::to_bool)
    }

    /// [`to_i32`](LazyNode::to_i32) at `path`, or `0`.
    ///
    /// # Errors
    ///
    /// Only when the value exists and cannot be coerced.
    pub fn to_i32_at(&self, path: &[PathComponent<'_>]) -> Result<i32, Error> {
        self.get(path).map_or(Ok(0), LazyNode::to_i32)
    }

    /// [`to_i64`](LazyNode::to_i64) at `path`, or `0`.
    ///
    /// # Errors
    ///
    /// Only when the value exists and cannot be coerced.
    pub fn to_i64_at(&self, path: &[PathComponent<'_>]) -> Result<i64, Error> {
        self.get(path).map_or(Ok(0), LazyNode::to_i64)
    }

    /// [`to_f32`](LazyNode::to_f32) at `path`, or `0.0`.
    ///
    /// # Errors
    ///
    /// Only when the value exists and cannot be coerced.
    pub fn to_f32_at(&self, path: &[PathComponent<'_>]) -> Result<f32, Error> {
        self.get(path).map_or(Ok(0.0), LazyNode::to_f32)
    }

    /// [`to_f64`](LazyNode::to_f64) at `path`, or `0.0`.
    ///
    /// # Errors
    ///
    /// Only when the value exists and cannot be coerced.
    pub fn to_f64_at(&self, path: &[PathComponent<'_>]) -> Result<f64, Error> {
        self.get(path).map_or(Ok(0.0), LazyNode::to_f64)
    }

    /// Encoded text of the value at `path`.
    #[must_use]
    pub fn to_text_at(&self, path: &[PathComponent<'_>]) -> Option<Cow<'_, str>> {
        self.get(path).map(LazyNode::to_text)
    }

    /// Materializes the value at `path`.
    ///
    /// # Errors
    ///
    /// Only when the value exists and fails to decode.
    pub fn object_at(&self, path: &[PathComponent<'_>]) -> Result<Option<Value>, Error> {
        self.get(path).map(LazyNode::object).transpose()
    }

    /// The unescaped content of a string value.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] for anything but a string.
    pub fn to_str(&self) -> Result<Cow<'_, str>, Error> {
        match self {
            Self::String(s) => s.to_str(),
            other => Err(Error::mismatch(ValueType::String, other.value_type())),
        }
    }

    /// [`to_str`](Self::to_str) at `path`.
    ///
    /// # Errors
    ///
    /// Only when the value exists and is not a valid string.
    pub fn to_str_at(&self, path: &[PathComponent<'_>]) -> Result<Option<Cow<'_, str>>, Error> {
        self.get(path).map(Self::to_str).transpose()
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&ArrayNode> {
        if let Self::Array(a) = self { Some(a) } else { None }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectNode> {
        if let Self::Object(o) = self { Some(o) } else { None }
    }

    #[must_use]
    pub fn as_string(&self) -> Option<&StringNode> {
        if let Self::String(s) = self { Some(s) } else { None }
    }
}

#[cfg(feature = "serde")]
impl LazyValue {
    /// Decodes the value into a new `T`.
    ///
    /// # Errors
    ///
    /// A decode error if the bytes do not describe a `T`, or
    /// [`Error::DecoderBusy`] when called from inside another decode on this
    /// thread (for example from a `Deserialize` impl).
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, Error> {
        pool::with_decoder(self.span(), crate::Decoder::decode_as::<T>)
    }

    /// [`deserialize`](Self::deserialize) at `path`.
    ///
    /// # Errors
    ///
    /// Only when the value exists and fails to decode.
    pub fn deserialize_at<T: serde::de::DeserializeOwned>(
        &self,
        path: &[PathComponent<'_>],
    ) -> Result<Option<T>, Error> {
        self.get(path).map(Self::deserialize::<T>).transpose()
    }

    /// Decodes the value into the existing `target` and returns it.
    ///
    /// Binding goes through `Deserialize::deserialize_in_place`: a `Vec` or
    /// `String` target reuses its allocation, and a type with its own
    /// in-place impl can keep fields the input leaves out. Derived structs
    /// are rebuilt field by field. Use [`bind_seed`](Self::bind_seed) for
    /// anything else that merges.
    ///
    /// # Errors
    ///
    /// As [`deserialize`](Self::deserialize).
    pub fn bind_to<T: serde::de::DeserializeOwned>(&self, mut target: T) -> Result<T, Error> {
        pool::with_decoder(self.span(), |d| d.bind(&mut target))?;
        Ok(target)
    }

    /// [`bind_to`](Self::bind_to) at `path`. Returns `None`, dropping
    /// `target`, when nothing is there.
    ///
    /// # Errors
    ///
    /// Only when the value exists and fails to decode.
    pub fn bind_to_at<T: serde::de::DeserializeOwned>(
        &self,
        path: &[PathComponent<'_>],
        target: T,
    ) -> Result<Option<T>, Error> {
        self.get(path).map(|v| v.bind_to(target)).transpose()
    }

    /// Decodes the value through `seed`, which chooses the result type and
    /// may carry state to decode into.
    ///
    /// # Errors
    ///
    /// As [`deserialize`](Self::deserialize).
    pub fn bind_seed<'de, S: serde::de::DeserializeSeed<'de>>(
        &self,
        seed: S,
    ) -> Result<S::Value, Error> {
        pool::with_decoder(self.span(), |d| d.bind_seed(seed))
    }

    /// [`bind_seed`](Self::bind_seed) at `path`. Returns `None`, dropping
    /// `seed`, when nothing is there.
    ///
    /// # Errors
    ///
    /// Only when the value exists and fails to decode.
    pub fn bind_seed_at<'de, S: serde::de::DeserializeSeed<'de>>(
        &self,
        path: &[PathComponent<'_>],
        seed: S,
    ) -> Result<Option<S::Value>, Error> {
        self.get(path).map(|v| v.bind_seed(seed)).transpose()
    }
}

impl<'a> IntoIterator for &'a LazyValue {
    type Item = &'a LazyValue;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl fmt::Display for LazyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for LazyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null(_) => "Null",
            Self::Boolean(_) => "Boolean",
            Self::Number(_) => "Number",
            Self::String(_) => "String",
            Self::Array(_) => "Array",
            Self::Object(_) => "Object",
            Self::Invalid(_) => "Invalid",
        };
        f.debug_tuple(name).field(&self.span().as_bstr()).finish()
    }
}

/// Values are equal when their encoded bytes are.
impl PartialEq for LazyValue {
    fn eq(&self, other: &Self) -> bool {
        self.span() == other.span()
    }
}

impl Eq for LazyValue {}

/// Compares the encoded text, so a string value equals its quoted literal.
impl PartialEq<str> for LazyValue {
    fn eq(&self, other: &str) -> bool {
        self.span().as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for LazyValue {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}
