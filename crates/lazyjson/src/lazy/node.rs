use alloc::borrow::Cow;
use core::{iter::FusedIterator, slice};

use super::{LazyValue, container::Field};
use crate::{Decoder, Error, Span, Value, ValueType, pool};

/// The operations every lazy node supports.
///
/// Only [`value_type`](Self::value_type) and [`span`](Self::span) are
/// required. Everything else has a default that describes a scalar: it has
/// no children, navigation misses, and numeric or boolean coercion fails
/// with [`Error::TypeMismatch`]. Each node kind overrides the operations that
/// make sense for its shape and inherits the rest.
pub trait LazyNode {
    fn value_type(&self) -> ValueType;

    /// The encoded bytes of the value.
    fn span(&self) -> &Span;

    /// Number of elements or fields; `0` for scalars.
    fn size(&self) -> usize {
        0
    }

    /// Object keys in encoded order.
    fn keys(&self) -> Keys<'_> {
        Keys::default()
    }

    /// Array elements or object field values in encoded order. Each call
    /// starts from the beginning.
    fn iter(&self) -> Iter<'_> {
        Iter::default()
    }

    fn get_index(&self, _index: usize) -> Option<&LazyValue> {
        None
    }

    fn get_key(&self, _key: &str) -> Option<&LazyValue> {
        None
    }

    /// # Errors
    ///
    /// [`Error::TypeMismatch`] unless this is a boolean, or a decode error if
    /// its bytes are not a valid literal.
    fn to_bool(&self) -> Result<bool, Error> {
        Err(Error::mismatch(ValueType::Boolean, self.value_type()))
    }

    /// # Errors
    ///
    /// [`Error::TypeMismatch`] unless this is a number; a decode error when
    /// the number does not fit.
    fn to_i32(&self) -> Result<i32, Error> {
        Err(Error::mismatch(ValueType::Number, self.value_type()))
    }

    /// # Errors
    ///
    /// As [`to_i32`](Self::to_i32).
    fn to_i64(&self) -> Result<i64, Error> {
        Err(Error::mismatch(ValueType::Number, self.value_type()))
    }

    /// # Errors
    ///
    /// As [`to_i32`](Self::to_i32).
    fn to_f32(&self) -> Result<f32, Error> {
        Err(Error::mismatch(ValueType::Number, self.value_type()))
    }

    /// # Errors
    ///
    /// As [`to_i32`](Self::to_i32).
    fn to_f64(&self) -> Result<f64, Error> {
        Err(Error::mismatch(ValueType::Number, self.value_type()))
    }

    /// The encoded text of the value, exactly as it appears in the input.
    fn to_text(&self) -> Cow<'_, str> {
        self.span().to_text()
    }

    /// Decodes the whole value into a [`Value`] tree.
    ///
    /// # Errors
    ///
    /// Fails if the bytes are not valid JSON or the thread's decoder is busy.
    fn object(&self) -> Result<Value, Error> {
        pool::with_decoder(self.span(), Decoder::materialize)
    }
}

/// Iterator over the keys of an object node.
#[derive(Debug, Clone, Default)]
pub struct Keys<'a> {
    fields: slice::Iter<'a, Field>,
}

impl<'a> Keys<'a> {
    pub(crate) fn new(fields: &'a [Field]) -> Self {
        Self {
            fields: fields.iter(),
        }
    }
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.fields.next().map(Field::key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.fields.size_hint()
    }
}

impl DoubleEndedIterator for Keys<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.fields.next_back().map(Field::key)
    }
}

impl ExactSizeIterator for Keys<'_> {}
impl FusedIterator for Keys<'_> {}

/// Iterator over the children of a container node.
#[derive(Debug, Clone)]
pub enum Iter<'a> {
    Values(slice::Iter<'a, LazyValue>),
    Fields(slice::Iter<'a, Field>),
}

impl Default for Iter<'_> {
    fn default() -> Self {
        Self::Values(slice::Iter::default())
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a LazyValue;

    fn next(&mut self) -> Option<&'a LazyValue> {
        match self {
            Self::Values(values) => values.next(),
            Self::Fields(fields) => fields.next().map(Field::value),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Values(values) => values.size_hint(),
            Self::Fields(fields) => fields.size_hint(),
        }
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        match self {
            Self::Values(values) => values.next_back(),
            Self::Fields(fields) => fields.next_back().map(Field::value),
        }
    }
}

impl ExactSizeIterator for Iter<'_> {}
impl FusedIterator for Iter<'_> {}
