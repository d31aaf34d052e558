use alloc::{borrow::ToOwned, vec::Vec};

use crate::{
    decoder::NumberLexeme,
    error::DecodeError,
    value::{Map, Value},
};

/// Builds the tree that [`Decoder::materialize_with`](crate::Decoder::materialize_with)
/// produces.
///
/// The decoder calls into the factory bottom-up: scalars as they are read,
/// containers once all of their children are finished. Numbers arrive as
/// their literal text so a factory can keep integers exact.
pub trait JsonFactory {
    type Value;
    type Array;
    type Object;

    fn null(&self) -> Self::Value;
    fn boolean(&self, b: bool) -> Self::Value;
    /// # Errors
    ///
    /// Whatever the factory reports for a literal it cannot represent.
    fn number(&self, lexeme: NumberLexeme<'_>) -> Result<Self::Value, DecodeError>;
    fn string(&self, s: &str) -> Self::Value;

    fn begin_array(&self) -> Self::Array;
    fn push(&self, array: &mut Self::Array, value: Self::Value);
    fn end_array(&self, array: Self::Array) -> Self::Value;

    fn begin_object(&self) -> Self::Object;
    fn insert(&self, object: &mut Self::Object, key: &str, value: Self::Value);
    fn end_object(&self, object: Self::Object) -> Self::Value;
}

/// Factory producing [`Value`] trees.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdFactory;

impl JsonFactory for StdFactory {
    type Value = Value;
    type Array = Vec<Value>;
    type Object = Map;

    fn null(&self) -> Value {
        Value::Null
    }

    fn boolean(&self, b: bool) -> Value {
        Value::Boolean(b)
    }

    fn number(&self, lexeme: NumberLexeme<'_>) -> Result<Value, DecodeError> {
        lexeme.to_f64().map(Value::Number)
    }

    fn string(&self, s: &str) -> Value {
        Value::String(s.to_owned())
    }

    fn begin_array(&self) -> Vec<Value> {
        Vec::new()
    }

    fn push(&self, array: &mut Vec<Value>, value: Value) {
        array.push(value);
    }

    fn end_array(&self, array: Vec<Value>) -> Value {
        Value::Array(array)
    }

    fn begin_object(&self) -> Map {
        Map::new()
    }

    /// Later duplicates of a key replace earlier ones.
    fn insert(&self, object: &mut Map, key: &str, value: Value) {
        object.insert(key.to_owned(), value);
    }

    fn end_object(&self, object: Map) -> Value {
        Value::Object(object)
    }
}
