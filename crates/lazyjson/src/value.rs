//! Materialized JSON values.
//!
//! [`Value`] is what a lazy node turns into when the caller asks for the whole
//! thing at once with [`LazyNode::object`](crate::LazyNode::object). It owns
//! its data and no longer refers to the input buffer.
use alloc::{collections::BTreeMap, string::String, vec::Vec};
use core::fmt::{self, Write as _};

use crate::ValueType;

pub type Map = BTreeMap<String, Value>;
pub type Array = Vec<Value>;

/// A fully decoded JSON value as defined by [RFC 8259].
///
/// # Examples
///
/// ```
/// use lazyjson::{LazyNode, LazyValue, Value};
///
/// let lazy = LazyValue::parse(r#"{"key":"value"}"#).unwrap();
/// let value = lazy.object().unwrap();
/// assert_eq!(value.to_string(), r#"{"key":"value"}"#);
/// assert_eq!(value.get("key"), Some(&Value::String("value".into())));
/// ```
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Array),
    Object(Map),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl Value {
    /// The shape of this value. Never [`ValueType::Invalid`].
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Null => ValueType::Null,
            Self::Boolean(_) => ValueType::Boolean,
            Self::Number(_) => ValueType::Number,
            Self::String(_) => ValueType::String,
            Self::Array(_) => ValueType::Array,
            Self::Object(_) => ValueType::Object,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Boolean(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Looks up a field of an object value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key)
    }
}

/// Writes `src` as a quoted JSON string literal.
///
/// Quotes, backslashes, BMP control characters and U+2028/U+2029 are
/// escaped; everything else is written as is.
fn write_quoted<W: fmt::Write>(f: &mut W, src: &str) -> fmt::Result {
    f.write_char('"')?;
    let mut rest = src;
    while let Some(at) = rest.find(|c: char| {
        matches!(c, '"' | '\\' | '\u{2028}' | '\u{2029}') || (c.is_control() && (c as u32) <= 0xFFFF)
    }) {
        f.write_str(&rest[..at])?;
        let mut chars = rest[at..].chars();
        match chars.next() {
            Some('"') => f.write_str("\\\"")?,
            Some('\\') => f.write_str("\\\\")?,
            Some(c) => write!(f, "\\u{:04X}", c as u32)?,
            None => break,
        }
        rest = chars.as_str();
    }
    f.write_str(rest)?;
    f.write_char('"')
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write_quoted(f, s),
            Value::Array(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char(']')
            }
            Value::Object(fields) => {
                f.write_char('{')?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write_quoted(f, key)?;
                    write!(f, ":{value}")?;
                }
                f.write_char('}')
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{Map, Value};
    use crate::ValueType;

    #[test]
    fn display_escapes_strings_and_keys() {
        let value = Value::Object(Map::from([(
            "a\"b".into(),
            Value::Array(vec!["tab\there".into(), "\u{2028}".into(), Value::Null, 1.5.into(), true.into()]),
        )]));
        assert_eq!(value.to_string(), r#"{"a\"b":["tab\u0009here","\u2028",null,1.5,true]}"#);
    }

    #[test]
    fn accessors_match_shape() {
        let value: Value = "x".into();
        assert_eq!(value.value_type(), ValueType::String);
        assert_eq!(value.as_str(), Some("x"));
        assert_eq!(value.as_bool(), None);
        assert_eq!(value.get("x"), None);
        assert_eq!(Value::default().value_type(), ValueType::Null);

        let list = Value::Array(vec![2.5.into(), Value::Null]);
        let items = list.as_array().unwrap();
        assert_eq!(items[0].as_f64(), Some(2.5));
        assert_eq!(items[1].as_f64(), None);
        assert_eq!(items[1].value_type(), ValueType::Null);
        assert_eq!(list.as_object(), None);
        assert_eq!(value.as_array(), None);
    }
}
