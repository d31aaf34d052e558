//! Deferred JSON decoding.
//!
//! [`LazyValue::parse`] wraps an input buffer without building a tree. The
//! result can be navigated by key and index, and only the values the caller
//! actually reads are decoded: scalars are coerced on demand, containers
//! locate their children's spans the first time they are navigated, and
//! [`LazyNode::object`] or [`LazyValue::deserialize`] materialize a subtree
//! when a whole value is needed.
//!
//! ```
//! use lazyjson::{LazyNode, LazyValue, path};
//!
//! let doc = LazyValue::parse(r#"{"a": {"b": 7}, "list": [1, 2, 3]}"#)?;
//! assert_eq!(doc.get(&path!["a", "b"]).unwrap().to_i32()?, 7);
//! assert!(doc.get(&path!["x"]).is_none());
//! assert_eq!(doc.to_i32_at(&path!["x"])?, 0);
//! assert_eq!(doc.get(&path!["list", 1]).unwrap().to_text(), "2");
//! # Ok::<(), lazyjson::Error>(())
//! ```
//!
//! All decoding on a thread goes through one [`Decoder`] kept in the
//! [`pool`]. Decoding is not reentrant: starting a decode from inside
//! another one on the same thread fails with [`Error::DecoderBusy`].

#![allow(missing_docs)]
extern crate alloc;

mod decoder;
mod error;
mod escape;
mod factory;
mod lazy;
mod options;
mod path;
pub mod pool;
mod span;
mod value;
mod value_type;

#[cfg(test)]
mod tests;

pub use decoder::{Decoder, MAX_DEPTH, NumberLexeme};
pub use error::{DecodeError, Error, SyntaxError};
pub use factory::{JsonFactory, StdFactory};
pub use lazy::{
    ArrayNode, BooleanNode, Field, InvalidNode, Iter, Keys, LazyNode, LazyValue, NullNode,
    NumberNode, ObjectNode, StringNode,
};
pub use options::ParseOptions;
pub use path::{PathComponent, PathComponentFrom, resolve};
pub use span::Span;
pub use value::{Array, Map, Value};
pub use value_type::ValueType;

/// Builds a path from a mix of keys and indices, as an array that can be
/// borrowed as a `&[PathComponent]`.
///
/// ```rust
/// use lazyjson::{PathComponent, path};
///
/// let p = path![0, "foo", 2];
/// assert_eq!(
///     p,
///     [
///         PathComponent::Index(0),
///         PathComponent::Key("foo"),
///         PathComponent::Index(2)
///     ]
/// );
/// ```
#[macro_export]
macro_rules! path {
    ( $( $elem:expr ),* $(,)? ) => {{
        #[allow(unused_imports)]
        use $crate::PathComponentFrom;
        [$($crate::PathComponent::from_path_component($elem)),*]
    }};
}
