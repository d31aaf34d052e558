//! Access paths into a lazy document.
//!
//! A path is a plain slice of [`PathComponent`]s. Resolution walks it left to
//! right and stops at the first component that does not match, so the cost is
//! proportional to the depth actually reached and nothing is decoded on the
//! way.

use crate::{LazyNode, LazyValue};

/// One step of a path: an object key or an array index.
///
/// # Examples
///
/// ```
/// use lazyjson::PathComponent;
///
/// let key = PathComponent::Key("foo");
/// assert_eq!(key.as_key(), Some("foo"));
///
/// let idx = PathComponent::Index(3);
/// assert_eq!(idx.as_index(), Some(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathComponent<'a> {
    Key(&'a str),
    Index(usize),
}

impl PathComponent<'_> {
    #[must_use]
    /// Returns the index if this component is an index, otherwise `None`.
    pub fn as_index(&self) -> Option<usize> {
        if let Self::Index(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    #[must_use]
    /// Returns the key if this component is a key, otherwise `None`.
    pub fn as_key(&self) -> Option<&str> {
        if let Self::Key(v) = self {
            Some(v)
        } else {
            None
        }
    }
}

impl<'a> From<&'a str> for PathComponent<'a> {
    fn from(s: &'a str) -> Self {
        Self::Key(s)
    }
}

impl From<usize> for PathComponent<'_> {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

#[doc(hidden)]
pub trait PathComponentFrom<'a, T> {
    fn from_path_component(value: T) -> PathComponent<'a>;
}

// Negative indices cannot address anything; they map to an index no array
// can reach so resolution misses instead of wrapping around.
macro_rules! impl_integer_as_path_component {
    ($($t:ty),+) => {
        $(
            impl<'a> PathComponentFrom<'a, $t> for PathComponent<'a> {
                fn from_path_component(value: $t) -> Self {
                    PathComponent::Index(usize::try_from(value).unwrap_or(usize::MAX))
                }
            }
        )+
    };
}
impl_integer_as_path_component!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<'a> PathComponentFrom<'a, &'a str> for PathComponent<'a> {
    fn from_path_component(value: &'a str) -> Self {
        PathComponent::Key(value)
    }
}

impl<'a> PathComponentFrom<'a, &'a alloc::string::String> for PathComponent<'a> {
    fn from_path_component(value: &'a alloc::string::String) -> Self {
        PathComponent::Key(value.as_str())
    }
}

impl<'a> PathComponentFrom<'a, PathComponent<'a>> for PathComponent<'a> {
    fn from_path_component(value: PathComponent<'a>) -> Self {
        value
    }
}

/// Resolves `path` against `root`.
///
/// Each component is looked up on the node produced by the previous one; the
/// first miss ends the walk and the result is `None`. An empty path resolves
/// to `root` itself.
#[must_use]
pub fn resolve<'v>(root: &'v LazyValue, path: &[PathComponent<'_>]) -> Option<&'v LazyValue> {
    path.iter().try_fold(root, |node, component| match *component {
        PathComponent::Key(key) => node.get_key(key),
        PathComponent::Index(index) => node.get_index(index),
    })
}
