use alloc::{collections::BTreeMap, sync::Arc, vec::Vec};
use std::sync::OnceLock;

use super::{Iter, Keys, LazyNode, LazyValue, scan};
use crate::{Span, ValueType};

/// A JSON array. Its elements are located on first navigation and kept.
#[derive(Debug, Clone)]
pub struct ArrayNode {
    span: Span,
    items: OnceLock<Vec<LazyValue>>,
}

impl ArrayNode {
    pub(crate) fn new(span: Span) -> Self {
        Self {
            span,
            items: OnceLock::new(),
        }
    }

    /// The elements, in encoded order.
    #[must_use]
    pub fn items(&self) -> &[LazyValue] {
        self.items.get_or_init(|| scan::array_items(&self.span))
    }
}

impl LazyNode for ArrayNode {
    fn value_type(&self) -> ValueType {
        ValueType::Array
    }

    fn span(&self) -> &Span {
        &self.span
    }

    fn size(&self) -> usize {
        self.items().len()
    }

    fn iter(&self) -> Iter<'_> {
        Iter::Values(self.items().iter())
    }

    fn get_index(&self, index: usize) -> Option<&LazyValue> {
        self.items().get(index)
    }
}

/// One member of an object: the unescaped key and the value's node.
#[derive(Debug, Clone)]
pub struct Field {
    key: Arc<str>,
    value: LazyValue,
}

impl Field {
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn value(&self) -> &LazyValue {
        &self.value
    }
}

/// Fields in encoded order, plus a key lookup.
///
/// A repeated key keeps the position of its first occurrence and the value
/// of its last, the same outcome as materializing the object.
#[derive(Debug, Clone, Default)]
pub(crate) struct ObjectIndex {
    pub(super) fields: Vec<Field>,
    positions: BTreeMap<Arc<str>, usize>,
}

impl ObjectIndex {
    pub(crate) fn insert(&mut self, key: Arc<str>, value: LazyValue) {
        if let Some(&at) = self.positions.get(&key) {
            self.fields[at].value = value;
        } else {
            self.positions.insert(Arc::clone(&key), self.fields.len());
            self.fields.push(Field { key, value });
        }
    }

    fn get(&self, key: &str) -> Option<&LazyValue> {
        self.positions.get(key).map(|&at| &self.fields[at].value)
    }
}

/// A JSON object. Its fields are located on first navigation and kept.
#[derive(Debug, Clone)]
pub struct ObjectNode {
    span: Span,
    index: OnceLock<ObjectIndex>,
}

impl ObjectNode {
    pub(crate) fn new(span: Span) -> Self {
        Self {
            span,
            index: OnceLock::new(),
        }
    }

    fn index(&self) -> &ObjectIndex {
        self.index.get_or_init(|| scan::object_fields(&self.span))
    }

    /// The fields, in encoded order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.index().fields
    }

    /// `(key, value)` pairs in encoded order.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = (&str, &LazyValue)> {
        self.fields().iter().map(|f| (f.key(), f.value()))
    }
}

impl LazyNode for ObjectNode {
    fn value_type(&self) -> ValueType {
        ValueType::Object
    }

    fn span(&self) -> &Span {
        &self.span
    }

    fn size(&self) -> usize {
        self.fields().len()
    }

    fn keys(&self) -> Keys<'_> {
        Keys::new(self.fields())
    }

    fn iter(&self) -> Iter<'_> {
        Iter::Fields(self.fields().iter())
    }

    fn get_key(&self, key: &str) -> Option<&LazyValue> {
        self.index().get(key)
    }
}
