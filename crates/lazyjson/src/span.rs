//! Immutable views into a shared input buffer.
//!
//! A [`Span`] is the "not yet parsed" form of every lazy value: the buffer it
//! was found in plus the byte range it occupies. The buffer is a reference
//! counted [`Bytes`], so cloning a span, or deriving a child span from it,
//! never copies the document.

use alloc::borrow::Cow;
use core::{fmt, ops::Range};

use bstr::{BStr, ByteSlice};
use bytes::Bytes;

#[derive(Clone)]
pub struct Span {
    buffer: Bytes,
    start: usize,
    end: usize,
}

impl Span {
    /// Creates a span over `buffer[start..end]`.
    ///
    /// Returns `None` unless `start <= end <= buffer.len()`.
    #[must_use]
    pub fn new(buffer: Bytes, start: usize, end: usize) -> Option<Self> {
        if start <= end && end <= buffer.len() {
            Some(Self { buffer, start, end })
        } else {
            None
        }
    }

    /// A span covering the whole buffer.
    #[must_use]
    pub fn full(buffer: Bytes) -> Self {
        let end = buffer.len();
        Self {
            buffer,
            start: 0,
            end,
        }
    }

    /// Narrows to a sub-range of the same buffer. The caller guarantees the
    /// range lies within `self`.
    pub(crate) fn child(&self, start: usize, end: usize) -> Self {
        debug_assert!(self.start <= start && start <= end && end <= self.end);
        Self {
            buffer: self.buffer.clone(),
            start,
            end,
        }
    }

    #[must_use]
    pub fn buffer(&self) -> &Bytes {
        &self.buffer
    }

    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The encoded bytes of this span.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[self.start..self.end]
    }

    #[must_use]
    pub fn as_bstr(&self) -> &BStr {
        self.as_bytes().as_bstr()
    }

    /// The encoded bytes as text. Invalid UTF-8 is replaced with U+FFFD, so
    /// this never fails.
    #[must_use]
    pub fn to_text(&self) -> Cow<'_, str> {
        self.as_bytes().to_str_lossy()
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{} {:?}", self.start, self.end, self.as_bstr())
    }
}

impl PartialEq for Span {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Span {}

#[cfg(test)]
mod tests {
    use alloc::format;

    use bytes::Bytes;

    use super::Span;

    #[test]
    fn rejects_out_of_range() {
        let buffer = Bytes::from_static(b"[1,2]");
        assert!(Span::new(buffer.clone(), 3, 2).is_none());
        assert!(Span::new(buffer.clone(), 0, 6).is_none());
        assert!(Span::new(buffer.clone(), 5, 5).is_some_and(|s| s.is_empty()));
        assert_eq!(Span::new(buffer, 1, 4).unwrap().as_bytes(), b"1,2");
    }

    #[test]
    fn child_shares_the_buffer() {
        let parent = Span::full(Bytes::from_static(b"[\"ab\",3]"));
        let child = parent.child(1, 5);
        assert_eq!(child.buffer().as_ptr(), parent.buffer().as_ptr());
        assert_eq!(child.range(), 1..5);
        assert_eq!(child.to_text(), "\"ab\"");
        assert_eq!(format!("{child:?}"), r#"1..5 "\"ab\"""#);
    }

    #[test]
    fn text_is_lossy() {
        let span = Span::full(Bytes::from_static(b"\"\xff\""));
        assert_eq!(span.to_text(), "\"\u{FFFD}\"");
    }
}
