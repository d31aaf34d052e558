/// Configuration for building a root [`LazyValue`](crate::LazyValue).
///
/// # Default
///
/// Input is validated up front and trailing data is rejected.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Whether to check the whole document for syntax errors when the root is
    /// built.
    ///
    /// Validation is a single skip over the input and allocates nothing. When
    /// disabled, the root is located with a structural scan only: malformed
    /// bytes are reported later, by whichever accessor first decodes them,
    /// and container children that do not look like JSON values become
    /// [`ValueType::Invalid`](crate::ValueType::Invalid) nodes.
    ///
    /// # Default
    ///
    /// `true`
    pub validate: bool,

    /// Whether to accept non-whitespace bytes after the root value.
    ///
    /// When `true`, the root span ends where the first value ends and the rest
    /// of the buffer is ignored. This suits buffers holding a value followed
    /// by unrelated data.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_trailing: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            validate: true,
            allow_trailing: false,
        }
    }
}
