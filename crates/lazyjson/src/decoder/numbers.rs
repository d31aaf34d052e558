use crate::error::{DecodeError, SyntaxError};

/// The text of a number literal, with a lexical hint so callers can
/// distinguish ints vs floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberLexeme<'a> {
    /// No `.` and no exponent.
    Integer { text: &'a str, offset: usize },
    /// Has a `.` or an exponent.
    Float { text: &'a str, offset: usize },
}

// 2^63 is exactly representable; every f64 in [-2^63, 2^63) truncates into
// an i64.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

impl<'a> NumberLexeme<'a> {
    pub(crate) fn new(text: &'a str, offset: usize, is_float: bool) -> Self {
        if is_float {
            Self::Float { text, offset }
        } else {
            Self::Integer { text, offset }
        }
    }

    #[must_use]
    pub fn text(&self) -> &'a str {
        match *self {
            Self::Integer { text, .. } | Self::Float { text, .. } => text,
        }
    }

    /// Absolute offset of the literal in the input buffer.
    #[must_use]
    pub fn offset(&self) -> usize {
        match *self {
            Self::Integer { offset, .. } | Self::Float { offset, .. } => offset,
        }
    }

    #[must_use]
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float { .. })
    }

    fn out_of_range(&self) -> DecodeError {
        DecodeError::new(SyntaxError::NumberOutOfRange, self.offset())
    }

    /// Integers are parsed exactly. Fractional or exponent literals are
    /// truncated toward zero when the result fits.
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_i64(&self) -> Result<i64, DecodeError> {
        match *self {
            Self::Integer { text, .. } => text.parse().map_err(|_| self.out_of_range()),
            Self::Float { .. } => {
                let truncated = self.to_f64()?.trunc();
                if (-I64_BOUND..I64_BOUND).contains(&truncated) {
                    Ok(truncated as i64)
                } else {
                    Err(self.out_of_range())
                }
            }
        }
    }

    /// Only for integer literals; `None` for floats and negative values.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        match *self {
            Self::Integer { text, .. } => text.parse().ok(),
            Self::Float { .. } => None,
        }
    }

    pub fn to_f64(&self) -> Result<f64, DecodeError> {
        match self.text().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(self.out_of_range()),
        }
    }

    pub fn to_f32(&self) -> Result<f32, DecodeError> {
        match self.text().parse::<f32>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(self.out_of_range()),
        }
    }
}
