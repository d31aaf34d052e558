//! `serde` support: binding a span directly into Rust types.
//!
//! The decoder never hands out data borrowed for `'de`, so targets that need
//! zero-copy `&'de str` fields are rejected by serde with a type error.

use serde::de::{
    self, DeserializeOwned, DeserializeSeed, EnumAccess, MapAccess, SeqAccess, VariantAccess,
    Visitor, value::StrDeserializer,
};

use super::{Decoder, NumberLexeme};
use crate::error::{DecodeError, SyntaxError};

impl Decoder {
    /// Custom errors raised by visitors carry no position; attach the
    /// cursor's.
    fn locate(&self, mut err: DecodeError) -> DecodeError {
        if matches!(err.source, SyntaxError::Custom(_)) {
            err.offset = self.pos;
        }
        err
    }

    /// Decodes the whole span as a new `T`.
    pub fn decode_as<T: DeserializeOwned>(&mut self) -> Result<T, DecodeError> {
        let value = T::deserialize(&mut *self).map_err(|e| self.locate(e))?;
        self.finish()?;
        Ok(value)
    }

    /// Decodes the whole span into the existing `target` through
    /// [`Deserialize::deserialize_in_place`](serde::Deserialize::deserialize_in_place).
    ///
    /// Types that implement it reuse their storage or keep state the input
    /// does not mention. Others are replaced. On failure `target` may be
    /// partially updated.
    pub fn bind<T: DeserializeOwned>(&mut self, target: &mut T) -> Result<(), DecodeError> {
        T::deserialize_in_place(&mut *self, target).map_err(|e| self.locate(e))?;
        self.finish()
    }

    /// Decodes the whole span through an explicit seed, which decides the
    /// shape of the result and may carry state to fill in.
    pub fn bind_seed<'de, S: DeserializeSeed<'de>>(&mut self, seed: S) -> Result<S::Value, DecodeError> {
        let value = seed.deserialize(&mut *self).map_err(|e| self.locate(e))?;
        self.finish()?;
        Ok(value)
    }

    fn visit_number<'de, V: Visitor<'de>>(
        lexeme: NumberLexeme<'_>,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        if !lexeme.is_float() {
            if let Ok(v) = lexeme.to_i64() {
                return visitor.visit_i64(v);
            }
            if let Some(v) = lexeme.to_u64() {
                return visitor.visit_u64(v);
            }
        }
        visitor.visit_f64(lexeme.to_f64()?)
    }
}

impl<'de> de::Deserializer<'de> for &mut Decoder {
    type Error = DecodeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        match self.peek_token()? {
            b'n' => {
                self.read_null()?;
                visitor.visit_unit()
            }
            b't' | b'f' => {
                let b = self.read_bool()?;
                visitor.visit_bool(b)
            }
            b'-' | b'0'..=b'9' => {
                let lexeme = self.read_number()?;
                Decoder::visit_number(lexeme, visitor)
            }
            b'"' => {
                let s = self.read_str()?;
                visitor.visit_str(s)
            }
            b'[' => {
                self.begin(b'[')?;
                let mut access = Elements::new(self, b']');
                let value = visitor.visit_seq(&mut access)?;
                access.end()?;
                Ok(value)
            }
            b'{' => {
                self.begin(b'{')?;
                let mut access = Elements::new(self, b'}');
                let value = visitor.visit_map(&mut access)?;
                access.end()?;
                Ok(value)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        if self.peek_token()? == b'n' {
            self.read_null()?;
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        visitor.visit_newtype_struct(self)
    }

    /// Unit variants are plain strings; other variants are single-key
    /// objects, `{"Variant": payload}`.
    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        match self.peek_token()? {
            b'"' => {
                let variant = self.read_str()?;
                visitor.visit_enum(StrDeserializer::<DecodeError>::new(variant))
            }
            b'{' => {
                self.begin(b'{')?;
                let value = visitor.visit_enum(Variant { de: &mut *self })?;
                self.end_container(b'}')?;
                Ok(value)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        self.skip_value()?;
        visitor.visit_unit()
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier
    }
}

/// Walks the elements of an open array, or the entries of an open object.
struct Elements<'a> {
    de: &'a mut Decoder,
    close: u8,
    first: bool,
    done: bool,
}

impl<'a> Elements<'a> {
    fn new(de: &'a mut Decoder, close: u8) -> Self {
        Self {
            de,
            close,
            first: true,
            done: false,
        }
    }

    fn advance(&mut self) -> Result<bool, DecodeError> {
        if self.done {
            return Ok(false);
        }
        let more = self.de.has_next(&mut self.first, self.close)?;
        self.done = !more;
        Ok(more)
    }

    /// The visitor may stop early; anything it left unread is an error.
    fn end(self) -> Result<(), DecodeError> {
        if self.done {
            Ok(())
        } else {
            self.de.end_container(self.close)
        }
    }
}

impl<'de> SeqAccess<'de> for Elements<'_> {
    type Error = DecodeError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, DecodeError> {
        if self.advance()? {
            seed.deserialize(&mut *self.de).map(Some)
        } else {
            Ok(None)
        }
    }
}

impl<'de> MapAccess<'de> for Elements<'_> {
    type Error = DecodeError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, DecodeError> {
        if !self.advance()? {
            return Ok(None);
        }
        let key = self.de.read_key()?;
        seed.deserialize(StrDeserializer::<DecodeError>::new(key)).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, DecodeError> {
        seed.deserialize(&mut *self.de)
    }
}

/// The `{"Variant": payload}` form of an enum.
struct Variant<'a> {
    de: &'a mut Decoder,
}

impl<'de, 'a> EnumAccess<'de> for Variant<'a> {
    type Error = DecodeError;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self), DecodeError> {
        let key = self.de.read_key()?;
        let variant = seed.deserialize(StrDeserializer::<DecodeError>::new(key))?;
        Ok((variant, self))
    }
}

impl<'de> VariantAccess<'de> for Variant<'_> {
    type Error = DecodeError;

    fn unit_variant(self) -> Result<(), DecodeError> {
        self.de.read_null()
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value, DecodeError> {
        seed.deserialize(&mut *self.de)
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, DecodeError> {
        de::Deserializer::deserialize_seq(&mut *self.de, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        de::Deserializer::deserialize_map(&mut *self.de, visitor)
    }
}
