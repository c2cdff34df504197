// SPDX-License-Identifier: Apache-2.0

/// Category of the token under the cursor, as reported by
/// [`Decoder::peek`](crate::Decoder::peek).
///
/// This is a hint taken from a single byte; it does not promise that a
/// well-formed token follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// `[` or `]`
    Array,
    /// `{` or `}`
    Object,
    /// `"`
    String,
    /// A digit or `-`
    Number,
    /// `t` or `f`
    Boolean,
    /// `n`
    Null,
}

impl ValueType {
    /// Classify a token by its first byte.
    pub fn from_first_byte(byte: u8) -> Option<Self> {
        match byte {
            b'[' | b']' => Some(ValueType::Array),
            b'{' | b'}' => Some(ValueType::Object),
            b'"' => Some(ValueType::String),
            b'0'..=b'9' | b'-' => Some(ValueType::Number),
            b't' | b'f' => Some(ValueType::Boolean),
            b'n' => Some(ValueType::Null),
            _ => None,
        }
    }
}

/// Default bound on container nesting.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Decoder configuration.
///
/// # Example
/// ```
/// use pulljson::{Decoder, DecoderConfig};
/// let decoder = Decoder::with_config(DecoderConfig::new().max_depth(16));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    pub(crate) max_depth: usize,
}

impl DecoderConfig {
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Maximum number of containers open at once. Opening one more fails
    /// with [`ErrKind::MaxDepthReached`](crate::ErrKind::MaxDepthReached).
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// True when `byte` may continue a bare keyword such as `true` or `null`.
pub(crate) fn is_keyword_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_from_first_byte() {
        assert_eq!(ValueType::from_first_byte(b'['), Some(ValueType::Array));
        assert_eq!(ValueType::from_first_byte(b']'), Some(ValueType::Array));
        assert_eq!(ValueType::from_first_byte(b'}'), Some(ValueType::Object));
        assert_eq!(ValueType::from_first_byte(b'"'), Some(ValueType::String));
        assert_eq!(ValueType::from_first_byte(b'-'), Some(ValueType::Number));
        assert_eq!(ValueType::from_first_byte(b'7'), Some(ValueType::Number));
        assert_eq!(ValueType::from_first_byte(b'f'), Some(ValueType::Boolean));
        assert_eq!(ValueType::from_first_byte(b'n'), Some(ValueType::Null));
        assert_eq!(ValueType::from_first_byte(b','), None);
        assert_eq!(ValueType::from_first_byte(0), None);
    }

    #[test]
    fn test_config_builder() {
        assert_eq!(DecoderConfig::default().max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(DecoderConfig::new().max_depth(3).max_depth, 3);
    }
}
