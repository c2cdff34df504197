// SPDX-License-Identifier: Apache-2.0

use crate::parse_error::ErrKind;

/// Shared utilities for processing JSON escape sequences.
/// Pure functions with no cursor state; the string decoder feeds them the
/// bytes that follow a backslash.
pub struct EscapeProcessor;

impl EscapeProcessor {
    /// Process a simple escape sequence character and return the unescaped byte.
    ///
    /// # Arguments
    /// * `escape_char` - The character following the backslash in an escape sequence
    ///
    /// # Returns
    /// The unescaped byte value, or an error if the escape sequence is invalid.
    /// `u` is not a simple escape and is rejected here.
    pub fn process_simple_escape(escape_char: u8) -> Result<u8, ErrKind> {
        match escape_char {
            b'n' => Ok(b'\n'),
            b't' => Ok(b'\t'),
            b'r' => Ok(b'\r'),
            b'\\' => Ok(b'\\'),
            b'"' => Ok(b'"'),
            b'/' => Ok(b'/'),
            b'b' => Ok(0x08), // Backspace
            b'f' => Ok(0x0C), // Form feed
            _ => Err(ErrKind::InvalidEscapeSequence),
        }
    }

    /// Validate that a byte represents a valid hexadecimal digit.
    ///
    /// # Returns
    /// The numeric value (0-15) of the hex digit, or an error if invalid.
    pub fn validate_hex_digit(byte: u8) -> Result<u16, ErrKind> {
        match byte {
            b'0'..=b'9' => Ok((byte - b'0') as u16),
            b'a'..=b'f' => Ok((byte - b'a' + 10) as u16),
            b'A'..=b'F' => Ok((byte - b'A' + 10) as u16),
            _ => Err(ErrKind::InvalidUnicodeHex),
        }
    }

    /// Check if a code unit falls in the UTF-16 surrogate range (0xD800-0xDFFF)
    pub fn is_surrogate(code_unit: u16) -> bool {
        (0xD800..=0xDFFF).contains(&code_unit)
    }

    /// Decode the four hex digits of a `\uXXXX` escape into a character.
    ///
    /// Exactly one 16-bit code unit is decoded; surrogate halves are not
    /// combined into pairs and are rejected since they have no UTF-8 encoding
    /// on their own. Everything else lands in the Basic Multilingual Plane and
    /// encodes to 1, 2 or 3 UTF-8 bytes.
    ///
    /// On failure returns the kind and the offset of the offending digit
    /// within `hex` (4 when `hex` is short).
    pub fn decode_unicode_escape(hex: &[u8]) -> Result<char, (ErrKind, usize)> {
        let mut code_unit = 0u16;
        for index in 0..4 {
            let byte = hex.get(index).copied().unwrap_or(0);
            let digit =
                Self::validate_hex_digit(byte).map_err(|kind| (kind, index.min(hex.len())))?;
            code_unit = (code_unit << 4) | digit;
        }

        if Self::is_surrogate(code_unit) {
            return Err((ErrKind::InvalidUnicodeCodepoint, 0));
        }
        char::from_u32(code_unit as u32).ok_or((ErrKind::InvalidUnicodeCodepoint, 0))
    }
}
