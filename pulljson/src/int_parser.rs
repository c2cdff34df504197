// SPDX-License-Identifier: Apache-2.0

// Int parser module, mostly borrowed from core::num::parse::radix

/// A custom error type for const integer parsing.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ConstParseIntegerError {
    /// The input byte slice was empty.
    Empty,
    /// The input consisted only of a sign character.
    SignOnly,
    /// An invalid character was found that was not a base-10 digit.
    InvalidDigit,
    /// The number overflowed or underflowed the target integer type.
    Overflow,
}

/// Creates a panic-free, const-stable, base-10 parser for a specific integer type.
///
/// `signed` controls whether a leading `-` is accepted. JSON has no leading
/// `+`, so it is treated as an invalid digit.
macro_rules! define_const_parser {
    ($fn_name:ident, $int_ty:ty, signed = $signed:literal) => {
        /// Parses a byte slice of ASCII digits into a(n) `
        #[doc = stringify!($int_ty)]
        /// ` in a `const` context.
        ///
        /// This function is guaranteed not to panic.
        pub const fn $fn_name(src: &[u8]) -> Result<$int_ty, ConstParseIntegerError> {
            let (is_negative, mut digits) = match src {
                [] => return Err(ConstParseIntegerError::Empty),
                [b'-', rest @ ..] if $signed => (true, rest),
                _ => (false, src),
            };

            if digits.is_empty() {
                return Err(ConstParseIntegerError::SignOnly);
            }

            let mut result: $int_ty = 0;

            while let Some((&byte, rest)) = digits.split_first() {
                let digit = match byte {
                    b'0'..=b'9' => (byte - b'0') as $int_ty,
                    _ => return Err(ConstParseIntegerError::InvalidDigit),
                };

                result = match result.checked_mul(10) {
                    Some(val) => val,
                    None => return Err(ConstParseIntegerError::Overflow),
                };

                // Building the number negatively from the start correctly handles MIN.
                if is_negative {
                    result = match result.checked_sub(digit) {
                        Some(val) => val,
                        None => return Err(ConstParseIntegerError::Overflow),
                    }
                } else {
                    result = match result.checked_add(digit) {
                        Some(val) => val,
                        None => return Err(ConstParseIntegerError::Overflow),
                    }
                }

                digits = rest;
            }

            Ok(result)
        }
    };
}

define_const_parser!(from_ascii_u64, u64, signed = false);
define_const_parser!(from_ascii_i64, i64, signed = true);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ascii_u64_simple() {
        assert_eq!(from_ascii_u64(b"0"), Ok(0));
        assert_eq!(from_ascii_u64(b"42"), Ok(42));
        assert_eq!(from_ascii_u64(b"007"), Ok(7));
    }

    #[test]
    fn test_from_ascii_u64_limits() {
        assert_eq!(from_ascii_u64(b"18446744073709551615"), Ok(u64::MAX));
        assert_eq!(
            from_ascii_u64(b"18446744073709551616"),
            Err(ConstParseIntegerError::Overflow)
        );
    }

    #[test]
    fn test_from_ascii_u64_rejects_signs() {
        assert_eq!(
            from_ascii_u64(b"-1"),
            Err(ConstParseIntegerError::InvalidDigit)
        );
        assert_eq!(
            from_ascii_u64(b"+1"),
            Err(ConstParseIntegerError::InvalidDigit)
        );
        assert_eq!(from_ascii_u64(b""), Err(ConstParseIntegerError::Empty));
    }

    #[test]
    fn test_from_ascii_i64_limits() {
        assert_eq!(from_ascii_i64(b"9223372036854775807"), Ok(i64::MAX));
        assert_eq!(from_ascii_i64(b"-9223372036854775808"), Ok(i64::MIN));
        assert_eq!(
            from_ascii_i64(b"9223372036854775808"),
            Err(ConstParseIntegerError::Overflow)
        );
        assert_eq!(
            from_ascii_i64(b"-9223372036854775809"),
            Err(ConstParseIntegerError::Overflow)
        );
    }

    #[test]
    fn test_from_ascii_i64_errors() {
        assert_eq!(from_ascii_i64(b"-42"), Ok(-42));
        assert_eq!(from_ascii_i64(b"-"), Err(ConstParseIntegerError::SignOnly));
        assert_eq!(
            from_ascii_i64(b"4a"),
            Err(ConstParseIntegerError::InvalidDigit)
        );
    }

    #[test]
    fn test_const_context() {
        const ANSWER: u64 = match from_ascii_u64(b"42") {
            Ok(v) => v,
            Err(_) => 0,
        };
        assert_eq!(ANSWER, 42);
    }
}
