// SPDX-License-Identifier: Apache-2.0

use crate::int_parser::{from_ascii_i64, from_ascii_u64, ConstParseIntegerError};
use crate::parse_error::{ErrKind, ParseError};
use crate::slice_input_buffer::SliceInputBuffer;

/// A number recognised at the cursor: its parsed value and the length of the
/// literal in bytes. Nothing is consumed until the caller commits `len`.
#[derive(Debug, PartialEq)]
pub struct ScannedNumber<T> {
    pub value: T,
    pub len: usize,
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn type_error(buffer: &SliceInputBuffer<'_>, kind: ErrKind, offset: usize) -> ParseError {
    ParseError::new(kind, buffer.peek_at(offset), buffer.current_pos() + offset)
}

/// Shared integer recognition for the unsigned and signed readers.
///
/// Takes the optional sign and the longest run of digits. Fails without
/// consuming when there are no digits or when a fraction or exponent follows,
/// since such a literal has no lossless integer value.
fn scan_integer_literal<'a>(
    buffer: &SliceInputBuffer<'a>,
    allow_sign: bool,
) -> Result<&'a [u8], ParseError> {
    let bytes = buffer.remaining();
    let sign_len = match buffer.peek_byte() {
        b'-' if allow_sign => 1,
        b'-' => return Err(type_error(buffer, ErrKind::NegativeUnsigned, 0)),
        _ => 0,
    };
    let digits = count_digits(bytes.get(sign_len..).unwrap_or(&[]));
    if digits == 0 {
        return Err(type_error(buffer, ErrKind::NotANumber, sign_len));
    }
    let len = sign_len + digits;
    if matches!(buffer.peek_at(len), b'.' | b'e' | b'E') {
        return Err(type_error(buffer, ErrKind::NotAnInteger, len));
    }
    Ok(&bytes[..len])
}

fn map_int_error(buffer: &SliceInputBuffer<'_>, err: ConstParseIntegerError) -> ParseError {
    match err {
        ConstParseIntegerError::Overflow => type_error(buffer, ErrKind::NumberOutOfRange, 0),
        _ => type_error(buffer, ErrKind::NotANumber, 0),
    }
}

/// Recognise an unsigned integer at the cursor.
pub fn scan_unsigned(buffer: &SliceInputBuffer<'_>) -> Result<ScannedNumber<u64>, ParseError> {
    let literal = scan_integer_literal(buffer, false)?;
    let value = from_ascii_u64(literal).map_err(|e| map_int_error(buffer, e))?;
    Ok(ScannedNumber {
        value,
        len: literal.len(),
    })
}

/// Recognise a signed integer at the cursor.
pub fn scan_signed(buffer: &SliceInputBuffer<'_>) -> Result<ScannedNumber<i64>, ParseError> {
    let literal = scan_integer_literal(buffer, true)?;
    let value = from_ascii_i64(literal).map_err(|e| map_int_error(buffer, e))?;
    Ok(ScannedNumber {
        value,
        len: literal.len(),
    })
}

/// Length of the JSON number literal at the cursor:
/// `-? digits ( . digits )? ( [eE] [+-]? digits )?`
///
/// Leading zeros in the integer part are accepted.
pub fn json_number_len(buffer: &SliceInputBuffer<'_>) -> Result<usize, ParseError> {
    let bytes = buffer.remaining();
    let first = buffer.peek_byte();
    if first != b'-' && !first.is_ascii_digit() {
        return Err(type_error(buffer, ErrKind::NotANumber, 0));
    }

    let syntax_error = |at: usize| {
        ParseError::new(
            ErrKind::InvalidNumber,
            buffer.peek_at(at),
            buffer.current_pos() + at,
        )
    };
    let digits_from = |at: usize| count_digits(bytes.get(at..).unwrap_or(&[]));

    let mut len = usize::from(first == b'-');
    let int_digits = digits_from(len);
    if int_digits == 0 {
        return Err(syntax_error(len));
    }
    len += int_digits;

    if buffer.peek_at(len) == b'.' {
        len += 1;
        let frac_digits = digits_from(len);
        if frac_digits == 0 {
            return Err(syntax_error(len));
        }
        len += frac_digits;
    }

    if matches!(buffer.peek_at(len), b'e' | b'E') {
        len += 1;
        if matches!(buffer.peek_at(len), b'+' | b'-') {
            len += 1;
        }
        let exp_digits = digits_from(len);
        if exp_digits == 0 {
            return Err(syntax_error(len));
        }
        len += exp_digits;
    }

    Ok(len)
}

/// Recognise any JSON number at the cursor as an `f64`.
///
/// Conversion goes through `core`'s `f64::from_str`, which always uses `.` as
/// the decimal separator regardless of any process locale.
#[cfg(feature = "float")]
pub fn scan_float(buffer: &SliceInputBuffer<'_>) -> Result<ScannedNumber<f64>, ParseError> {
    let len = json_number_len(buffer)?;
    let literal = buffer
        .remaining()
        .get(..len)
        .and_then(|bytes| core::str::from_utf8(bytes).ok())
        .ok_or_else(|| type_error(buffer, ErrKind::InvalidNumber, 0))?;
    let value = literal
        .parse::<f64>()
        .map_err(|_| type_error(buffer, ErrKind::InvalidNumber, 0))?;
    Ok(ScannedNumber { value, len })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(input: &str) -> SliceInputBuffer<'_> {
        SliceInputBuffer::new(input.as_bytes())
    }

    #[test]
    fn test_scan_unsigned() {
        assert_eq!(
            scan_unsigned(&at("123,")),
            Ok(ScannedNumber { value: 123, len: 3 })
        );
        assert_eq!(
            scan_unsigned(&at("0]")),
            Ok(ScannedNumber { value: 0, len: 1 })
        );
    }

    #[test]
    fn test_scan_unsigned_rejections() {
        let err = scan_unsigned(&at("-5")).unwrap_err();
        assert_eq!(err.kind(), ErrKind::NegativeUnsigned);
        assert_eq!(err.position(), 0);

        let err = scan_unsigned(&at("3.14e2")).unwrap_err();
        assert_eq!(err.kind(), ErrKind::NotAnInteger);
        assert_eq!(err.character(), b'.');
        assert_eq!(err.position(), 1);

        let err = scan_unsigned(&at("1E5")).unwrap_err();
        assert_eq!(err.kind(), ErrKind::NotAnInteger);

        let err = scan_unsigned(&at("\"1\"")).unwrap_err();
        assert_eq!(err.kind(), ErrKind::NotANumber);

        let err = scan_unsigned(&at("99999999999999999999")).unwrap_err();
        assert_eq!(err.kind(), ErrKind::NumberOutOfRange);
        assert!(err.is_type_mismatch());
    }

    #[test]
    fn test_scan_signed() {
        assert_eq!(
            scan_signed(&at("-42 ")),
            Ok(ScannedNumber { value: -42, len: 3 })
        );
        let err = scan_signed(&at("-x")).unwrap_err();
        assert_eq!(err.kind(), ErrKind::NotANumber);
        assert_eq!(err.position(), 1);
        let err = scan_signed(&at("-1e3")).unwrap_err();
        assert_eq!(err.kind(), ErrKind::NotAnInteger);
    }

    #[test]
    fn test_json_number_len() {
        assert_eq!(json_number_len(&at("0")), Ok(1));
        assert_eq!(json_number_len(&at("-12.50e+3,")), Ok(9));
        assert_eq!(json_number_len(&at("1E-7}")), Ok(4));
        assert_eq!(json_number_len(&at("007")), Ok(3));
    }

    #[test]
    fn test_json_number_len_errors() {
        let err = json_number_len(&at("-")).unwrap_err();
        assert_eq!(err.kind(), ErrKind::InvalidNumber);
        assert!(err.is_syntax());

        let err = json_number_len(&at("1.")).unwrap_err();
        assert_eq!(err.kind(), ErrKind::InvalidNumber);
        assert_eq!(err.position(), 2);

        let err = json_number_len(&at("1e+")).unwrap_err();
        assert_eq!(err.kind(), ErrKind::InvalidNumber);
        assert_eq!(err.position(), 3);

        let err = json_number_len(&at(".5")).unwrap_err();
        assert_eq!(err.kind(), ErrKind::NotANumber);

        let err = json_number_len(&at("+5")).unwrap_err();
        assert_eq!(err.kind(), ErrKind::NotANumber);
    }

    #[cfg(feature = "float")]
    #[test]
    fn test_scan_float() {
        assert_eq!(
            scan_float(&at("3.14e2")),
            Ok(ScannedNumber {
                value: 314.0,
                len: 6
            })
        );
        assert_eq!(
            scan_float(&at("-5")),
            Ok(ScannedNumber {
                value: -5.0,
                len: 2
            })
        );
        assert_eq!(scan_float(&at("0.5]")).map(|n| n.value), Ok(0.5));
    }
}
