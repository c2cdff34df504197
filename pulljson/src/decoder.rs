// SPDX-License-Identifier: Apache-2.0

use alloc::borrow::Cow;
use alloc::string::String;

use crate::copy_on_escape::{decode_string, into_owned_string};
use crate::level_stack::{Level, LevelStack};
use crate::number_parser;
use crate::parse_error::{ErrKind, ParseError};
use crate::shared::{is_keyword_byte, DecoderConfig, ValueType};
use crate::slice_input_buffer::SliceInputBuffer;

/// A pull decoder driven by typed reads.
///
/// The caller opens containers, peeks, reads each value with the call that
/// matches its expected type, and closes containers again. Nothing is built
/// behind the caller's back; input is validated only as far as the reads
/// go.
///
/// The first error of a session is latched. Every later call returns that
/// same error without moving the cursor, until [`begin`] starts a new session.
///
/// Lifetime `'a` is the input buffer lifetime.
///
/// # Example
/// ```
/// use pulljson::Decoder;
///
/// let mut decoder = Decoder::new();
/// decoder.begin(r#"{"port": 8080, "tls": true}"#);
/// decoder.open_object().unwrap();
/// assert_eq!(decoder.read_string().unwrap(), "port");
/// assert_eq!(decoder.read_u64().unwrap(), 8080);
/// assert_eq!(decoder.read_string().unwrap(), "tls");
/// assert_eq!(decoder.read_bool().unwrap(), true);
/// assert!(!decoder.has_more());
/// decoder.close_object().unwrap();
/// decoder.end().unwrap();
/// ```
///
/// [`begin`]: Self::begin
#[derive(Debug)]
pub struct Decoder<'a> {
    buffer: SliceInputBuffer<'a>,
    levels: LevelStack,
    poison: Option<ParseError>,
}

impl Default for Decoder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Decoder<'a> {
    /// Creates a decoder with the default configuration and no input.
    /// Call [`begin`](Self::begin) to start a session.
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    /// Creates a decoder with a custom [`DecoderConfig`].
    pub fn with_config(config: DecoderConfig) -> Self {
        Decoder {
            buffer: SliceInputBuffer::default(),
            levels: LevelStack::new(config.max_depth),
            poison: None,
        }
    }

    /// Starts a session over `input`, discarding any previous session.
    pub fn begin(&mut self, input: &'a str) {
        self.begin_from_slice(input.as_bytes())
    }

    /// Starts a session over raw bytes, discarding any previous session.
    ///
    /// Input ends at the end of the slice or at the first NUL byte. String
    /// content that is not valid UTF-8 fails when it is read.
    pub fn begin_from_slice(&mut self, input: &'a [u8]) {
        self.teardown();
        self.buffer = SliceInputBuffer::new(input);
        self.buffer.skip_whitespace();
        log::trace!("begin session over {} bytes", input.len());
    }

    /// Ends the session.
    ///
    /// Returns the latched error if there is one, otherwise an
    /// [`ErrKind::UnclosedContainer`] error if containers are still open.
    /// The session is torn down either way.
    pub fn end(&mut self) -> Result<(), ParseError> {
        let result = match self.poison {
            Some(err) => Err(err),
            None if !self.levels.is_empty() => Err(ParseError::new(
                ErrKind::UnclosedContainer,
                self.buffer.peek_byte(),
                self.buffer.current_pos(),
            )),
            None => Ok(()),
        };
        self.teardown();
        result
    }

    fn teardown(&mut self) {
        self.levels.clear();
        self.buffer = SliceInputBuffer::default();
        self.poison = None;
    }

    /// Latches `err` unless an earlier error is already latched, and returns
    /// whichever error is latched.
    fn latch(&mut self, err: ParseError) -> ParseError {
        match self.poison {
            Some(first) => first,
            None => {
                log::debug!("decoder poisoned: {}", err);
                self.poison = Some(err);
                err
            }
        }
    }

    /// Runs `op` unless the session is poisoned, latching any error it returns.
    fn guarded<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if let Some(err) = self.poison {
            return Err(err);
        }
        op(self).map_err(|err| self.latch(err))
    }

    fn reject_key_position(&self) -> Result<(), ParseError> {
        if self.levels.expects_key() {
            return Err(ParseError::new(
                ErrKind::ExpectedKey,
                self.buffer.peek_byte(),
                self.buffer.current_pos(),
            ));
        }
        Ok(())
    }

    /// Shared shape of every scalar read: recognise the token on a copy of the
    /// cursor, run the post-value step, and only then commit.
    fn read_scalar<T>(
        &mut self,
        allow_key: bool,
        scan: impl FnOnce(&mut SliceInputBuffer<'a>) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.guarded(|this| {
            if !allow_key {
                this.reject_key_position()?;
            }
            let mut cursor = this.buffer;
            let value = scan(&mut cursor)?;
            this.levels.advance(&mut cursor)?;
            this.buffer = cursor;
            Ok(value)
        })
    }

    /// Opens an array. The cursor must be on `[`.
    pub fn open_array(&mut self) -> Result<(), ParseError> {
        self.guarded(|this| {
            this.reject_key_position()?;
            this.levels.open(Level::InArray, &mut this.buffer)
        })
    }

    /// Closes the innermost array. The cursor must be on `]`.
    pub fn close_array(&mut self) -> Result<(), ParseError> {
        self.guarded(|this| this.levels.close(b']', &mut this.buffer))
    }

    /// Opens an object. The cursor must be on `{`.
    ///
    /// Inside an object, keys are read with [`read_string`](Self::read_string)
    /// or [`read_str`](Self::read_str), each followed by the read for its value.
    pub fn open_object(&mut self) -> Result<(), ParseError> {
        self.guarded(|this| {
            this.reject_key_position()?;
            this.levels.open(Level::InObjectAwaitingColon, &mut this.buffer)
        })
    }

    /// Closes the innermost object. The cursor must be on `}`.
    pub fn close_object(&mut self) -> Result<(), ParseError> {
        self.guarded(|this| this.levels.close(b'}', &mut this.buffer))
    }

    /// Reads a string value or object key, borrowing from the input when the
    /// string contains no escapes.
    pub fn read_str(&mut self) -> Result<Cow<'a, str>, ParseError> {
        self.read_scalar(true, decode_string)
    }

    /// Reads a string value or object key into a newly allocated `String`
    /// owned by the caller.
    pub fn read_string(&mut self) -> Result<String, ParseError> {
        self.read_scalar(true, |cursor| {
            let start = cursor.current_pos();
            decode_string(cursor).and_then(|text| into_owned_string(text, start))
        })
    }

    /// Reads a non-negative integer.
    ///
    /// A leading `-` and literals with a fraction or exponent are type
    /// mismatches: use [`read_i64`](Self::read_i64) or `read_f64` for those.
    pub fn read_u64(&mut self) -> Result<u64, ParseError> {
        self.read_scalar(false, |cursor| {
            let number = number_parser::scan_unsigned(cursor)?;
            commit(cursor, number.len)?;
            Ok(number.value)
        })
    }

    /// Reads a signed integer.
    pub fn read_i64(&mut self) -> Result<i64, ParseError> {
        self.read_scalar(false, |cursor| {
            let number = number_parser::scan_signed(cursor)?;
            commit(cursor, number.len)?;
            Ok(number.value)
        })
    }

    /// Reads any JSON number as an `f64`.
    #[cfg(feature = "float")]
    pub fn read_f64(&mut self) -> Result<f64, ParseError> {
        self.read_scalar(false, |cursor| {
            let number = number_parser::scan_float(cursor)?;
            commit(cursor, number.len)?;
            Ok(number.value)
        })
    }

    /// Reads any JSON number and returns its exact text, for callers that
    /// want to parse it into their own numeric type.
    pub fn read_number_str(&mut self) -> Result<&'a str, ParseError> {
        self.read_scalar(false, |cursor| {
            let len = number_parser::json_number_len(cursor)?;
            let start = cursor.current_pos();
            let literal = cursor
                .slice(start, start + len)
                .ok()
                .and_then(|bytes| core::str::from_utf8(bytes).ok())
                .ok_or(ParseError::new(ErrKind::InvalidNumber, cursor.peek_byte(), start))?;
            commit(cursor, len)?;
            Ok(literal)
        })
    }

    /// Reads `true` or `false`.
    ///
    /// The keyword must end at a token boundary: `truex` is a type mismatch,
    /// not `true` followed by garbage.
    pub fn read_bool(&mut self) -> Result<bool, ParseError> {
        self.read_scalar(false, |cursor| {
            if read_keyword(cursor, b"true") {
                Ok(true)
            } else if read_keyword(cursor, b"false") {
                Ok(false)
            } else {
                Err(ParseError::new(
                    ErrKind::NotABoolean,
                    cursor.peek_byte(),
                    cursor.current_pos(),
                ))
            }
        })
    }

    /// Reads `null`.
    pub fn read_null(&mut self) -> Result<(), ParseError> {
        self.read_scalar(false, |cursor| {
            if read_keyword(cursor, b"null") {
                Ok(())
            } else {
                Err(ParseError::new(
                    ErrKind::NotANull,
                    cursor.peek_byte(),
                    cursor.current_pos(),
                ))
            }
        })
    }

    /// Category of the token under the cursor, without consuming anything.
    ///
    /// Returns `None` for anything unrecognised, at end of input, and on a
    /// poisoned session.
    pub fn peek(&self) -> Option<ValueType> {
        if self.poison.is_some() {
            return None;
        }
        ValueType::from_first_byte(self.buffer.peek_byte())
    }

    /// True while the innermost container (or the document, at top level)
    /// has more to read.
    ///
    /// False at end of input, in front of the innermost container's close
    /// bracket, and on a poisoned session, so that read loops terminate.
    pub fn has_more(&self) -> bool {
        if self.poison.is_some() || self.buffer.is_at_end() {
            return false;
        }
        self.levels.has_more(&self.buffer)
    }

    /// Consumes one complete value of any type, containers included.
    ///
    /// Nested containers are walked with an explicit loop over the level
    /// stack, so nesting is bounded by `max_depth` alone.
    pub fn skip_value(&mut self) -> Result<(), ParseError> {
        let base = self.depth();
        loop {
            if self.depth() > base {
                if !self.has_more() {
                    self.close_innermost()?;
                    if self.depth() == base {
                        return Ok(());
                    }
                    continue;
                }
                if self.levels.expects_key() {
                    self.read_str()?;
                }
            }
            self.skip_token()?;
            if self.depth() == base {
                return Ok(());
            }
        }
    }

    /// Consumes a scalar, or opens the container under the cursor.
    fn skip_token(&mut self) -> Result<(), ParseError> {
        if matches!(self.buffer.peek_byte(), b']' | b'}') {
            return self.guarded(|this| {
                Err(ParseError::new(
                    ErrKind::ExpectedValue,
                    this.buffer.peek_byte(),
                    this.buffer.current_pos(),
                ))
            });
        }
        match self.peek() {
            Some(ValueType::Array) => self.open_array(),
            Some(ValueType::Object) => self.open_object(),
            Some(ValueType::String) => self.read_str().map(|_| ()),
            Some(ValueType::Number) => self.read_number_str().map(|_| ()),
            Some(ValueType::Boolean) => self.read_bool().map(|_| ()),
            Some(ValueType::Null) => self.read_null(),
            None => self.guarded(|this| {
                Err(ParseError::new(
                    ErrKind::UnknownValue,
                    this.buffer.peek_byte(),
                    this.buffer.current_pos(),
                ))
            }),
        }
    }

    fn close_innermost(&mut self) -> Result<(), ParseError> {
        match self.levels.top() {
            Some(Level::InArray) => self.close_array(),
            _ => self.close_object(),
        }
    }

    /// Byte offset of the cursor.
    pub fn position(&self) -> usize {
        self.buffer.current_pos()
    }

    /// Number of containers currently open.
    pub fn depth(&self) -> usize {
        self.levels.depth()
    }

    pub fn is_poisoned(&self) -> bool {
        self.poison.is_some()
    }

    /// The latched error, if any.
    pub fn error(&self) -> Option<ParseError> {
        self.poison
    }
}

fn commit(cursor: &mut SliceInputBuffer<'_>, len: usize) -> Result<(), ParseError> {
    let pos = cursor.current_pos();
    cursor
        .advance_by(len)
        .map_err(|_| ParseError::new(ErrKind::InvalidNumber, 0, pos))
}

/// Consumes `keyword` if it sits at the cursor and ends at a token boundary.
fn read_keyword(cursor: &mut SliceInputBuffer<'_>, keyword: &[u8]) -> bool {
    if cursor.starts_with(keyword) && !is_keyword_byte(cursor.peek_at(keyword.len())) {
        cursor.advance_by(keyword.len()).is_ok()
    } else {
        false
    }
}

/// Runs a whole session over `input`: begins it, hands the decoder to `f`,
/// and ends it.
///
/// Returns `f`'s value, or the session's first error. A session that leaves
/// containers open fails with [`ErrKind::UnclosedContainer`].
///
/// # Example
/// ```
/// let sum = pulljson::decode("[1, 2, 3]", |d| {
///     let mut sum = 0;
///     d.open_array()?;
///     while d.has_more() {
///         sum += d.read_u64()?;
///     }
///     d.close_array()?;
///     Ok(sum)
/// });
/// assert_eq!(sum, Ok(6));
/// ```
pub fn decode<'a, T, F>(input: &'a str, f: F) -> Result<T, ParseError>
where
    F: FnOnce(&mut Decoder<'a>) -> Result<T, ParseError>,
{
    let mut decoder = Decoder::new();
    decoder.begin(input);
    let value = f(&mut decoder);
    match decoder.end() {
        Err(err) => Err(err),
        Ok(()) => value,
    }
}
