// SPDX-License-Identifier: Apache-2.0

use alloc::borrow::Cow;
use alloc::string::String;

use crate::escape_processor::EscapeProcessor;
use crate::parse_error::{ErrKind, ParseError};
use crate::slice_input_buffer::SliceInputBuffer;

/// A string builder that borrows from the input until the first escape.
///
/// Strings without escapes are handed out as slices of the input. The first
/// escape allocates an owned `String`, copies the raw prefix into it and from
/// then on appends raw runs and unescaped characters. Any partially built
/// output is dropped with the builder when decoding fails.
pub struct CopyOnEscape<'a> {
    input: &'a [u8],
    /// Start of the raw run not yet copied into `owned`
    run_start: usize,
    owned: Option<String>,
}

impl<'a> CopyOnEscape<'a> {
    /// `content_start` is just past the opening quote.
    pub fn new(input: &'a [u8], content_start: usize) -> Self {
        Self {
            input,
            run_start: content_start,
            owned: None,
        }
    }

    /// Record an escape that starts at `escape_start` and decodes to `ch`.
    /// The escape ends at `resume`, where the next raw run starts.
    pub fn push_escape(
        &mut self,
        escape_start: usize,
        resume: usize,
        ch: char,
    ) -> Result<(), ParseError> {
        let run = self.raw_run(self.run_start, escape_start)?;
        let owned = self.owned.get_or_insert_with(String::new);
        owned
            .try_reserve(run.len() + ch.len_utf8())
            .map_err(|_| ParseError::new(ErrKind::AllocationFailed, b'\\', escape_start))?;
        owned.push_str(run);
        owned.push(ch);
        self.run_start = resume;
        Ok(())
    }

    /// Finish the string whose content ends (exclusive) at `content_end`.
    pub fn finish(mut self, content_end: usize) -> Result<Cow<'a, str>, ParseError> {
        let run = self.raw_run(self.run_start, content_end)?;
        match self.owned.take() {
            None => Ok(Cow::Borrowed(run)),
            Some(mut owned) => {
                owned
                    .try_reserve(run.len())
                    .map_err(|_| ParseError::new(ErrKind::AllocationFailed, b'"', content_end))?;
                owned.push_str(run);
                Ok(Cow::Owned(owned))
            }
        }
    }

    fn raw_run(&self, start: usize, end: usize) -> Result<&'a str, ParseError> {
        let bytes = self
            .input
            .get(start..end)
            .ok_or(ParseError::new(ErrKind::UnterminatedString, 0, end))?;
        core::str::from_utf8(bytes).map_err(|e| {
            let at = start + e.valid_up_to();
            let byte = self.input.get(at).copied().unwrap_or(0);
            ParseError::new(ErrKind::InvalidUtf8, byte, at)
        })
    }
}

/// Decode the string literal under the cursor.
///
/// The cursor must be on the opening quote. On success it is left just past
/// the closing quote. On failure it is left where the problem was found;
/// callers that must not move on failure pass a copy of their buffer.
pub fn decode_string<'a>(buffer: &mut SliceInputBuffer<'a>) -> Result<Cow<'a, str>, ParseError> {
    let opening = buffer.current_pos();
    if buffer.peek_byte() != b'"' {
        return Err(ParseError::new(ErrKind::NotAString, buffer.peek_byte(), opening));
    }
    // Opening quote
    let _ = buffer.consume_byte();

    let mut builder = CopyOnEscape::new(buffer.data(), opening + 1);
    loop {
        let pos = buffer.current_pos();
        let byte = buffer
            .consume_byte()
            .map_err(|_| ParseError::new(ErrKind::UnterminatedString, 0, pos))?;
        match byte {
            b'"' => {
                log::trace!("string of {} raw bytes at {}", pos - opening - 1, opening);
                return builder.finish(pos);
            }
            b'\\' => {
                let escape_pos = buffer.current_pos();
                let escape_char = buffer
                    .consume_byte()
                    .map_err(|_| ParseError::new(ErrKind::UnterminatedString, 0, escape_pos))?;
                let ch = if escape_char == b'u' {
                    let hex_start = buffer.current_pos();
                    let ch = EscapeProcessor::decode_unicode_escape(buffer.remaining())
                        .map_err(|(kind, offset)| {
                            let at = hex_start + offset;
                            let byte = buffer.peek_at(offset);
                            ParseError::new(kind, byte, at)
                        })?;
                    buffer
                        .advance_by(4)
                        .map_err(|_| ParseError::new(ErrKind::UnterminatedString, 0, hex_start))?;
                    ch
                } else {
                    let unescaped = EscapeProcessor::process_simple_escape(escape_char)
                        .map_err(|kind| ParseError::new(kind, escape_char, escape_pos))?;
                    char::from(unescaped)
                };
                builder.push_escape(pos, buffer.current_pos(), ch)?;
            }
            _ => {}
        }
    }
}

/// Turns a decoded string into an owned `String` without aborting on
/// allocation failure. `position` is the string's opening quote.
pub fn into_owned_string(text: Cow<'_, str>, position: usize) -> Result<String, ParseError> {
    match text {
        Cow::Owned(owned) => Ok(owned),
        Cow::Borrowed(borrowed) => {
            let mut owned = String::new();
            owned
                .try_reserve_exact(borrowed.len())
                .map_err(|_| ParseError::new(ErrKind::AllocationFailed, b'"', position))?;
            owned.push_str(borrowed);
            Ok(owned)
        }
    }
}
