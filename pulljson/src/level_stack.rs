// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;

use crate::parse_error::{ErrKind, ParseError};
use crate::slice_input_buffer::SliceInputBuffer;

/// One open container and what it expects after the value just read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Inside `[...]`: a value is followed by `,` or `]`.
    InArray,
    /// Inside `{...}` at a key: the key is followed by `:`.
    InObjectAwaitingColon,
    /// Inside `{...}` at a value: the value is followed by `,` or `}`.
    InObjectAwaitingComma,
}

impl Level {
    pub fn is_object(&self) -> bool {
        !matches!(self, Level::InArray)
    }

    fn close_byte(&self) -> u8 {
        match self {
            Level::InArray => b']',
            _ => b'}',
        }
    }
}

/// Stack of open containers, innermost last.
#[derive(Debug)]
pub struct LevelStack {
    levels: Vec<Level>,
    max_depth: usize,
    /// Keeps track of the last separator consumed in the innermost container
    /// and its position, until the value that follows it completes
    after_separator: Option<(u8, usize)>,
}

impl LevelStack {
    pub fn new(max_depth: usize) -> Self {
        LevelStack {
            levels: Vec::new(),
            max_depth,
            after_separator: None,
        }
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn top(&self) -> Option<Level> {
        self.levels.last().copied()
    }

    /// Drops every level. Used when a session is torn down.
    pub fn clear(&mut self) {
        self.levels.clear();
        self.after_separator = None;
    }

    /// True when the next value read is an object key.
    pub fn expects_key(&self) -> bool {
        self.top() == Some(Level::InObjectAwaitingColon)
    }

    /// Opens a container whose bracket sits at `pos`.
    fn push(&mut self, level: Level, data: u8, pos: usize) -> Result<(), ParseError> {
        if self.levels.len() >= self.max_depth {
            return Err(ParseError::new(ErrKind::MaxDepthReached, data, pos));
        }
        self.levels
            .try_reserve(1)
            .map_err(|_| ParseError::new(ErrKind::AllocationFailed, data, pos))?;
        self.levels.push(level);
        self.after_separator = None;
        log::trace!("open {:?} at {}, depth {}", level, pos, self.levels.len());
        Ok(())
    }

    /// Opens a container at the cursor, which must sit on `level`'s open
    /// bracket. Consumes the bracket and any whitespace after it; no
    /// separator is expected since no element has been read yet.
    pub fn open(
        &mut self,
        level: Level,
        buffer: &mut SliceInputBuffer<'_>,
    ) -> Result<(), ParseError> {
        let (open_byte, mismatch) = if level.is_object() {
            (b'{', ErrKind::NotAnObject)
        } else {
            (b'[', ErrKind::NotAnArray)
        };
        let pos = buffer.current_pos();
        let data = buffer.peek_byte();
        if data != open_byte {
            return Err(ParseError::new(mismatch, data, pos));
        }
        self.push(level, data, pos)?;
        let _ = buffer.consume_byte();
        buffer.skip_whitespace();
        Ok(())
    }

    /// Checks that the close bracket `data` at `pos` may end the innermost
    /// container. Nothing changes on failure.
    fn check_close(&self, data: u8, pos: usize) -> Result<(), ParseError> {
        let top = self
            .top()
            .ok_or(ParseError::new(ErrKind::MismatchedClose, data, pos))?;
        if top.close_byte() != data {
            return Err(ParseError::new(ErrKind::MismatchedClose, data, pos));
        }
        match self.after_separator {
            Some((b',', at)) => Err(ParseError::new(ErrKind::TrailingComma, b',', at)),
            Some((b':', _)) => Err(ParseError::new(ErrKind::ExpectedValue, data, pos)),
            _ => Ok(()),
        }
    }

    /// Closes the innermost container. The cursor must sit on `close_byte`.
    ///
    /// Consumes the bracket, pops the level and then runs [`advance`] for the
    /// enclosing container, so a nested container takes part in its
    /// parent's separator bookkeeping. Stack and buffer are untouched on
    /// failure.
    ///
    /// [`advance`]: Self::advance
    pub fn close(
        &mut self,
        close_byte: u8,
        buffer: &mut SliceInputBuffer<'_>,
    ) -> Result<(), ParseError> {
        let pos = buffer.current_pos();
        let data = buffer.peek_byte();
        if data != close_byte {
            let kind = match close_byte {
                b']' => ErrKind::ExpectedArrayEnd,
                _ => ErrKind::ExpectedObjectEnd,
            };
            return Err(ParseError::new(kind, data, pos));
        }
        self.check_close(data, pos)?;

        let mut cursor = *buffer;
        let _ = cursor.consume_byte();
        let Some(level) = self.levels.pop() else {
            return Err(ParseError::new(ErrKind::MismatchedClose, data, pos));
        };
        if let Err(err) = self.advance(&mut cursor) {
            // Capacity is still there from before the pop
            self.levels.push(level);
            return Err(err);
        }
        log::trace!("close {:?} at {}, depth {}", level, pos, self.levels.len());
        *buffer = cursor;
        Ok(())
    }

    /// Runs the post-value step for the innermost container: skips
    /// whitespace and consumes the `,` or `:` that follows the value, or
    /// stops in front of the matching close bracket.
    ///
    /// The buffer is only moved on success, and the stack only changes on
    /// success.
    pub fn advance(&mut self, buffer: &mut SliceInputBuffer<'_>) -> Result<(), ParseError> {
        let mut cursor = *buffer;
        cursor.skip_whitespace();
        let pos = cursor.current_pos();
        let data = cursor.peek_byte();

        let Some(top) = self.levels.last_mut() else {
            *buffer = cursor;
            return Ok(());
        };

        let separator = match (*top, data) {
            (Level::InArray, b',') => Some(b','),
            (Level::InArray, b']') => None,
            (Level::InArray, _) => {
                return Err(ParseError::new(ErrKind::ExpectedComma, data, pos));
            }
            (Level::InObjectAwaitingColon, b':') => {
                *top = Level::InObjectAwaitingComma;
                Some(b':')
            }
            (Level::InObjectAwaitingColon, _) => {
                return Err(ParseError::new(ErrKind::ExpectedColon, data, pos));
            }
            (Level::InObjectAwaitingComma, b',') => {
                *top = Level::InObjectAwaitingColon;
                Some(b',')
            }
            (Level::InObjectAwaitingComma, b'}') => None,
            (Level::InObjectAwaitingComma, _) => {
                return Err(ParseError::new(ErrKind::ExpectedComma, data, pos));
            }
        };

        if separator.is_some() {
            let _ = cursor.consume_byte();
            cursor.skip_whitespace();
        }
        self.after_separator = separator.map(|sep| (sep, pos));
        *buffer = cursor;
        Ok(())
    }

    /// True when the cursor is not in front of the innermost container's
    /// close bracket.
    pub fn has_more(&self, buffer: &SliceInputBuffer<'_>) -> bool {
        match self.top() {
            Some(level) => buffer.peek_byte() != level.close_byte(),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn opened(level: Level, input: &[u8]) -> (LevelStack, SliceInputBuffer<'_>) {
        let mut stack = LevelStack::new(8);
        let mut buffer = SliceInputBuffer::new(input);
        stack.open(level, &mut buffer).unwrap();
        (stack, buffer)
    }

    #[test]
    fn test_open_consumes_bracket_and_whitespace() {
        let (stack, buffer) = opened(Level::InArray, b"[ \n 1]");
        assert_eq!(stack.depth(), 1);
        assert_eq!(buffer.current_pos(), 4);

        let mut stack = LevelStack::new(8);
        let mut buffer = SliceInputBuffer::new(b"{}");
        let err = stack.open(Level::InArray, &mut buffer).unwrap_err();
        assert_eq!(err.kind(), ErrKind::NotAnArray);
        assert!(err.is_type_mismatch());
        assert_eq!(buffer.current_pos(), 0);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_array_separators() {
        let (mut stack, mut buffer) = opened(Level::InArray, b"[1 , 2 ]");
        buffer.advance_by(1).unwrap(); // the 1
        stack.advance(&mut buffer).unwrap();
        assert_eq!(buffer.current_pos(), 5);
        assert_eq!(buffer.peek_byte(), b'2');

        buffer.advance_by(1).unwrap(); // the 2
        stack.advance(&mut buffer).unwrap();
        assert_eq!(buffer.current_pos(), 7);
        assert!(!stack.has_more(&buffer));
        assert_eq!(stack.close(b']', &mut buffer), Ok(()));
        assert!(stack.is_empty());
        assert!(buffer.is_at_end());
    }

    #[test]
    fn test_array_missing_comma_leaves_buffer() {
        let (mut stack, mut buffer) = opened(Level::InArray, b"[1 2]");
        buffer.advance_by(1).unwrap();
        let err = stack.advance(&mut buffer).unwrap_err();
        assert_eq!(err.kind(), ErrKind::ExpectedComma);
        assert_eq!(err.position(), 3);
        assert_eq!(buffer.current_pos(), 2);
    }

    #[test]
    fn test_object_state_machine() {
        let (mut stack, mut buffer) = opened(Level::InObjectAwaitingColon, b"{\"a\" : 1, \"b\" 2}");
        assert!(stack.expects_key());

        buffer.advance_by(3).unwrap(); // "a"
        stack.advance(&mut buffer).unwrap();
        assert_eq!(stack.top(), Some(Level::InObjectAwaitingComma));
        assert!(!stack.expects_key());
        assert_eq!(buffer.peek_byte(), b'1');

        buffer.advance_by(1).unwrap(); // 1
        stack.advance(&mut buffer).unwrap();
        assert_eq!(stack.top(), Some(Level::InObjectAwaitingColon));
        assert_eq!(buffer.peek_byte(), b'"');

        buffer.advance_by(3).unwrap(); // "b"
        let err = stack.advance(&mut buffer).unwrap_err();
        assert_eq!(err.kind(), ErrKind::ExpectedColon);
        assert_eq!(err.character(), b'2');
        assert_eq!(stack.top(), Some(Level::InObjectAwaitingColon));
    }

    #[test]
    fn test_nested_close_advances_parent() {
        let mut stack = LevelStack::new(8);
        let mut buffer = SliceInputBuffer::new(b"[[], 1]");
        stack.open(Level::InArray, &mut buffer).unwrap();
        stack.open(Level::InArray, &mut buffer).unwrap();
        assert_eq!(stack.depth(), 2);
        stack.close(b']', &mut buffer).unwrap();
        assert_eq!(stack.depth(), 1);
        assert_eq!(buffer.peek_byte(), b'1');
    }

    #[test]
    fn test_close_failure_restores_level() {
        let mut stack = LevelStack::new(8);
        let mut buffer = SliceInputBuffer::new(b"[[] 1]");
        stack.open(Level::InArray, &mut buffer).unwrap();
        stack.open(Level::InArray, &mut buffer).unwrap();
        let err = stack.close(b']', &mut buffer).unwrap_err();
        assert_eq!(err.kind(), ErrKind::ExpectedComma);
        assert_eq!(stack.depth(), 2);
        assert_eq!(buffer.current_pos(), 2);
    }

    #[test]
    fn test_close_checks() {
        let mut stack = LevelStack::new(8);
        let mut buffer = SliceInputBuffer::new(b"]");
        assert_eq!(
            stack.close(b']', &mut buffer).unwrap_err().kind(),
            ErrKind::MismatchedClose
        );

        let (mut stack, mut buffer) = opened(Level::InArray, b"[}");
        assert_eq!(
            stack.close(b']', &mut buffer).unwrap_err().kind(),
            ErrKind::ExpectedArrayEnd
        );
        assert_eq!(
            stack.close(b'}', &mut buffer).unwrap_err().kind(),
            ErrKind::MismatchedClose
        );
    }

    #[test]
    fn test_trailing_comma() {
        let (mut stack, mut buffer) = opened(Level::InArray, b"[1,]");
        buffer.advance_by(1).unwrap();
        stack.advance(&mut buffer).unwrap();
        assert!(!stack.has_more(&buffer));
        let err = stack.close(b']', &mut buffer).unwrap_err();
        assert_eq!(err.kind(), ErrKind::TrailingComma);
        assert!(err.is_syntax());
        assert_eq!(err.position(), 2);
    }

    #[test]
    fn test_close_between_key_and_value() {
        let (mut stack, mut buffer) = opened(Level::InObjectAwaitingColon, b"{\"a\":}");
        buffer.advance_by(3).unwrap();
        stack.advance(&mut buffer).unwrap();
        let err = stack.close(b'}', &mut buffer).unwrap_err();
        assert_eq!(err.kind(), ErrKind::ExpectedValue);
    }

    #[test]
    fn test_max_depth() {
        let mut stack = LevelStack::new(2);
        let mut buffer = SliceInputBuffer::new(b"[[[");
        stack.open(Level::InArray, &mut buffer).unwrap();
        stack.open(Level::InArray, &mut buffer).unwrap();
        let err = stack.open(Level::InArray, &mut buffer).unwrap_err();
        assert_eq!(err.kind(), ErrKind::MaxDepthReached);
        assert!(err.is_unrecoverable());
        assert_eq!(err.position(), 2);
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn test_top_level_advance_only_skips_whitespace() {
        let mut stack = LevelStack::new(8);
        let mut buffer = SliceInputBuffer::new(b"  x");
        stack.advance(&mut buffer).unwrap();
        assert_eq!(buffer.current_pos(), 2);
        assert!(stack.has_more(&buffer));
    }
}
