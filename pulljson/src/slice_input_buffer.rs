// SPDX-License-Identifier: Apache-2.0

/// Error type for SliceInputBuffer operations.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// Reached the end of input data.
    ReachedEnd,
    /// Invalid slice bounds provided.
    InvalidSliceBounds,
}

/// A buffer that manages input data and current parsing position.
/// This encapsulates the data slice and position that are always used together.
///
/// The end of the slice terminates input, and so does the first NUL byte, which
/// lets C-style NUL-terminated buffers be decoded as-is. The position never
/// moves backwards.
#[derive(Debug, Clone, Copy)]
pub struct SliceInputBuffer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceInputBuffer<'a> {
    /// Creates a new SliceInputBuffer with the given data.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn current_pos(&self) -> usize {
        self.pos
    }

    /// The byte under the cursor, or 0 once input is exhausted.
    pub fn peek_byte(&self) -> u8 {
        self.peek_at(0)
    }

    /// The byte `offset` positions past the cursor, or 0 past the end.
    pub fn peek_at(&self, offset: usize) -> u8 {
        self.pos
            .checked_add(offset)
            .and_then(|at| self.data.get(at))
            .copied()
            .unwrap_or(0)
    }

    /// True once the cursor sits on the terminator.
    pub fn is_at_end(&self) -> bool {
        self.peek_byte() == 0
    }

    pub fn consume_byte(&mut self) -> Result<u8, Error> {
        match self.peek_byte() {
            0 => Err(Error::ReachedEnd),
            byte => {
                self.advance_by(1)?;
                Ok(byte)
            }
        }
    }

    /// Moves the cursor forward by `count` bytes without inspecting them.
    pub fn advance_by(&mut self, count: usize) -> Result<(), Error> {
        let next = self.pos.checked_add(count).ok_or(Error::InvalidSliceBounds)?;
        if next > self.data.len() {
            return Err(Error::InvalidSliceBounds);
        }
        self.pos = next;
        Ok(())
    }

    /// Skips JSON whitespace: space, tab, newline and carriage return.
    pub fn skip_whitespace(&mut self) {
        while matches!(self.peek_byte(), b' ' | b'\t' | b'\n' | b'\r') {
            self.pos += 1;
        }
    }

    /// True when the unconsumed input starts with `literal`.
    pub fn starts_with(&self, literal: &[u8]) -> bool {
        self.remaining().starts_with(literal)
    }

    /// Gets a slice of the data from start to end positions, with bounds checking.
    pub fn slice(&self, start: usize, end: usize) -> Result<&'a [u8], Error> {
        self.data.get(start..end).ok_or(Error::InvalidSliceBounds)
    }

    /// The whole underlying input, independent of the cursor.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Everything from the cursor up to the end of the slice.
    pub fn remaining(&self) -> &'a [u8] {
        self.data.get(self.pos..).unwrap_or(&[])
    }
}

impl Default for SliceInputBuffer<'_> {
    fn default() -> Self {
        Self::new(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_buffer_boundary_behavior() {
        let data = b"ab"; // 2 bytes: positions 0 and 1 are valid
        let mut buffer = SliceInputBuffer::new(data);

        assert_eq!(buffer.current_pos(), 0);
        assert!(!buffer.is_at_end());
        assert_eq!(buffer.consume_byte(), Ok(b'a'));

        assert_eq!(buffer.current_pos(), 1);
        assert_eq!(buffer.consume_byte(), Ok(b'b'));

        // Exactly at end: no byte left, position does not move on failure
        assert_eq!(buffer.current_pos(), 2);
        assert!(buffer.is_at_end());
        assert_eq!(buffer.consume_byte(), Err(Error::ReachedEnd));
        assert_eq!(buffer.current_pos(), 2);
        assert_eq!(buffer.peek_byte(), 0);
    }

    #[test]
    fn test_nul_terminates_input() {
        let mut buffer = SliceInputBuffer::new(b"x\0y");
        assert_eq!(buffer.consume_byte(), Ok(b'x'));
        assert!(buffer.is_at_end());
        assert_eq!(buffer.consume_byte(), Err(Error::ReachedEnd));
    }

    #[test]
    fn test_skip_whitespace_stops_on_content() {
        let mut buffer = SliceInputBuffer::new(b" \t\r\n [");
        buffer.skip_whitespace();
        assert_eq!(buffer.current_pos(), 5);
        assert_eq!(buffer.peek_byte(), b'[');

        // Form feed is not JSON whitespace
        let mut buffer = SliceInputBuffer::new(b"\x0c1");
        buffer.skip_whitespace();
        assert_eq!(buffer.current_pos(), 0);
    }

    #[test]
    fn test_advance_by_checks_bounds() {
        let mut buffer = SliceInputBuffer::new(b"abc");
        assert_eq!(buffer.advance_by(3), Ok(()));
        assert_eq!(buffer.advance_by(1), Err(Error::InvalidSliceBounds));
        assert_eq!(buffer.current_pos(), 3);
        assert_eq!(buffer.remaining(), b"");
    }

    #[test]
    fn test_peek_at_and_slice() {
        let buffer = SliceInputBuffer::new(b"true");
        assert_eq!(buffer.peek_at(3), b'e');
        assert_eq!(buffer.peek_at(4), 0);
        assert_eq!(buffer.peek_at(usize::MAX), 0);
        assert!(buffer.starts_with(b"tru"));
        assert_eq!(buffer.slice(1, 3), Ok(&b"ru"[..]));
        assert_eq!(buffer.slice(2, 9), Err(Error::InvalidSliceBounds));
    }
}
