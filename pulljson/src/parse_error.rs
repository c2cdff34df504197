// SPDX-License-Identifier: Apache-2.0

/// Broad category of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The input does not match the JSON grammar at the current position.
    Syntax,
    /// The caller asked for a read or close that does not match what is at
    /// the current position.
    TypeMismatch,
    /// A resource limit was hit. Not retried.
    Unrecoverable,
}

/// Detailed reason for a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrKind {
    // Syntax
    /// End of input before the closing quote of a string.
    UnterminatedString,
    /// Backslash followed by a character that is not a JSON escape.
    InvalidEscapeSequence,
    /// Invalid hex digits in Unicode escape sequence.
    InvalidUnicodeHex,
    /// `\u` escape naming a surrogate code unit.
    InvalidUnicodeCodepoint,
    /// String content that is not valid UTF-8.
    InvalidUtf8,
    /// Array element not followed by `,` or `]`, or object value not followed
    /// by `,` or `}`.
    ExpectedComma,
    /// Object key not followed by `:`.
    ExpectedColon,
    /// Container closed directly after a `,`.
    TrailingComma,
    /// Close bracket where a value belongs, as in `{"a":}`.
    ExpectedValue,
    /// Number literal that breaks the JSON number grammar.
    InvalidNumber,

    // Type mismatch
    NotAString,
    NotANumber,
    /// `-` in front of a value read as unsigned.
    NegativeUnsigned,
    /// Fraction or exponent on a value read as an integer.
    NotAnInteger,
    /// Integer that does not fit the requested width.
    NumberOutOfRange,
    NotABoolean,
    NotANull,
    NotAnArray,
    NotAnObject,
    ExpectedArrayEnd,
    ExpectedObjectEnd,
    /// Close bracket does not match the innermost open container.
    MismatchedClose,
    /// Non-string read where an object key belongs.
    ExpectedKey,
    /// Session ended with containers still open.
    UnclosedContainer,
    /// No value of any known type starts at the cursor.
    UnknownValue,

    // Unrecoverable
    /// Growing decoded output or the level stack failed.
    AllocationFailed,
    /// Nesting exceeded the configured maximum depth.
    MaxDepthReached,
}

impl ErrKind {
    pub fn class(&self) -> ErrorClass {
        use ErrKind::*;
        match self {
            UnterminatedString
            | InvalidEscapeSequence
            | InvalidUnicodeHex
            | InvalidUnicodeCodepoint
            | InvalidUtf8
            | ExpectedComma
            | ExpectedColon
            | TrailingComma
            | ExpectedValue
            | InvalidNumber => ErrorClass::Syntax,
            AllocationFailed | MaxDepthReached => ErrorClass::Unrecoverable,
            _ => ErrorClass::TypeMismatch,
        }
    }
}

/// Errors that can occur during decoding.
///
/// Carries the offending byte (0 at end of input) and its offset so that a
/// caller can point at the problem. Once returned by a [`Decoder`] the same
/// value is returned by every later call of that session.
///
/// [`Decoder`]: crate::Decoder
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    kind: ErrKind,
    character: u8,
    position: usize,
}

impl ParseError {
    pub fn new(kind: ErrKind, character: u8, position: usize) -> Self {
        Self {
            kind,
            character,
            position,
        }
    }

    pub fn kind(&self) -> ErrKind {
        self.kind
    }

    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }

    /// The byte at which the error was detected, 0 at end of input.
    pub fn character(&self) -> u8 {
        self.character
    }

    /// Byte offset into the input.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_syntax(&self) -> bool {
        self.class() == ErrorClass::Syntax
    }

    pub fn is_type_mismatch(&self) -> bool {
        self.class() == ErrorClass::TypeMismatch
    }

    pub fn is_unrecoverable(&self) -> bool {
        self.class() == ErrorClass::Unrecoverable
    }
}

impl core::fmt::Debug for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:?}({}) at {}",
            self.kind,
            self.character.escape_ascii(),
            self.position
        )
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let class = match self.class() {
            ErrorClass::Syntax => "invalid syntax",
            ErrorClass::TypeMismatch => "wrong type",
            ErrorClass::Unrecoverable => "unrecoverable",
        };
        if self.character == 0 {
            write!(
                f,
                "{class}: {:?} at end of input (offset {})",
                self.kind, self.position
            )
        } else {
            write!(
                f,
                "{class}: {:?} at '{}' (offset {})",
                self.kind,
                self.character.escape_ascii(),
                self.position
            )
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}
