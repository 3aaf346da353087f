//! Parse error types
//!
//! Every malformed-input failure is fatal to the current parse call and
//! carries the position at which it was detected. There is no lenient
//! or tag-soup recovery mode.

use thiserror::Error;

/// Location of a parse failure within the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Byte offset from the start of the input
    pub offset: usize,
    /// 1-based line number
    pub line: usize,
    /// 1-based column number (in bytes)
    pub column: usize,
}

impl Position {
    /// Derive line/column for a byte offset by scanning the input prefix.
    ///
    /// Only called when constructing an error, so the extra pass over the
    /// prefix is off the parsing hot path.
    pub(crate) fn at(input: &[u8], offset: usize) -> Self {
        let offset = offset.min(input.len());
        let mut line = 1;
        let mut column = 1;
        for &b in &input[..offset] {
            if b == b'\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Position { offset, line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {} (offset {})", self.line, self.column, self.offset)
    }
}

/// Errors produced by [`parse`](crate::parse) and [`parse_file`](crate::parse_file).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// A closing tag did not match the innermost open element
    #[error("mismatched closing tag: expected </{expected}>, found </{found}> at {position}")]
    MismatchedTag {
        expected: String,
        found: String,
        position: Position,
    },

    /// A closing tag appeared with no element open
    #[error("unexpected closing tag </{name}> at {position}")]
    UnexpectedCloseTag { name: String, position: Position },

    /// Input ended while elements were still open
    #[error("unexpected end of input: <{unclosed}> is still open at {position}")]
    UnexpectedEof { unclosed: String, position: Position },

    /// Text or a second element outside the root element
    #[error("content outside the root element at {position}")]
    UnexpectedContent { position: Position },

    /// Input ended without any root element
    #[error("no root element found (input ends at {position})")]
    MissingRoot { position: Position },

    /// A tag did not start with a valid XML name
    #[error("invalid tag name at {position}")]
    InvalidName { position: Position },

    /// A tag was opened but never closed with '>'
    #[error("unterminated tag at {position}")]
    UnterminatedTag { position: Position },

    /// A quoted attribute value was still open at end of input
    #[error("unterminated attribute value at {position}")]
    UnterminatedAttribute { position: Position },

    /// A comment was opened but '-->' never found
    #[error("unterminated comment at {position}")]
    UnterminatedComment { position: Position },

    /// A CDATA section was opened but ']]>' never found
    #[error("unterminated CDATA section at {position}")]
    UnterminatedCData { position: Position },

    /// A processing instruction was opened but '?>' never found
    #[error("unterminated processing instruction at {position}")]
    UnterminatedPi { position: Position },

    /// A DOCTYPE declaration was opened but its '>' never found
    #[error("unterminated DOCTYPE declaration at {position}")]
    UnterminatedDoctype { position: Position },

    /// The input file could not be read
    #[error("failed to read input file: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Position at which the failure was detected, if it has one.
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::MismatchedTag { position, .. }
            | Error::UnexpectedCloseTag { position, .. }
            | Error::UnexpectedEof { position, .. }
            | Error::UnexpectedContent { position }
            | Error::MissingRoot { position }
            | Error::InvalidName { position }
            | Error::UnterminatedTag { position }
            | Error::UnterminatedAttribute { position }
            | Error::UnterminatedComment { position }
            | Error::UnterminatedCData { position }
            | Error::UnterminatedPi { position }
            | Error::UnterminatedDoctype { position } => Some(*position),
            Error::Io(_) => None,
        }
    }
}
