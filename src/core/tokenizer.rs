//! XML tokenizer - state machine for XML token extraction
//!
//! Implements a pull-parser style tokenizer that extracts XML tokens:
//! - Element start/end tags
//! - Text content (entity-decoded)
//! - CDATA sections (passed through undecoded)
//! - Comments, processing instructions, DOCTYPE (recognized and skipped)
//!
//! Any malformed construct is a fatal error carrying the position at
//! which it was detected; there is no lenient recovery mode.

use super::scanner::{Scanner, TagEnd};
use crate::error::{Error, Position};
use std::borrow::Cow;

/// Type of XML token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Element start tag: <element>
    StartTag,
    /// Element end tag: </element>
    EndTag,
    /// Empty element: <element/>
    EmptyTag,
    /// Text content
    Text,
    /// CDATA section: <![CDATA[...]]>
    CData,
    /// Comment: <!--...-->
    Comment,
    /// Processing instruction: <?target ...?> (includes the XML declaration)
    ProcessingInstruction,
    /// DOCTYPE declaration
    Doctype,
}

/// A scanned XML token
#[derive(Debug, Clone)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Raw span in input (start, end)
    pub span: (usize, usize),
    /// For tags: the element name
    pub name: Option<&'a [u8]>,
    /// For text/cdata: the content (text is entity-decoded, CDATA is not)
    pub content: Option<Cow<'a, str>>,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, span: (usize, usize)) -> Self {
        Token { kind, span, name: None, content: None }
    }

    fn with_name(mut self, name: &'a [u8]) -> Self {
        self.name = Some(name);
        self
    }

    fn with_content(mut self, content: Cow<'a, str>) -> Self {
        self.content = Some(content);
        self
    }
}

/// XML tokenizer implementing a pull-parser pattern
pub struct Tokenizer<'a> {
    input: &'a [u8],
    scanner: Scanner<'a>,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer for the given input
    pub fn new(input: &'a [u8]) -> Self {
        Tokenizer {
            input,
            scanner: Scanner::new(input),
        }
    }

    /// Get the current position in the input
    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    /// Resolve a byte offset to a line/column position
    pub fn position_at(&self, offset: usize) -> Position {
        Position::at(self.input, offset)
    }

    /// Get the next token, or Ok(None) at end of input
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, Error> {
        if self.scanner.is_eof() {
            return Ok(None);
        }

        match self.scanner.peek() {
            Some(b'<') => self.scan_markup(),
            _ => self.scan_text().map(Some),
        }
    }

    /// Scan markup starting with '<'
    fn scan_markup(&mut self) -> Result<Option<Token<'a>>, Error> {
        let start = self.scanner.position();
        self.scanner.advance(1); // Skip '<'

        match self.scanner.peek() {
            Some(b'/') => self.scan_end_tag(start).map(Some),
            Some(b'!') => self.scan_bang_markup(start).map(Some),
            Some(b'?') => self.scan_pi(start).map(Some),
            Some(_) => self.scan_start_tag(start).map(Some),
            None => Err(Error::UnterminatedTag {
                position: self.position_at(start),
            }),
        }
    }

    /// Scan a start tag or empty element tag
    fn scan_start_tag(&mut self, start: usize) -> Result<Token<'a>, Error> {
        let name = self.scanner.read_name().ok_or_else(|| Error::InvalidName {
            position: self.position_at(start),
        })?;

        // Find the end of the tag, handling quoted attributes
        let end = match self.scanner.find_tag_end_quoted() {
            TagEnd::At(pos) => pos,
            TagEnd::UnclosedQuote => {
                return Err(Error::UnterminatedAttribute {
                    position: self.position_at(start),
                })
            }
            TagEnd::Unclosed => {
                return Err(Error::UnterminatedTag {
                    position: self.position_at(start),
                })
            }
        };

        let is_empty = end > start && self.scanner.slice(end - 1, end) == b"/";

        self.scanner.set_position(end + 1);

        let kind = if is_empty { TokenKind::EmptyTag } else { TokenKind::StartTag };
        Ok(Token::new(kind, (start, end + 1)).with_name(name))
    }

    /// Scan an end tag
    fn scan_end_tag(&mut self, start: usize) -> Result<Token<'a>, Error> {
        self.scanner.advance(1); // Skip '/'

        let name = self.scanner.read_name().ok_or_else(|| Error::InvalidName {
            position: self.position_at(start),
        })?;

        let end = self.scanner.find_tag_end().ok_or_else(|| Error::UnterminatedTag {
            position: self.position_at(start),
        })?;

        self.scanner.set_position(end + 1);

        Ok(Token::new(TokenKind::EndTag, (start, end + 1)).with_name(name))
    }

    /// Scan markup starting with '!' (comment, CDATA, DOCTYPE)
    fn scan_bang_markup(&mut self, start: usize) -> Result<Token<'a>, Error> {
        self.scanner.advance(1); // Skip '!'

        if self.scanner.starts_with(b"--") {
            self.scan_comment(start)
        } else if self.scanner.starts_with(b"[CDATA[") {
            self.scan_cdata(start)
        } else if self.scanner.starts_with(b"DOCTYPE") {
            self.scan_doctype(start)
        } else {
            Err(Error::InvalidName {
                position: self.position_at(start),
            })
        }
    }

    /// Scan a comment <!--...-->
    fn scan_comment(&mut self, start: usize) -> Result<Token<'a>, Error> {
        self.scanner.advance(2); // Skip '--'

        loop {
            let pos = self.scanner.find_byte(b'-').ok_or_else(|| Error::UnterminatedComment {
                position: self.position_at(start),
            })?;
            self.scanner.set_position(pos);

            if self.scanner.starts_with(b"-->") {
                self.scanner.advance(3);
                return Ok(Token::new(TokenKind::Comment, (start, self.scanner.position())));
            }
            self.scanner.advance(1);
        }
    }

    /// Scan a CDATA section <![CDATA[...]]>
    fn scan_cdata(&mut self, start: usize) -> Result<Token<'a>, Error> {
        self.scanner.advance(7); // Skip '[CDATA['

        let content_start = self.scanner.position();

        loop {
            let pos = self.scanner.find_byte(b']').ok_or_else(|| Error::UnterminatedCData {
                position: self.position_at(start),
            })?;
            self.scanner.set_position(pos);

            if self.scanner.starts_with(b"]]>") {
                let content = self.scanner.slice(content_start, pos);
                self.scanner.advance(3);
                // CDATA content is taken verbatim, never entity-decoded
                return Ok(Token::new(TokenKind::CData, (start, self.scanner.position()))
                    .with_content(String::from_utf8_lossy(content)));
            }
            self.scanner.advance(1);
        }
    }

    /// Scan a processing instruction <?...?> (the XML declaration scans the same way)
    fn scan_pi(&mut self, start: usize) -> Result<Token<'a>, Error> {
        self.scanner.advance(1); // Skip '?'

        loop {
            let pos = self.scanner.find_byte(b'?').ok_or_else(|| Error::UnterminatedPi {
                position: self.position_at(start),
            })?;
            self.scanner.set_position(pos);

            if self.scanner.starts_with(b"?>") {
                self.scanner.advance(2);
                return Ok(Token::new(
                    TokenKind::ProcessingInstruction,
                    (start, self.scanner.position()),
                ));
            }
            self.scanner.advance(1);
        }
    }

    /// Scan a DOCTYPE declaration, honoring quoted strings and the
    /// internal subset brackets so a '>' inside either does not
    /// terminate the scan.
    fn scan_doctype(&mut self, start: usize) -> Result<Token<'a>, Error> {
        self.scanner.advance(7); // Skip 'DOCTYPE'

        let mut in_internal_subset = false;
        let mut in_string = false;
        let mut string_char = 0u8;

        while let Some(b) = self.scanner.peek() {
            if in_string {
                if b == string_char {
                    in_string = false;
                }
                self.scanner.advance(1);
                continue;
            }

            match b {
                b'"' | b'\'' => {
                    in_string = true;
                    string_char = b;
                    self.scanner.advance(1);
                }
                b'[' => {
                    in_internal_subset = true;
                    self.scanner.advance(1);
                }
                b']' => {
                    in_internal_subset = false;
                    self.scanner.advance(1);
                }
                b'>' if !in_internal_subset => {
                    self.scanner.advance(1);
                    return Ok(Token::new(TokenKind::Doctype, (start, self.scanner.position())));
                }
                _ => self.scanner.advance(1),
            }
        }

        Err(Error::UnterminatedDoctype {
            position: self.position_at(start),
        })
    }

    /// Scan text content up to the next '<' or end of input
    fn scan_text(&mut self) -> Result<Token<'a>, Error> {
        let start = self.scanner.position();
        let end = self.scanner.find_tag_start().unwrap_or(self.input.len());

        let content = self.scanner.slice(start, end);
        self.scanner.set_position(end);

        let decoded = match String::from_utf8_lossy(content) {
            Cow::Borrowed(s) => super::entities::decode_entities(s),
            Cow::Owned(s) => Cow::Owned(super::entities::decode_entities(&s).into_owned()),
        };

        Ok(Token::new(TokenKind::Text, (start, end)).with_content(decoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut tok = Tokenizer::new(input.as_bytes());
        let mut out = Vec::new();
        while let Some(t) = tok.next_token().unwrap() {
            out.push(t.kind);
        }
        out
    }

    #[test]
    fn test_simple_element() {
        let mut tok = Tokenizer::new(b"<root>content</root>");

        let t1 = tok.next_token().unwrap().unwrap();
        assert_eq!(t1.kind, TokenKind::StartTag);
        assert_eq!(t1.name, Some(b"root" as &[u8]));

        let t2 = tok.next_token().unwrap().unwrap();
        assert_eq!(t2.kind, TokenKind::Text);
        assert_eq!(t2.content.as_deref(), Some("content"));

        let t3 = tok.next_token().unwrap().unwrap();
        assert_eq!(t3.kind, TokenKind::EndTag);
        assert_eq!(t3.name, Some(b"root" as &[u8]));

        assert!(tok.next_token().unwrap().is_none());
    }

    #[test]
    fn test_empty_element() {
        let mut tok = Tokenizer::new(b"<br/>");
        let t = tok.next_token().unwrap().unwrap();
        assert_eq!(t.kind, TokenKind::EmptyTag);
        assert_eq!(t.name, Some(b"br" as &[u8]));
    }

    #[test]
    fn test_text_entities_decoded() {
        let mut tok = Tokenizer::new(b"<a>fish &amp; chips</a>");
        tok.next_token().unwrap();
        let t = tok.next_token().unwrap().unwrap();
        assert_eq!(t.content.as_deref(), Some("fish & chips"));
    }

    #[test]
    fn test_cdata_not_decoded() {
        let mut tok = Tokenizer::new(b"<![CDATA[<x> &amp; raw]]>");
        let t = tok.next_token().unwrap().unwrap();
        assert_eq!(t.kind, TokenKind::CData);
        assert_eq!(t.content.as_deref(), Some("<x> &amp; raw"));
    }

    #[test]
    fn test_comment_and_pi_and_doctype() {
        assert_eq!(
            kinds("<?xml version=\"1.0\"?><!DOCTYPE root [<!ENTITY x \"y\">]><!-- c --><root/>"),
            vec![
                TokenKind::ProcessingInstruction,
                TokenKind::Doctype,
                TokenKind::Comment,
                TokenKind::EmptyTag,
            ]
        );
    }

    #[test]
    fn test_doctype_quoted_gt() {
        // '>' inside a quoted system literal does not close the DOCTYPE
        assert_eq!(
            kinds("<!DOCTYPE r SYSTEM \"a>b\"><r/>"),
            vec![TokenKind::Doctype, TokenKind::EmptyTag]
        );
    }

    #[test]
    fn test_gt_inside_attribute_value() {
        let mut tok = Tokenizer::new(b"<a attr=\">test\">x</a>");
        let t = tok.next_token().unwrap().unwrap();
        assert_eq!(t.kind, TokenKind::StartTag);
        assert_eq!(t.span, (0, 16));
    }

    #[test]
    fn test_unterminated_tag() {
        let mut tok = Tokenizer::new(b"<root attr='x' ");
        assert!(matches!(tok.next_token(), Err(Error::UnterminatedTag { .. })));
    }

    #[test]
    fn test_unterminated_attribute() {
        let mut tok = Tokenizer::new(b"<root attr=\"never closed");
        assert!(matches!(
            tok.next_token(),
            Err(Error::UnterminatedAttribute { .. })
        ));
    }

    #[test]
    fn test_unterminated_comment() {
        let mut tok = Tokenizer::new(b"<!-- never closed");
        assert!(matches!(
            tok.next_token(),
            Err(Error::UnterminatedComment { .. })
        ));
    }

    #[test]
    fn test_unterminated_cdata() {
        let mut tok = Tokenizer::new(b"<![CDATA[never closed");
        assert!(matches!(tok.next_token(), Err(Error::UnterminatedCData { .. })));
    }

    #[test]
    fn test_unterminated_pi() {
        let mut tok = Tokenizer::new(b"<?xml version=\"1.0\"");
        assert!(matches!(tok.next_token(), Err(Error::UnterminatedPi { .. })));
    }

    #[test]
    fn test_invalid_tag_name() {
        let mut tok = Tokenizer::new(b"<1bad/>");
        let err = tok.next_token().unwrap_err();
        assert!(matches!(err, Error::InvalidName { .. }));
        assert_eq!(err.position().map(|p| p.offset), Some(0));
    }

    #[test]
    fn test_error_position_line_column() {
        let mut tok = Tokenizer::new(b"<a>\n  <!-- oops");
        tok.next_token().unwrap(); // <a>
        tok.next_token().unwrap(); // "\n  "
        let err = tok.next_token().unwrap_err();
        let pos = err.position().unwrap();
        assert_eq!((pos.line, pos.column), (2, 3));
    }
}
