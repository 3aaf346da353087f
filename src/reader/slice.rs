//! Event reader over a byte slice
//!
//! Translates raw tokens into the events the tree builder consumes:
//! parses attributes for start/empty tags, drops comment, processing
//! instruction, and DOCTYPE tokens, and discards whitespace-only text
//! runs. Well-formedness bookkeeping (tag matching, unclosed elements)
//! lives in the builder, not here.

use crate::core::attributes::parse_attributes;
use crate::core::tokenizer::{Token, TokenKind, Tokenizer};
use crate::error::{Error, Position};
use super::events::{StartElement, XmlEvent};

/// Pull reader producing [`XmlEvent`]s from a byte slice
pub struct EventReader<'a> {
    input: &'a [u8],
    tokenizer: Tokenizer<'a>,
}

impl<'a> EventReader<'a> {
    /// Create a new event reader
    pub fn new(input: &'a [u8]) -> Self {
        EventReader {
            input,
            tokenizer: Tokenizer::new(input),
        }
    }

    /// Current byte offset of the underlying tokenizer
    pub fn position(&self) -> usize {
        self.tokenizer.position()
    }

    /// Resolve a byte offset to a line/column position
    pub fn position_at(&self, offset: usize) -> Position {
        Position::at(self.input, offset)
    }

    /// Get the next event, or Ok(None) at end of input
    pub fn next_event(&mut self) -> Result<Option<XmlEvent>, Error> {
        loop {
            let token = match self.tokenizer.next_token()? {
                Some(token) => token,
                None => return Ok(None),
            };

            match token.kind {
                TokenKind::StartTag => {
                    return Ok(Some(XmlEvent::StartElement(self.element(&token))));
                }

                TokenKind::EmptyTag => {
                    return Ok(Some(XmlEvent::EmptyElement(self.element(&token))));
                }

                TokenKind::EndTag => {
                    let name = String::from_utf8_lossy(token.name.unwrap_or_default()).into_owned();
                    return Ok(Some(XmlEvent::EndElement(name)));
                }

                TokenKind::Text => {
                    if let Some(content) = token.content {
                        // Whitespace-only runs between structural tags carry
                        // no content for the tree
                        if !content.trim().is_empty() {
                            return Ok(Some(XmlEvent::Text(content.into_owned())));
                        }
                    }
                }

                TokenKind::CData => {
                    if let Some(content) = token.content {
                        return Ok(Some(XmlEvent::CData(content.into_owned())));
                    }
                }

                // Recognized but never part of the tree
                TokenKind::Comment | TokenKind::ProcessingInstruction | TokenKind::Doctype => {}
            }
        }
    }

    /// Build a start-element event from a tag token
    fn element(&self, token: &Token<'a>) -> StartElement {
        let name = token.name.unwrap_or_default();
        StartElement::new(
            String::from_utf8_lossy(name).into_owned(),
            self.tag_attributes(token),
        )
    }

    /// Parse attributes out of a tag token's span
    fn tag_attributes(&self, token: &Token<'a>) -> Vec<(String, String)> {
        let (start, end) = token.span;
        // Region between the element name and the closing '>' or '/>'
        let from = start + 1 + token.name.map_or(0, |n| n.len());
        let to = match token.kind {
            TokenKind::EmptyTag => end - 2,
            _ => end - 1,
        };

        if from >= to {
            return Vec::new();
        }
        parse_attributes(&self.input[from..to])
    }
}
