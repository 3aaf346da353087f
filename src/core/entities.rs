//! XML entity codec
//!
//! Escaping and unescaping of the standard XML character entities:
//! - Element text escaping: & < >
//! - Attribute value escaping: & < > " '
//! - Decoding of the five named entities plus numeric character
//!   references: &#123; &#x7B;
//!
//! All transforms are pure functions. Uses Cow for zero-copy when no
//! entities are present.

use memchr::memchr;
use std::borrow::Cow;

/// Escape `&`, `<`, and `>` for use as element text content.
///
/// Single pass; already-escaped output is never re-escaped.
pub fn encode_entities(input: &str) -> Cow<'_, str> {
    // Fast path: check if any escaping needed
    if !input.bytes().any(|b| matches!(b, b'&' | b'<' | b'>')) {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Escape `&`, `<`, `>`, `"`, and `'` for use as an attribute value.
pub fn encode_attrib_entities(input: &str) -> Cow<'_, str> {
    if !input.bytes().any(|b| matches!(b, b'&' | b'<' | b'>' | b'"' | b'\'')) {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Decode entity references in text or attribute content.
///
/// Handles the five named entities and numeric character references.
/// Each entity is decoded exactly once, left to right; decoded output is
/// never rescanned, so `&amp;lt;` yields the literal text `&lt;`.
/// Unrecognized entities are left verbatim.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    // Fast path: no entities present
    if memchr(b'&', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }

    let bytes = input.as_bytes();
    let mut result = String::with_capacity(input.len());
    let mut pos = 0;

    while pos < bytes.len() {
        match memchr(b'&', &bytes[pos..]) {
            Some(amp) => {
                // Copy everything before the entity
                result.push_str(&input[pos..pos + amp]);
                pos += amp;

                // Find the semicolon
                if let Some(semi) = memchr(b';', &bytes[pos..]) {
                    let entity = &input[pos + 1..pos + semi];
                    if let Some(decoded) = decode_entity(entity) {
                        result.push(decoded);
                        pos += semi + 1;
                    } else {
                        // Unknown entity, keep as-is
                        result.push('&');
                        pos += 1;
                    }
                } else {
                    // No semicolon found, keep the ampersand
                    result.push('&');
                    pos += 1;
                }
            }
            None => {
                // No more entities, copy the rest
                result.push_str(&input[pos..]);
                break;
            }
        }
    }

    Cow::Owned(result)
}

/// Decode a single entity (without & and ;)
fn decode_entity(entity: &str) -> Option<char> {
    if let Some(num) = entity.strip_prefix('#') {
        return decode_numeric_entity(num);
    }

    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}

/// Decode a numeric character reference: decimal `#39` or hex `#x27`.
fn decode_numeric_entity(entity: &str) -> Option<char> {
    let codepoint = if let Some(hex) = entity.strip_prefix(['x', 'X']) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        entity.parse::<u32>().ok()?
    };
    char::from_u32(codepoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_entities_borrowed() {
        let result = decode_entities("Hello, World!");
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_named_entities() {
        let result = decode_entities("&lt;hello&gt; &amp; &quot;world&quot; &apos;x&apos;");
        assert_eq!(result, "<hello> & \"world\" 'x'");
    }

    #[test]
    fn test_numeric_decimal() {
        assert_eq!(decode_entities("&#65;&#66;&#67;"), "ABC");
        assert_eq!(decode_entities("&#39;"), "'");
    }

    #[test]
    fn test_numeric_hex() {
        assert_eq!(decode_entities("&#x41;&#x42;&#x43;"), "ABC");
        assert_eq!(decode_entities("&#x1F600;"), "\u{1F600}");
    }

    #[test]
    fn test_unknown_entity_verbatim() {
        assert_eq!(decode_entities("&unknown;"), "&unknown;");
        assert_eq!(decode_entities("a &nope; b"), "a &nope; b");
    }

    #[test]
    fn test_bare_ampersand() {
        assert_eq!(decode_entities("fish & chips"), "fish & chips");
        assert_eq!(decode_entities("trailing &"), "trailing &");
    }

    #[test]
    fn test_no_double_decode() {
        // &amp;lt; decodes the amp once and never rescans the output
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_entities("&amp;amp;"), "&amp;");
    }

    #[test]
    fn test_encode_text_only_three() {
        assert_eq!(encode_entities("<a> & \"b\" 'c'"), "&lt;a&gt; &amp; \"b\" 'c'");
    }

    #[test]
    fn test_encode_no_reescape() {
        // The & of an existing escape is escaped as a literal ampersand
        assert_eq!(encode_entities("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_encode_attrib_all_five() {
        assert_eq!(
            encode_attrib_entities("<a> & \"b\" 'c'"),
            "&lt;a&gt; &amp; &quot;b&quot; &apos;c&apos;"
        );
    }

    #[test]
    fn test_attrib_encode_decode_inverse() {
        let samples = [
            "plain",
            "a < b > c & d",
            "\"quoted\" and 'apostrophes'",
            "mixed <&>\"' end",
            "unicode \u{00E9}\u{1F600} stays",
        ];
        for s in samples {
            assert_eq!(decode_entities(&encode_attrib_entities(s)), s);
        }
    }

    #[test]
    fn test_encode_fast_path_borrowed() {
        assert!(matches!(encode_entities("no escapes"), Cow::Borrowed(_)));
        assert!(matches!(encode_attrib_entities("no escapes"), Cow::Borrowed(_)));
    }
}
