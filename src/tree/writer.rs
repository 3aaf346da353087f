//! XML serialization
//!
//! Walks a [`Value`] tree and emits indented XML text. Output is
//! deterministic regardless of how the tree's containers iterate: map
//! keys are collected and sorted case-insensitively, attribute names
//! likewise; list order is document order and is never re-sorted.

use super::value::{is_attribs_key, is_data_key, Map, Value};
use crate::core::entities::{encode_attrib_entities, encode_entities};
use std::cmp::Ordering;

const INDENT: &str = "  ";

/// Serialize a tree under the given root element name.
///
/// Never fails for well-formed trees; a list nested directly inside
/// another list is a caller contract violation and simply emits each
/// entry under the same name.
pub fn stringify(value: &Value, root: &str) -> String {
    let mut out = String::with_capacity(256);
    out.push_str("<?xml version=\"1.0\"?>\n");
    emit(&mut out, root, value, 0);
    out
}

/// Emit one element (or, for a list, one element per entry) for `value`
/// under the element name `key`.
fn emit(out: &mut String, key: &str, value: &Value, depth: usize) {
    match value {
        Value::List(items) => {
            for item in items {
                emit(out, key, item, depth);
            }
        }

        Value::Text(text) => {
            push_indent(out, depth);
            if text.is_empty() {
                out.push('<');
                out.push_str(key);
                out.push_str("/>\n");
            } else {
                out.push('<');
                out.push_str(key);
                out.push('>');
                out.push_str(&encode_entities(text));
                out.push_str("</");
                out.push_str(key);
                out.push_str(">\n");
            }
        }

        Value::Map(map) => emit_map(out, key, map, depth),
    }
}

fn emit_map(out: &mut String, key: &str, map: &Map, depth: usize) {
    // Split the reserved markers from ordinary child keys. The markers
    // are matched in both casings so trees built with case folding
    // serialize the same way.
    let mut attributes: Vec<(&str, &str)> = Vec::new();
    let mut data: Option<&str> = None;
    let mut children: Vec<(&str, &Value)> = Vec::new();

    for (k, v) in map {
        if is_attribs_key(k) {
            if let Value::Map(attribs) = v {
                for (name, value) in attribs {
                    if let Value::Text(text) = value {
                        attributes.push((name.as_str(), text.as_str()));
                    }
                }
                continue;
            }
        }
        if is_data_key(k) {
            if let Value::Text(text) = v {
                if !text.is_empty() {
                    data = Some(text.as_str());
                }
                continue;
            }
        }
        children.push((k.as_str(), v));
    }

    attributes.sort_by(|a, b| key_order(a.0, b.0));
    children.sort_by(|a, b| key_order(a.0, b.0));

    push_indent(out, depth);
    out.push('<');
    out.push_str(key);
    for (name, value) in &attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&encode_attrib_entities(value));
        out.push('"');
    }

    if children.is_empty() && data.is_none() {
        out.push_str("/>\n");
        return;
    }

    out.push('>');
    if let Some(text) = data {
        out.push_str(&encode_entities(text));
    }

    if children.is_empty() {
        out.push_str("</");
        out.push_str(key);
        out.push_str(">\n");
        return;
    }

    out.push('\n');
    for (name, value) in &children {
        emit(out, name, value, depth + 1);
    }
    push_indent(out, depth);
    out.push_str("</");
    out.push_str(key);
    out.push_str(">\n");
}

/// Alphabetical, ASCII-case-insensitive, with a case-sensitive tiebreak
/// so equal-ignoring-case keys still order deterministically.
fn key_order(a: &str, b: &str) -> Ordering {
    a.to_ascii_lowercase()
        .cmp(&b.to_ascii_lowercase())
        .then_with(|| a.cmp(b))
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::builder::merge_into;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    fn map(entries: &[(&str, Value)]) -> Value {
        let mut m = Map::new();
        for (k, v) in entries {
            m.insert(k.to_string(), v.clone());
        }
        Value::Map(m)
    }

    #[test]
    fn test_simple_map() {
        let tree = map(&[("Simple", text("Hello"))]);
        assert_eq!(
            stringify(&tree, "Document"),
            "<?xml version=\"1.0\"?>\n\
             <Document>\n  <Simple>Hello</Simple>\n</Document>\n"
        );
    }

    #[test]
    fn test_text_root() {
        assert_eq!(
            stringify(&text("hi"), "Root"),
            "<?xml version=\"1.0\"?>\n<Root>hi</Root>\n"
        );
    }

    #[test]
    fn test_empty_values_self_close() {
        assert_eq!(
            stringify(&text(""), "Root"),
            "<?xml version=\"1.0\"?>\n<Root/>\n"
        );
        assert_eq!(
            stringify(&Value::Map(Map::new()), "Root"),
            "<?xml version=\"1.0\"?>\n<Root/>\n"
        );
    }

    #[test]
    fn test_keys_sorted_case_insensitively() {
        // BTreeMap iterates case-sensitively ("Zebra" before "apple");
        // the writer re-sorts explicitly
        let tree = map(&[("Zebra", text("1")), ("apple", text("2"))]);
        let out = stringify(&tree, "r");
        let apple = out.find("<apple>").unwrap();
        let zebra = out.find("<Zebra>").unwrap();
        assert!(apple < zebra);
    }

    #[test]
    fn test_attributes_from_attribs_map() {
        let tree = map(&[(
            "Node",
            map(&[
                ("_Attribs", map(&[("b", text("2")), ("A", text("1"))])),
                ("_Data", text("body")),
            ]),
        )]);
        assert_eq!(
            stringify(&tree, "Document"),
            "<?xml version=\"1.0\"?>\n\
             <Document>\n  <Node A=\"1\" b=\"2\">body</Node>\n</Document>\n"
        );
    }

    #[test]
    fn test_lowercase_markers_recognized() {
        let tree = map(&[(
            "node",
            map(&[
                ("_attribs", map(&[("key", text("v"))])),
                ("_data", text("x")),
            ]),
        )]);
        assert_eq!(
            stringify(&tree, "doc"),
            "<?xml version=\"1.0\"?>\n\
             <doc>\n  <node key=\"v\">x</node>\n</doc>\n"
        );
    }

    #[test]
    fn test_list_order_preserved() {
        let tree = map(&[("i", Value::List(vec![text("2"), text("1"), text("3")]))]);
        assert_eq!(
            stringify(&tree, "r"),
            "<?xml version=\"1.0\"?>\n\
             <r>\n  <i>2</i>\n  <i>1</i>\n  <i>3</i>\n</r>\n"
        );
    }

    #[test]
    fn test_text_escaping() {
        let tree = map(&[("t", text("a < b & c > d"))]);
        let out = stringify(&tree, "r");
        assert!(out.contains("<t>a &lt; b &amp; c &gt; d</t>"));
    }

    #[test]
    fn test_attribute_escaping() {
        let tree = map(&[(
            "n",
            map(&[("_Attribs", map(&[("q", text("say \"hi\" & 'bye'"))]))]),
        )]);
        let out = stringify(&tree, "r");
        assert!(out.contains("q=\"say &quot;hi&quot; &amp; &apos;bye&apos;\""));
    }

    #[test]
    fn test_mixed_data_with_children_layout() {
        let tree = map(&[(
            "k",
            map(&[("_Data", text("inline")), ("child", text("c"))]),
        )]);
        assert_eq!(
            stringify(&tree, "r"),
            "<?xml version=\"1.0\"?>\n\
             <r>\n  <k>inline\n    <child>c</child>\n  </k>\n</r>\n"
        );
    }

    #[test]
    fn test_indentation_tracks_depth() {
        let tree = map(&[("a", map(&[("b", map(&[("c", text("x"))]))]))]);
        let out = stringify(&tree, "r");
        assert!(out.contains("\n  <a>\n    <b>\n      <c>x</c>\n    </b>\n  </a>\n"));
    }

    #[test]
    fn test_non_map_attribs_is_ordinary_child() {
        let tree = map(&[("n", map(&[("_Attribs", text("not a map"))]))]);
        let out = stringify(&tree, "r");
        assert!(out.contains("<_Attribs>not a map</_Attribs>"));
    }

    #[test]
    fn test_promoted_list_emits_siblings() {
        let mut m = Map::new();
        merge_into(&mut m, "x".to_string(), text("1"));
        merge_into(&mut m, "x".to_string(), text("2"));
        let out = stringify(&Value::Map(m), "r");
        assert!(out.contains("<x>1</x>\n  <x>2</x>"));
    }
}
