//! Tree construction
//!
//! Folds reader events into the final merged tree. Maintains a stack
//! of in-progress frames mirroring the currently open elements and
//! applies one uniform merge rule to every insertion: child elements,
//! flattened attributes, and attribute/element name collisions all go
//! through the same insert / promote-to-list / append path.

use super::value::{ATTRIBS_KEY, DATA_KEY, Map, Value};
use crate::error::{Error, Position};
use crate::options::Options;
use crate::reader::{EventReader, StartElement, XmlEvent};

/// An in-progress element: its accumulating map and direct text.
struct Frame {
    /// Raw element name, for close-tag matching
    name: String,
    /// Folded key under which the value merges into its parent
    key: String,
    map: Map,
    text: String,
}

/// Builds a [`Value`] tree from a complete XML input buffer.
pub struct TreeBuilder<'a> {
    reader: EventReader<'a>,
    options: Options,
}

impl<'a> TreeBuilder<'a> {
    /// Create a builder over the given input
    pub fn new(input: &'a [u8], options: Options) -> Self {
        TreeBuilder {
            reader: EventReader::new(input),
            options,
        }
    }

    /// Consume all events and produce the document tree.
    ///
    /// The outermost element's own value is the result; its name never
    /// appears in the tree (root elision).
    pub fn build(mut self) -> Result<Value, Error> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut root: Option<Value> = None;

        while let Some(event) = self.reader.next_event()? {
            match event {
                XmlEvent::StartElement(elem) => {
                    self.check_single_root(&stack, &root)?;
                    stack.push(self.open_frame(elem));
                }

                XmlEvent::EmptyElement(elem) => {
                    self.check_single_root(&stack, &root)?;
                    let frame = self.open_frame(elem);
                    self.attach(frame, &mut stack, &mut root);
                }

                XmlEvent::Text(text) | XmlEvent::CData(text) => match stack.last_mut() {
                    Some(frame) => frame.text.push_str(&text),
                    None => {
                        return Err(Error::UnexpectedContent { position: self.here() });
                    }
                },

                XmlEvent::EndElement(name) => {
                    let frame = match stack.pop() {
                        Some(frame) => frame,
                        None => {
                            return Err(Error::UnexpectedCloseTag {
                                name,
                                position: self.here(),
                            });
                        }
                    };
                    // Matching is on raw names, case-sensitive; folding
                    // only applies to keys going into the tree
                    if frame.name != name {
                        return Err(Error::MismatchedTag {
                            expected: frame.name,
                            found: name,
                            position: self.here(),
                        });
                    }
                    self.attach(frame, &mut stack, &mut root);
                }
            }
        }

        if let Some(frame) = stack.last() {
            return Err(Error::UnexpectedEof {
                unclosed: frame.name.clone(),
                position: self.here(),
            });
        }

        root.ok_or_else(|| Error::MissingRoot { position: self.here() })
    }

    fn here(&self) -> Position {
        self.reader.position_at(self.reader.position())
    }

    /// Reject a second top-level element after the root has closed
    fn check_single_root(&self, stack: &[Frame], root: &Option<Value>) -> Result<(), Error> {
        if root.is_some() && stack.is_empty() {
            return Err(Error::UnexpectedContent { position: self.here() });
        }
        Ok(())
    }

    /// Start a frame for an opened element, inserting its attributes
    /// flattened or under the attribute sub-map per options.
    fn open_frame(&self, elem: StartElement) -> Frame {
        let key = self.options.fold_key(&elem.name);
        let mut map = Map::new();

        if !elem.attributes.is_empty() {
            if self.options.preserve_attributes {
                let mut attribs = Map::new();
                for (name, value) in elem.attributes {
                    merge_into(&mut attribs, self.options.fold_key(&name), Value::Text(value));
                }
                map.insert(self.options.fold_key(ATTRIBS_KEY), Value::Map(attribs));
            } else {
                for (name, value) in elem.attributes {
                    merge_into(&mut map, self.options.fold_key(&name), Value::Text(value));
                }
            }
        }

        Frame {
            name: elem.name,
            key,
            map,
            text: String::new(),
        }
    }

    /// Close a frame: collapse it to its final value and merge it into
    /// its parent, or make it the document result.
    fn attach(&self, frame: Frame, stack: &mut Vec<Frame>, root: &mut Option<Value>) {
        let Frame { key, mut map, text, .. } = frame;

        let value = if map.is_empty() {
            // Pure text element collapses to a bare scalar, verbatim
            Value::Text(text)
        } else {
            // Mixed content: edge-trimmed so pretty-printed indentation
            // around inline text does not accumulate across round trips
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                merge_into(
                    &mut map,
                    self.options.fold_key(DATA_KEY),
                    Value::Text(trimmed.to_string()),
                );
            }
            Value::Map(map)
        };

        match stack.last_mut() {
            Some(parent) => merge_into(&mut parent.map, key, value),
            None => *root = Some(value),
        }
    }
}

/// Insert `value` under `key`, promoting an existing entry to a list on
/// collision and appending when the entry already is a list. The list
/// keeps document order.
pub(crate) fn merge_into(map: &mut Map, key: String, value: Value) {
    use std::collections::btree_map::Entry;

    match map.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
        Entry::Occupied(mut slot) => {
            let current = slot.get_mut();
            if let Value::List(items) = current {
                items.push(value);
            } else {
                let first = std::mem::replace(current, Value::List(Vec::with_capacity(2)));
                if let Value::List(items) = current {
                    items.push(first);
                    items.push(value);
                }
            }
        }
    }
}
