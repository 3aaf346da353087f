//! XML event types
//!
//! Event types for pull-parser style XML processing. Only the events
//! the tree builder consumes exist here; comments, processing
//! instructions, and the DOCTYPE never surface as events.

/// XML parsing event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    /// Start of an element: <name attrs...>
    StartElement(StartElement),
    /// End of an element: </name>
    EndElement(String),
    /// Empty element: <name attrs.../>
    EmptyElement(StartElement),
    /// Text content between tags, entity-decoded; never whitespace-only
    Text(String),
    /// CDATA section content, verbatim
    CData(String),
}

/// Start element event data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartElement {
    /// Element name as written in the document
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
}

impl StartElement {
    /// Create a new start element
    pub fn new(name: impl Into<String>, attributes: Vec<(String, String)>) -> Self {
        StartElement {
            name: name.into(),
            attributes,
        }
    }

    /// Get an attribute value by name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_attribute() {
        let elem = StartElement::new(
            "div",
            vec![
                ("id".to_string(), "main".to_string()),
                ("class".to_string(), "wide".to_string()),
            ],
        );
        assert_eq!(elem.get_attribute("id"), Some("main"));
        assert_eq!(elem.get_attribute("class"), Some("wide"));
        assert_eq!(elem.get_attribute("missing"), None);
    }
}
