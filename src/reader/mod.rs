//! Event layer
//!
//! Turns the tokenizer's raw tokens into the events the tree builder
//! consumes.

pub mod events;
pub mod slice;

pub use events::{StartElement, XmlEvent};
pub use slice::EventReader;
