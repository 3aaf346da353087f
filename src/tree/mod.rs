//! The generic tree: value types, construction, serialization

pub mod builder;
pub mod value;
pub mod writer;

pub use builder::TreeBuilder;
pub use value::{Map, Value};
