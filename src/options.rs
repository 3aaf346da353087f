//! Parse options
//!
//! An immutable configuration value threaded through a parse call.
//! There are no process-wide settings.

/// Options controlling how a parsed tree is shaped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Route attributes into a nested `_Attribs` map instead of
    /// flattening them alongside child-element keys. Default false.
    pub preserve_attributes: bool,
    /// Fold element and attribute key names (and the reserved `_Data` /
    /// `_Attribs` markers) to lower case at insertion time. Text values
    /// are never altered. Default false.
    pub lower_case: bool,
}

impl Options {
    /// Default options: attributes flattened, key case preserved.
    pub fn new() -> Self {
        Options::default()
    }

    /// Set attribute preservation.
    pub fn preserve_attributes(mut self, yes: bool) -> Self {
        self.preserve_attributes = yes;
        self
    }

    /// Set key case folding.
    pub fn lower_case(mut self, yes: bool) -> Self {
        self.lower_case = yes;
        self
    }

    /// Apply case folding to a key if enabled.
    pub(crate) fn fold_key(&self, key: &str) -> String {
        if self.lower_case {
            key.to_lowercase()
        } else {
            key.to_string()
        }
    }
}
