use crate::code::Code;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// One video under comparison
///
/// Items are identified by their 0-based position in the source list and hold
/// one code per signal type. They are built once by the pipeline and not
/// mutated after aggregation starts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub index: usize,
    /// URL or path as given in the source list
    pub source: String,
    /// Local file the codes were computed from, if acquisition succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Codes keyed by signal type name
    #[serde(default)]
    pub codes: HashMap<String, Code>,
}

impl Item {
    pub fn new(index: usize, source: impl Into<String>) -> Self {
        Self {
            index,
            source: source.into(),
            path: None,
            codes: HashMap::new(),
        }
    }

    /// Builder-style helper to attach a code for a signal
    #[must_use]
    pub fn with_code(mut self, signal: impl Into<String>, code: impl Into<Code>) -> Self {
        self.codes.insert(signal.into(), code.into());
        self
    }

    pub fn set_code(&mut self, signal: impl Into<String>, code: Code) {
        self.codes.insert(signal.into(), code);
    }

    /// Code for a signal; a missing entry reads as the empty code
    pub fn code(&self, signal: &str) -> &str {
        self.codes.get(signal).map(Code::as_str).unwrap_or("")
    }

    /// Whether a non-empty code exists for the signal
    pub fn has_code(&self, signal: &str) -> bool {
        !self.code(signal).is_empty()
    }
}
