use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque perceptual signature for one signal type of one item
///
/// Codes are either fixed-width hash strings (e.g. 64 characters of `0`/`1`)
/// or variable-length fingerprint strings. Nothing beyond the character
/// sequence is assumed. An empty code marks a failed upstream computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Code(String);

impl Code {
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The code used when upstream computation gave up
    #[inline]
    #[must_use]
    pub fn missing() -> Self {
        Self(String::new())
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in characters, which is what the comparator aligns on
    #[inline]
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Code {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Code {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for Code {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_code_is_empty() {
        assert!(Code::missing().is_empty());
        assert_eq!(Code::missing(), Code::default());
    }

    #[test]
    fn test_char_len_counts_characters() {
        assert_eq!(Code::new("0101").char_len(), 4);
        assert_eq!(Code::new("äb").char_len(), 2);
    }

    #[test]
    fn test_serde_transparent() {
        let code = Code::new("1010");
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"1010\"");
        let parsed: Code = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, code);
    }
}
