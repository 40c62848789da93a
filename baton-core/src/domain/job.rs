//! Job domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the batch scheduler when a job is accepted.
///
/// Opaque: only equality and set membership are meaningful. Schedulers
/// recycle ids over time, so two runs may legitimately see the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is purely numeric (as opposed to a job name).
    pub fn is_numeric(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_detection() {
        assert!(JobId::from("12345").is_numeric());
        assert!(!JobId::from("align.chr1").is_numeric());
        assert!(!JobId::from("").is_numeric());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&JobId::from("777")).unwrap();
        assert_eq!(json, "\"777\"");
    }
}
