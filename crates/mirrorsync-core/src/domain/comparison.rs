//! How update candidates are judged identical

use serde::{Deserialize, Serialize};

/// Strategy used by the comparator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    /// Byte-for-byte comparison, with a size mismatch as fast-path false
    #[default]
    Content,
    /// Equal type, size and modification time count as identical without
    /// reading; otherwise falls back to a byte comparison
    Shallow,
}

impl std::fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparisonMode::Content => write!(f, "content"),
            ComparisonMode::Shallow => write!(f, "shallow"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_content() {
        assert_eq!(ComparisonMode::default(), ComparisonMode::Content);
    }

    #[test]
    fn serde_uses_snake_case() {
        let mode: ComparisonMode = serde_yaml::from_str("shallow").unwrap();
        assert_eq!(mode, ComparisonMode::Shallow);
        assert_eq!(serde_yaml::to_string(&ComparisonMode::Content).unwrap().trim(), "content");
    }
}
