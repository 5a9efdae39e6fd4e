//! Primitive value kinds for address fields.

use serde::{Deserialize, Serialize};

/// The primitive shape of a field's value, as advertised to form renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Free text.
    Text,
    /// One entry from a finite set of options.
    Choice,
    /// Text that must match a regular expression.
    Pattern,
}

impl ValueKind {
    /// The wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Choice => "choice",
            Self::Pattern => "pattern",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_format_matches_as_str() {
        for kind in [ValueKind::Text, ValueKind::Choice, ValueKind::Pattern] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
