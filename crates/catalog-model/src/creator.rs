use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a creator against the role authorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatorKind {
    Person,
    Corporate,
    #[default]
    Unknown,
}

/// One contributor parsed from a combined-creators string, e.g. `"Name [Role]"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Creator {
    pub name: String,
    /// Bracketed role text; empty when the source carried no brackets.
    pub role: String,
    pub kind: CreatorKind,
}

impl Creator {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            kind: CreatorKind::Unknown,
        }
    }

    pub fn with_kind(mut self, kind: CreatorKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn has_role(&self) -> bool {
        !self.role.is_empty()
    }

    /// Same person or body, ignoring role and classification.
    pub fn same_name(&self, other: &Creator) -> bool {
        self.name == other.name
    }
}

impl fmt::Display for Creator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.role.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{} [{}]", self.name, self.role)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_restores_bracketed_form() {
        assert_eq!(Creator::new("כהן, משה", "צלם").to_string(), "כהן, משה [צלם]");
        assert_eq!(Creator::new("Anon", "").to_string(), "Anon");
    }

    #[test]
    fn same_name_ignores_role() {
        let a = Creator::new("Levi", "author");
        let b = Creator::new("Levi", "editor").with_kind(CreatorKind::Person);
        assert!(a.same_name(&b));
        assert_ne!(a, b);
    }
}
