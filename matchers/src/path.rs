//! JSON-path keys for matching rules and generators.

use std::fmt;

/// Location of a value inside a body, header or query parameter.
///
/// Body paths start at `$`. Header and query rules are rooted at the
/// parameter name instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JsonPath(String);

impl JsonPath {
    /// The document root, `$`.
    #[must_use]
    pub fn root() -> Self {
        Self("$".to_string())
    }

    /// A path rooted at a header or query parameter name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Child object field.
    #[must_use]
    pub fn field(&self, name: &str) -> Self {
        if is_plain_identifier(name) {
            Self(format!("{}.{name}", self.0))
        } else {
            Self(format!("{}['{}']", self.0, name.replace('\'', "\\'")))
        }
    }

    /// Child array element at a fixed index.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// Every element of an array.
    #[must_use]
    pub fn wildcard(&self) -> Self {
        Self(format!("{}[*]", self.0))
    }

    /// Path as rendered in the contract document.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_plain_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_paths() {
        let path = JsonPath::root().field("animals").wildcard().field("children");
        assert_eq!(path.as_str(), "$.animals[*].children");

        let indexed = JsonPath::root().field("ids").index(2);
        assert_eq!(indexed.to_string(), "$.ids[2]");
    }

    #[test]
    fn test_quoted_fields() {
        let path = JsonPath::root().field("first name");
        assert_eq!(path.as_str(), "$['first name']");

        let quote = JsonPath::root().field("it's");
        assert_eq!(quote.as_str(), "$['it\\'s']");

        assert_eq!(JsonPath::root().field("").as_str(), "$['']");
    }

    #[test]
    fn test_named_root() {
        assert_eq!(JsonPath::named("Content-Type").as_str(), "Content-Type");
    }
}
