//! Pact specification versions.

use crate::matcher::MatcherKind;
use std::fmt;
use std::str::FromStr;

/// Pact specification version a contract is written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum SpecVersion {
    /// Version 2: type, regex and array-length rules only
    V2,
    /// Version 3: adds numeric, equality, include, content-type and date/time rules plus generators
    #[default]
    V3,
    /// Version 4: same rule set, newer document revision
    V4,
}

impl SpecVersion {
    /// Version string written to `metadata.pactSpecification.version`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V2 => "2.0.0",
            Self::V3 => "3.0.0",
            Self::V4 => "4.0",
        }
    }

    /// Oldest version that can express a matcher kind.
    #[must_use]
    pub const fn introducing(kind: MatcherKind) -> Self {
        match kind {
            MatcherKind::Like | MatcherKind::EachLike | MatcherKind::OneOf | MatcherKind::Regex => {
                Self::V2
            }
            MatcherKind::Literal
            | MatcherKind::Integer
            | MatcherKind::Decimal
            | MatcherKind::Includes
            | MatcherKind::DateTime
            | MatcherKind::ContentType => Self::V3,
        }
    }

    /// Whether contracts of this version may carry the matcher kind.
    #[must_use]
    pub fn supports(self, kind: MatcherKind) -> bool {
        self >= Self::introducing(kind)
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpecVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split('.').next() {
            Some("2") => Ok(Self::V2),
            Some("3") => Ok(Self::V3),
            Some("4") => Ok(Self::V4),
            _ => Err(format!("unknown pact specification version: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_strings() {
        assert_eq!(SpecVersion::V2.as_str(), "2.0.0");
        assert_eq!(SpecVersion::V3.as_str(), "3.0.0");
        assert_eq!(SpecVersion::V4.as_str(), "4.0");
        assert_eq!(SpecVersion::default(), SpecVersion::V3);
    }

    #[test]
    fn test_parse() {
        assert_eq!("4.0".parse::<SpecVersion>(), Ok(SpecVersion::V4));
        assert_eq!("3.0.0".parse::<SpecVersion>(), Ok(SpecVersion::V3));
        assert_eq!("2".parse::<SpecVersion>(), Ok(SpecVersion::V2));
        assert!("1.1.0".parse::<SpecVersion>().is_err());
    }

    #[test]
    fn test_supports() {
        assert!(SpecVersion::V2.supports(MatcherKind::EachLike));
        assert!(!SpecVersion::V2.supports(MatcherKind::Integer));
        assert!(SpecVersion::V3.supports(MatcherKind::DateTime));
        assert!(!SpecVersion::V2.supports(MatcherKind::ContentType));
        assert!(SpecVersion::V3.supports(MatcherKind::ContentType));
        assert!(SpecVersion::V4.supports(MatcherKind::Includes));
    }
}
