//! Matcher tree types.
//!
//! [`Node`] is the value half of the tree: plain JSON, containers, or a
//! [`Matcher`]. Matchers hold further nodes where their kind allows nesting,
//! so arbitrarily deep mixed trees are representable without dynamic typing.

use crate::error::{EncodingError, EncodingResult};
use crate::path::JsonPath;
use regex::Regex;
use serde_json::{Map, Number, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Discriminator key carried by every matching-rule descriptor.
pub const MATCHER_TYPE_KEY: &str = "pact:matcher:type";

/// Discriminator key carried by every generator descriptor.
pub const GENERATOR_TYPE_KEY: &str = "pact:generator:type";

/// Largest `EachLike` minimum; the example array holds `min` template copies.
pub const MAX_EACH_LIKE_MIN: usize = 1024;

/// A value in a request or response that may contain matchers at any depth.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Plain JSON, emitted unchanged
    Json(Value),
    /// Array whose elements may contain matchers
    Array(Vec<Node>),
    /// Object whose values may contain matchers
    Object(BTreeMap<String, Node>),
    /// A matching rule
    Matcher(Box<Matcher>),
}

impl Node {
    /// Build an object node from key/value pairs.
    ///
    /// ```
    /// use pactum_matchers::{Matcher, Node};
    ///
    /// let body = Node::object([
    ///     ("id", Node::from(Matcher::integer(1))),
    ///     ("name", Matcher::like("Test Object").into()),
    /// ]);
    /// assert!(matches!(body, Node::Object(_)));
    /// ```
    pub fn object<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Self>,
    {
        Self::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build an array node.
    pub fn array<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Self>,
    {
        Self::Array(items.into_iter().map(Into::into).collect())
    }

    /// Encode with matcher descriptors inlined where the matchers sit.
    ///
    /// This is the form a mock server consumes: every matcher becomes an
    /// object carrying `pact:matcher:type` and its example under `value`.
    ///
    /// # Errors
    ///
    /// Returns an [`EncodingError`] for malformed matchers anywhere in the tree.
    pub fn to_integration_json(&self) -> EncodingResult<Value> {
        self.integration_json_at(&JsonPath::root())
    }

    pub(crate) fn integration_json_at(&self, path: &JsonPath) -> EncodingResult<Value> {
        match self {
            Self::Json(value) => Ok(value.clone()),
            Self::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| item.integration_json_at(&path.index(i)))
                .collect::<EncodingResult<Vec<_>>>()
                .map(Value::Array),
            Self::Object(fields) => {
                let mut map = Map::new();
                for (key, value) in fields {
                    map.insert(key.clone(), value.integration_json_at(&path.field(key))?);
                }
                Ok(Value::Object(map))
            }
            Self::Matcher(matcher) => matcher.integration_json_at(path),
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Matcher> for Node {
    fn from(matcher: Matcher) -> Self {
        Self::Matcher(Box::new(matcher))
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Self::Json(Value::from(value))
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(items: Vec<T>) -> Self {
        Self::array(items)
    }
}

/// A rule describing what is acceptable at one place in a message.
#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    /// Exact equality with the value
    Literal(Node),
    /// Same type and shape as the value
    Like(Node),
    /// Array whose every element matches `template`
    EachLike {
        /// Element template
        template: Node,
        /// Minimum number of elements
        min: usize,
        /// Maximum number of elements, unbounded when absent
        max: Option<usize>,
    },
    /// Any integer
    Integer(i64),
    /// Any decimal number
    Decimal(f64),
    /// One string out of a fixed set
    OneOf {
        /// Accepted strings, kept sorted
        candidates: BTreeSet<String>,
        /// Example value; the first candidate when absent
        example: Option<String>,
    },
    /// String matching a regular expression
    Regex {
        /// Pattern the value must match
        pattern: String,
        /// Example value, must match `pattern`
        example: String,
    },
    /// String containing a substring
    Includes(String),
    /// Date/time in `format`, generated from `expression` at verification time
    DateTime {
        /// Generator expression, for example `today +1 day`
        expression: String,
        /// Date/time format pattern, for example `yyyy-MM-dd`
        format: String,
        /// Example value in `format`, written to the example document
        example: String,
    },
    /// Content whose MIME type is equivalent to the value
    ContentType(String),
}

/// Kind of a [`Matcher`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatcherKind {
    /// [`Matcher::Literal`]
    Literal,
    /// [`Matcher::Like`]
    Like,
    /// [`Matcher::EachLike`]
    EachLike,
    /// [`Matcher::Integer`]
    Integer,
    /// [`Matcher::Decimal`]
    Decimal,
    /// [`Matcher::OneOf`]
    OneOf,
    /// [`Matcher::Regex`]
    Regex,
    /// [`Matcher::Includes`]
    Includes,
    /// [`Matcher::DateTime`]
    DateTime,
    /// [`Matcher::ContentType`]
    ContentType,
}

impl MatcherKind {
    /// Value of `pact:matcher:type` for this kind.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Literal => "equality",
            Self::Like | Self::EachLike => "type",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::OneOf | Self::Regex => "regex",
            Self::Includes => "include",
            Self::DateTime => "datetime",
            Self::ContentType => "contentType",
        }
    }
}

impl fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Literal => "literal",
            Self::Like => "like",
            Self::EachLike => "eachLike",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::OneOf => "oneOf",
            Self::Regex => "regex",
            Self::Includes => "includes",
            Self::DateTime => "datetime",
            Self::ContentType => "contentType",
        };
        f.write_str(name)
    }
}

impl Matcher {
    /// Exact equality.
    pub fn literal(value: impl Into<Node>) -> Self {
        Self::Literal(value.into())
    }

    /// Type/shape match.
    pub fn like(value: impl Into<Node>) -> Self {
        Self::Like(value.into())
    }

    /// Array of at least one element matching `template`.
    pub fn each_like(template: impl Into<Node>) -> Self {
        Self::each_like_bounded(template, 1, None)
    }

    /// Array matching `template` with explicit cardinality.
    pub fn each_like_bounded(template: impl Into<Node>, min: usize, max: Option<usize>) -> Self {
        Self::EachLike {
            template: template.into(),
            min,
            max,
        }
    }

    /// Any integer, with an example.
    #[must_use]
    pub const fn integer(example: i64) -> Self {
        Self::Integer(example)
    }

    /// Any decimal, with an example.
    #[must_use]
    pub const fn decimal(example: f64) -> Self {
        Self::Decimal(example)
    }

    /// One of the candidates; the example is the first candidate in sorted order.
    pub fn one_of<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf {
            candidates: candidates.into_iter().map(Into::into).collect(),
            example: None,
        }
    }

    /// One of the candidates with an explicit example.
    ///
    /// An example outside the candidate set is accepted and joins the set.
    pub fn one_of_with_example<I, S>(candidates: I, example: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf {
            candidates: candidates.into_iter().map(Into::into).collect(),
            example: Some(example.into()),
        }
    }

    /// String matching `pattern`.
    pub fn regex(pattern: impl Into<String>, example: impl Into<String>) -> Self {
        Self::Regex {
            pattern: pattern.into(),
            example: example.into(),
        }
    }

    /// String containing `substring`.
    pub fn includes(substring: impl Into<String>) -> Self {
        Self::Includes(substring.into())
    }

    /// Date/time in `format`, generated from `expression`.
    ///
    /// The expression is only evaluated by the provider's verifier, so the
    /// example document carries `example`, which should itself be in `format`.
    pub fn datetime(
        expression: impl Into<String>,
        format: impl Into<String>,
        example: impl Into<String>,
    ) -> Self {
        Self::DateTime {
            expression: expression.into(),
            format: format.into(),
            example: example.into(),
        }
    }

    /// Content of the given MIME type.
    pub fn content_type(mime_type: impl Into<String>) -> Self {
        Self::ContentType(mime_type.into())
    }

    /// Kind of this matcher.
    #[must_use]
    pub const fn kind(&self) -> MatcherKind {
        match self {
            Self::Literal(_) => MatcherKind::Literal,
            Self::Like(_) => MatcherKind::Like,
            Self::EachLike { .. } => MatcherKind::EachLike,
            Self::Integer(_) => MatcherKind::Integer,
            Self::Decimal(_) => MatcherKind::Decimal,
            Self::OneOf { .. } => MatcherKind::OneOf,
            Self::Regex { .. } => MatcherKind::Regex,
            Self::Includes(_) => MatcherKind::Includes,
            Self::DateTime { .. } => MatcherKind::DateTime,
            Self::ContentType(_) => MatcherKind::ContentType,
        }
    }

    /// Encode this matcher alone in the inline form.
    ///
    /// ```
    /// use pactum_matchers::Matcher;
    /// use serde_json::json;
    ///
    /// let json = Matcher::one_of(["enabled", "disabled"]).to_integration_json().unwrap();
    /// assert_eq!(json, json!({
    ///     "pact:matcher:type": "regex",
    ///     "regex": "^(disabled|enabled)$",
    ///     "value": "disabled"
    /// }));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an [`EncodingError`] when the matcher or a nested one is malformed.
    pub fn to_integration_json(&self) -> EncodingResult<Value> {
        self.integration_json_at(&JsonPath::root())
    }

    fn integration_json_at(&self, path: &JsonPath) -> EncodingResult<Value> {
        self.validate(path)?;
        let value = match self {
            Self::Literal(node) | Self::Like(node) => node.integration_json_at(path)?,
            Self::EachLike { template, .. } => {
                let item = template.integration_json_at(&path.wildcard())?;
                Value::Array(vec![item; self.example_len()])
            }
            _ => self.leaf_example(),
        };
        let mut descriptor = self.descriptor(value);
        if let Some(generator) = self.generator() {
            descriptor.extend(generator);
        }
        Ok(Value::Object(descriptor))
    }

    /// Check the structural invariants of this matcher, not of nested nodes.
    pub(crate) fn validate(&self, path: &JsonPath) -> EncodingResult<()> {
        match self {
            Self::EachLike {
                min,
                max: Some(max),
                ..
            } if min > max => Err(EncodingError::InvalidCardinality {
                path: path.to_string(),
                min: *min,
                max: *max,
            }),
            Self::EachLike { min, .. } if *min > MAX_EACH_LIKE_MIN => {
                Err(EncodingError::ExampleTooLarge {
                    path: path.to_string(),
                    min: *min,
                    limit: MAX_EACH_LIKE_MIN,
                })
            }
            Self::OneOf { candidates, .. } if candidates.is_empty() => {
                Err(EncodingError::EmptyOneOf {
                    path: path.to_string(),
                })
            }
            Self::Decimal(value) if !value.is_finite() => Err(EncodingError::NonFiniteNumber {
                path: path.to_string(),
            }),
            Self::Regex { pattern, example } => {
                let re = Regex::new(pattern).map_err(|e| EncodingError::InvalidRegex {
                    path: path.to_string(),
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
                if re.is_match(example) {
                    Ok(())
                } else {
                    Err(EncodingError::ExampleMismatch {
                        path: path.to_string(),
                        pattern: pattern.clone(),
                        example: example.clone(),
                    })
                }
            }
            _ => Ok(()),
        }
    }

    /// Number of template copies in an `EachLike` example array.
    ///
    /// Only meaningful once `validate` has bounded `min`.
    pub(crate) fn example_len(&self) -> usize {
        match self {
            Self::EachLike { min, max, .. } => (*min).max(1).min(max.unwrap_or(usize::MAX)),
            _ => 1,
        }
    }

    /// Example value of a matcher without nested nodes.
    pub(crate) fn leaf_example(&self) -> Value {
        match self {
            Self::Integer(n) => Value::from(*n),
            Self::Decimal(d) => Number::from_f64(*d).map_or(Value::Null, Value::Number),
            Self::OneOf {
                candidates,
                example,
            } => Value::String(one_of_example(candidates, example.as_deref())),
            Self::Regex { example, .. } => Value::String(example.clone()),
            Self::Includes(substring) => Value::String(substring.clone()),
            Self::DateTime { example, .. } => Value::String(example.clone()),
            Self::ContentType(mime) => Value::String(mime.clone()),
            Self::Literal(_) | Self::Like(_) | Self::EachLike { .. } => Value::Null,
        }
    }

    /// Matching-rule descriptor with `value` set to `example`.
    pub(crate) fn descriptor(&self, example: Value) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            MATCHER_TYPE_KEY.to_string(),
            Value::from(self.kind().wire_name()),
        );
        match self {
            Self::EachLike { min, max, .. } => {
                map.insert("min".to_string(), Value::from(*min));
                if let Some(max) = max {
                    map.insert("max".to_string(), Value::from(*max));
                }
            }
            Self::OneOf {
                candidates,
                example,
            } => {
                map.insert(
                    "regex".to_string(),
                    Value::String(one_of_pattern(candidates, example.as_deref())),
                );
            }
            Self::Regex { pattern, .. } => {
                map.insert("regex".to_string(), Value::String(pattern.clone()));
            }
            Self::DateTime { format, .. } => {
                map.insert("format".to_string(), Value::String(format.clone()));
            }
            _ => {}
        }
        map.insert("value".to_string(), example);
        map
    }

    /// Generator descriptor for kinds whose value is produced at verification time.
    pub(crate) fn generator(&self) -> Option<Map<String, Value>> {
        match self {
            Self::DateTime {
                expression, format, ..
            } => {
                let mut map = Map::new();
                map.insert(GENERATOR_TYPE_KEY.to_string(), Value::from("DateTime"));
                map.insert("expression".to_string(), Value::String(expression.clone()));
                map.insert("format".to_string(), Value::String(format.clone()));
                Some(map)
            }
            _ => None,
        }
    }
}

/// Regex alternation over the sorted candidates plus an out-of-set example.
///
/// ```
/// use pactum_matchers::matcher::one_of_pattern;
/// use std::collections::BTreeSet;
///
/// let candidates: BTreeSet<String> = ["enabled", "disabled"].map(String::from).into();
/// assert_eq!(one_of_pattern(&candidates, Some("unknown")), "^(disabled|enabled|unknown)$");
/// ```
#[must_use]
pub fn one_of_pattern(candidates: &BTreeSet<String>, example: Option<&str>) -> String {
    let mut all: BTreeSet<&str> = candidates.iter().map(String::as_str).collect();
    if let Some(example) = example {
        all.insert(example);
    }
    let alternation: Vec<String> = all.into_iter().map(regex::escape).collect();
    format!("^({})$", alternation.join("|"))
}

fn one_of_example(candidates: &BTreeSet<String>, example: Option<&str>) -> String {
    example
        .or_else(|| candidates.first().map(String::as_str))
        .unwrap_or_default()
        .to_string()
}
