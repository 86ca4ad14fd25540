//! Matching-rule encoder.
//!
//! Walks a [`Node`] tree depth first and splits it into the example document
//! plus matching-rule and generator descriptors keyed by JSON-path.

use crate::error::{EncodingError, EncodingResult};
use crate::matcher::{Matcher, Node};
use crate::path::JsonPath;
use crate::spec::SpecVersion;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::trace;

/// Output of encoding one node tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Encoded {
    /// The tree with every matcher replaced by its example
    pub example: Value,
    /// Matching-rule descriptors by path
    pub matching_rules: BTreeMap<String, Value>,
    /// Generator descriptors by path
    pub generators: BTreeMap<String, Value>,
}

impl Encoded {
    /// Whether the tree contained no matchers at all.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.matching_rules.is_empty() && self.generators.is_empty()
    }
}

/// Encodes node trees for a given specification version.
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder {
    spec: SpecVersion,
}

impl Encoder {
    /// Create an encoder for the given specification version.
    #[must_use]
    pub const fn new(spec: SpecVersion) -> Self {
        Self { spec }
    }

    /// Specification version matchers are checked against.
    #[must_use]
    pub const fn spec(&self) -> SpecVersion {
        self.spec
    }

    /// Encode a body rooted at `$`.
    ///
    /// ```
    /// use pactum_matchers::{Encoder, Matcher, Node, SpecVersion};
    /// use serde_json::json;
    ///
    /// let body = Node::object([
    ///     ("id", Node::from(Matcher::integer(1))),
    ///     ("name", Matcher::like("Test Object").into()),
    /// ]);
    /// let encoded = Encoder::new(SpecVersion::V3).encode(&body).unwrap();
    /// assert_eq!(encoded.example, json!({"id": 1, "name": "Test Object"}));
    /// assert!(encoded.matching_rules.contains_key("$.name"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an [`EncodingError`] for malformed matchers or kinds the
    /// specification version cannot express.
    pub fn encode(&self, node: &Node) -> EncodingResult<Encoded> {
        self.encode_at(&JsonPath::root(), node)
    }

    /// Encode a tree rooted at an arbitrary path, such as a header name.
    ///
    /// # Errors
    ///
    /// Same as [`Encoder::encode`].
    pub fn encode_at(&self, root: &JsonPath, node: &Node) -> EncodingResult<Encoded> {
        let mut out = Encoded::default();
        let example = self.walk(node, root, &mut out)?;
        Ok(Encoded { example, ..out })
    }

    fn walk(&self, node: &Node, path: &JsonPath, out: &mut Encoded) -> EncodingResult<Value> {
        match node {
            Node::Json(value) => Ok(value.clone()),
            Node::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| self.walk(item, &path.index(i), out))
                .collect::<EncodingResult<Vec<_>>>()
                .map(Value::Array),
            Node::Object(fields) => {
                let mut map = Map::new();
                for (key, value) in fields {
                    map.insert(key.clone(), self.walk(value, &path.field(key), out)?);
                }
                Ok(Value::Object(map))
            }
            Node::Matcher(matcher) => self.walk_matcher(matcher, path, out),
        }
    }

    fn walk_matcher(
        &self,
        matcher: &Matcher,
        path: &JsonPath,
        out: &mut Encoded,
    ) -> EncodingResult<Value> {
        let kind = matcher.kind();
        if !self.spec.supports(kind) {
            return Err(EncodingError::UnsupportedMatcher {
                path: path.to_string(),
                kind,
                required: SpecVersion::introducing(kind),
                spec: self.spec,
            });
        }
        matcher.validate(path)?;

        let example = match matcher {
            Matcher::Literal(node) | Matcher::Like(node) => self.walk(node, path, out)?,
            Matcher::EachLike { template, .. } => {
                let item = self.walk(template, &path.wildcard(), out)?;
                Value::Array(vec![item; matcher.example_len()])
            }
            _ => matcher.leaf_example(),
        };

        trace!(path = %path, kind = %kind, "encoded matcher");

        // A matcher nested directly under another at the same path is more
        // specific and was recorded first.
        out.matching_rules
            .entry(path.to_string())
            .or_insert_with(|| Value::Object(matcher.descriptor(example.clone())));
        if let Some(generator) = matcher.generator() {
            out.generators
                .entry(path.to_string())
                .or_insert(Value::Object(generator));
        }

        Ok(example)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode(node: &Node) -> Encoded {
        Encoder::new(SpecVersion::V4).encode(node).unwrap()
    }

    #[test]
    fn test_plain_json_has_no_rules() {
        let encoded = encode(&Node::from(json!({"a": [1, 2], "b": null})));
        assert_eq!(encoded.example, json!({"a": [1, 2], "b": null}));
        assert!(encoded.is_plain());
    }

    #[test]
    fn test_id_and_name() {
        let body = Node::object([
            ("id", Node::from(Matcher::integer(1))),
            ("name", Matcher::like("Test Object").into()),
        ]);
        let encoded = encode(&body);

        assert_eq!(encoded.example, json!({"id": 1, "name": "Test Object"}));
        assert_eq!(
            encoded.matching_rules,
            BTreeMap::from([
                (
                    "$.id".to_string(),
                    json!({"pact:matcher:type": "integer", "value": 1})
                ),
                (
                    "$.name".to_string(),
                    json!({"pact:matcher:type": "type", "value": "Test Object"})
                ),
            ])
        );
        assert!(encoded.generators.is_empty());
    }

    #[test]
    fn test_each_like_paths_are_wildcarded() {
        let body = Node::object([(
            "animals",
            Matcher::each_like(Node::object([(
                "children",
                Matcher::each_like_bounded("Mary", 0, None),
            )])),
        )]);
        let encoded = encode(&body);

        let keys: Vec<&str> = encoded.matching_rules.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["$.animals", "$.animals[*].children"]);
        assert_eq!(
            encoded.example,
            json!({"animals": [{"children": ["Mary"]}]})
        );
        assert_eq!(
            encoded.matching_rules["$.animals[*].children"],
            json!({"pact:matcher:type": "type", "min": 0, "value": ["Mary"]})
        );
    }

    #[test]
    fn test_like_wrapping_object() {
        let body = Node::from(Matcher::like(Node::object([
            ("array_of_strings", Matcher::each_like_bounded("A string", 0, None)),
            ("includes_like", Matcher::includes("included")),
            ("key_int", Matcher::integer(123)),
        ])));
        let encoded = encode(&body);

        let keys: Vec<&str> = encoded.matching_rules.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["$", "$.array_of_strings", "$.includes_like", "$.key_int"]
        );
        assert_eq!(
            encoded.matching_rules["$"]["value"],
            json!({"array_of_strings": ["A string"], "includes_like": "included", "key_int": 123})
        );
    }

    #[test]
    fn test_inner_matcher_wins_at_same_path() {
        let encoded = encode(&Node::from(Matcher::like(Matcher::integer(7))));
        assert_eq!(
            encoded.matching_rules["$"],
            json!({"pact:matcher:type": "integer", "value": 7})
        );
    }

    #[test]
    fn test_datetime_emits_generator() {
        let body = Node::object([(
            "date",
            Matcher::datetime("today +1 day", "yyyy-MM-dd", "2026-10-20"),
        )]);
        let encoded = encode(&body);

        assert_eq!(encoded.example, json!({"date": "2026-10-20"}));
        assert_eq!(
            encoded.matching_rules["$.date"],
            json!({"pact:matcher:type": "datetime", "format": "yyyy-MM-dd", "value": "2026-10-20"})
        );
        assert_eq!(
            encoded.generators["$.date"],
            json!({
                "pact:generator:type": "DateTime",
                "expression": "today +1 day",
                "format": "yyyy-MM-dd"
            })
        );
    }

    #[test]
    fn test_plain_array_indices() {
        let body = Node::array([Node::from("x"), Matcher::integer(2).into()]);
        let encoded = encode(&body);
        assert!(encoded.matching_rules.contains_key("$[1]"));
    }

    #[test]
    fn test_spec_version_gate() {
        let body = Node::object([("id", Matcher::integer(1))]);
        let err = Encoder::new(SpecVersion::V2).encode(&body).unwrap_err();
        assert!(matches!(
            err,
            EncodingError::UnsupportedMatcher {
                required: SpecVersion::V3,
                ..
            }
        ));

        let mime = Node::from(Matcher::content_type("image/png"));
        assert!(Encoder::new(SpecVersion::V2).encode(&mime).is_err());
        assert!(Encoder::new(SpecVersion::V3).encode(&mime).is_ok());
    }

    #[test]
    fn test_encode_at_named_root() {
        let encoded = Encoder::default()
            .encode_at(
                &JsonPath::named("Content-Type"),
                &Matcher::regex("application/json.*", "application/json").into(),
            )
            .unwrap();
        assert_eq!(encoded.example, json!("application/json"));
        assert!(encoded.matching_rules.contains_key("Content-Type"));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let body = Node::object([
            ("status", Node::from(Matcher::one_of(["on", "off", "broken"]))),
            ("tags", Matcher::each_like("t").into()),
            ("when", Matcher::datetime("now", "HH:mm", "12:00").into()),
        ]);
        let first = serde_json::to_string(&encode(&body).matching_rules).unwrap();
        let second = serde_json::to_string(&encode(&body).matching_rules).unwrap();
        assert_eq!(first, second);
    }
}
