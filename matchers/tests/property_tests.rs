//! Property-based tests for the matcher encoder.
//!
//! Tests validate:
//! - Encoding determinism
//! - OneOf pattern construction
//! - EachLike cardinality and path wildcarding

use pactum_matchers::{
    Encoder, EncodingError, JsonPath, MAX_EACH_LIKE_MIN, Matcher, Node, SpecVersion,
};
use proptest::prelude::*;
use regex::Regex;
use test_utils::{candidate_set_strategy, field_name_strategy, node_strategy};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Encoding the same tree twice yields byte-identical JSON.
    #[test]
    fn prop_encoding_is_deterministic(node in node_strategy()) {
        let encoder = Encoder::new(SpecVersion::V4);
        let first = encoder.encode(&node).unwrap();
        let second = encoder.encode(&node).unwrap();

        prop_assert_eq!(
            serde_json::to_string(&first.example).unwrap(),
            serde_json::to_string(&second.example).unwrap()
        );
        prop_assert_eq!(
            serde_json::to_string(&first.matching_rules).unwrap(),
            serde_json::to_string(&second.matching_rules).unwrap()
        );
        prop_assert_eq!(first.generators, second.generators);
    }

    /// The example document never contains matcher descriptors.
    #[test]
    fn prop_example_is_plain_json(node in node_strategy()) {
        let encoded = Encoder::new(SpecVersion::V4).encode(&node).unwrap();
        let rendered = serde_json::to_string(&encoded.example).unwrap();
        prop_assert!(!rendered.contains("pact:matcher:type"));
    }

    /// Every rule key is rooted at `$` and never names an EachLike index.
    #[test]
    fn prop_rule_paths_rooted(node in node_strategy()) {
        let encoded = Encoder::new(SpecVersion::V4).encode(&node).unwrap();
        for (path, rule) in &encoded.matching_rules {
            prop_assert!(path.starts_with('$'));
            prop_assert!(rule.get("pact:matcher:type").is_some());
        }
    }

    /// The OneOf example is always accepted by its own pattern, and the
    /// pattern does not depend on insertion order.
    #[test]
    fn prop_one_of_pattern_accepts_example(candidates in candidate_set_strategy()) {
        let forward = Matcher::one_of(candidates.clone()).to_integration_json().unwrap();
        let mut reversed = candidates.clone();
        reversed.reverse();
        let backward = Matcher::one_of(reversed).to_integration_json().unwrap();

        prop_assert_eq!(&forward, &backward);

        let pattern = forward["regex"].as_str().unwrap();
        let example = forward["value"].as_str().unwrap();
        let re = Regex::new(pattern).unwrap();
        prop_assert!(re.is_match(example));
        for candidate in &candidates {
            prop_assert!(re.is_match(candidate));
        }
    }

    /// `EachLike` with `min == 0` never fails to encode.
    #[test]
    fn prop_each_like_min_zero_encodes(name in field_name_strategy(), max in proptest::option::of(0usize..5)) {
        let body = Node::object([(name.clone(), Matcher::each_like_bounded("x", 0, max))]);
        let encoded = Encoder::new(SpecVersion::V3).encode(&body).unwrap();
        let key = JsonPath::root().field(&name).to_string();
        prop_assert_eq!(&encoded.matching_rules[&key]["min"], &serde_json::json!(0));
    }

    /// `min > max` is always an encoding error.
    #[test]
    fn prop_inverted_bounds_rejected(max in 0usize..10, extra in 1usize..10) {
        let body = Node::from(Matcher::each_like_bounded("x", max + extra, Some(max)));
        let result = Encoder::new(SpecVersion::V3).encode(&body);
        let is_cardinality_error = matches!(result, Err(EncodingError::InvalidCardinality { .. }));
        prop_assert!(is_cardinality_error);
    }

    /// Minimums past the example limit are rejected before any copy is made.
    #[test]
    fn prop_oversized_min_rejected(extra in 1usize..usize::MAX / 2) {
        let min = MAX_EACH_LIKE_MIN + extra;
        let body = Node::object([("items", Matcher::each_like_bounded("x", min, None))]);
        let result = Encoder::new(SpecVersion::V3).encode(&body);
        let is_size_error = matches!(result, Err(EncodingError::ExampleTooLarge { .. }));
        prop_assert!(is_size_error);
    }
}

#[test]
fn test_animals_with_children_paths() {
    let body = Node::from(Matcher::like(Node::object([(
        "animals",
        Matcher::each_like(Node::object([(
            "children",
            Matcher::each_like_bounded("Mary", 0, None),
        )])),
    )])));

    let encoded = Encoder::new(SpecVersion::V4).encode(&body).unwrap();
    assert!(encoded.matching_rules.contains_key("$.animals"));
    assert!(encoded.matching_rules.contains_key("$.animals[*].children"));
    assert!(!encoded.matching_rules.keys().any(|k| k.contains("[0]")));
}

#[test]
fn test_bug_example_paths() {
    let body = test_utils::fixtures::bug_example_body();
    let encoded = Encoder::new(SpecVersion::V4).encode(&body).unwrap();

    for expected in [
        "$.array_of_objects",
        "$.array_of_objects[*].key_int",
        "$.array_of_objects[*].key_string",
        "$.array_of_objects[*].key_for_matcher_array",
        "$.array_of_strings",
        "$.includes_like",
    ] {
        assert!(
            encoded.matching_rules.contains_key(expected),
            "missing rule for {expected}"
        );
    }
    assert!(
        encoded
            .generators
            .contains_key("$.array_of_objects[*].key_for_datetime_expression")
    );
}
