//! Shared proptest generators.
//!
//! Every generated matcher tree is valid: `OneOf` sets are non-empty,
//! `EachLike` bounds are ordered, decimals are finite and regex examples
//! match their pattern.

use pactum_matchers::{Matcher, Node};
use pactum_verifier::VersionSelector;
use proptest::prelude::*;
use serde_json::Value;
use std::collections::BTreeMap;

/// Generate participant names.
pub fn service_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("sanity-consumer".to_string()),
        Just("sanity-provider".to_string()),
        Just("ios-app".to_string()),
        Just("order-service".to_string()),
        Just("billing-api".to_string()),
    ]
}

/// Generate object keys that render as `.name` in JSON-paths.
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,10}"
}

/// Generate non-empty `OneOf` candidate lists, possibly with duplicates.
pub fn candidate_set_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,8}", 1..6)
}

/// Generate plain JSON scalars.
pub fn json_scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::String),
    ]
}

/// Generate leaf matchers.
pub fn leaf_matcher_strategy() -> impl Strategy<Value = Matcher> {
    prop_oneof![
        any::<i32>().prop_map(|n| Matcher::integer(i64::from(n))),
        (-1000i32..1000).prop_map(|n| Matcher::decimal(f64::from(n) / 8.0)),
        candidate_set_strategy().prop_map(Matcher::one_of),
        "[a-z]{1,8}".prop_map(|example| Matcher::regex("^[a-z]+$", example)),
        "[a-z]{1,8}".prop_map(Matcher::includes),
        Just(Matcher::datetime("today +1 day", "yyyy-MM-dd", "2026-10-20")),
        Just(Matcher::content_type("application/json")),
    ]
}

/// Generate valid matcher trees up to three levels deep.
pub fn node_strategy() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        json_scalar_strategy().prop_map(Node::Json),
        leaf_matcher_strategy().prop_map(Node::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Node::Array),
            prop::collection::btree_map(field_name_strategy(), inner.clone(), 0..4)
                .prop_map(|fields: BTreeMap<String, Node>| Node::Object(fields)),
            inner.clone().prop_map(|node| Node::from(Matcher::like(node))),
            inner.clone().prop_map(|node| Node::from(Matcher::literal(node))),
            (inner, 0usize..3, proptest::option::of(0usize..3)).prop_map(
                |(template, min, extra)| {
                    Node::from(Matcher::each_like_bounded(
                        template,
                        min,
                        extra.map(|e| min + e),
                    ))
                }
            ),
        ]
    })
}

/// Generate consumer version selectors.
pub fn version_selector_strategy() -> impl Strategy<Value = VersionSelector> {
    (
        proptest::option::of("[a-z]{3,10}"),
        proptest::option::of("(main|develop|feature/[a-z]{3,8})"),
        proptest::option::of("(production|staging|test)"),
        proptest::option::of(service_name_strategy()),
        proptest::option::of(any::<bool>()),
        proptest::option::of(any::<bool>()),
        any::<bool>(),
    )
        .prop_map(
            |(tag, branch, environment, consumer, deployed, main_branch, latest)| VersionSelector {
                tag,
                branch,
                environment,
                consumer,
                deployed,
                main_branch,
                latest,
                ..VersionSelector::default()
            },
        )
}
