//! Test fixtures with sample data.

use pactum_contract::{Contract, InteractionBuilder, RequestSpec, ResponseSpec};
use pactum_matchers::{Matcher, Node};

/// `{"id": Integer(1), "name": Like("Test Object")}`.
#[must_use]
pub fn object_body() -> Node {
    Node::object([
        ("id", Node::from(Matcher::integer(1))),
        ("name", Matcher::like("Test Object").into()),
    ])
}

/// Nested `EachLike` arrays: animals with children.
#[must_use]
pub fn animals_body() -> Node {
    Node::from(Matcher::like(Node::object([(
        "animals",
        Matcher::each_like(Node::object([
            ("name", Node::from(Matcher::like("Bruno"))),
            ("children", Matcher::each_like_bounded("Mary", 0, None).into()),
        ])),
    )])))
}

/// Body mixing every common matcher kind under a top-level `Like`.
#[must_use]
pub fn bug_example_body() -> Node {
    Node::from(Matcher::like(Node::object([
        (
            "array_of_objects",
            Node::from(Matcher::each_like(Node::object([
                ("key_string", Node::from(Matcher::like("String value"))),
                ("key_int", Matcher::integer(123).into()),
                (
                    "key_for_matcher_array",
                    Matcher::each_like_bounded("matcher_array_value", 0, None).into(),
                ),
                (
                    "key_for_datetime_expression",
                    Matcher::datetime("today +1 day", "yyyy-MM-dd", "2026-10-20").into(),
                ),
            ]))),
        ),
        (
            "array_of_strings",
            Matcher::each_like_bounded("A string", 0, None).into(),
        ),
        ("includes_like", Matcher::includes("included").into()),
    ])))
}

/// Complete interaction `GET /objects/1` answered with [`object_body`].
#[must_use]
pub fn object_interaction(description: &str) -> InteractionBuilder {
    InteractionBuilder::upon_receiving(description)
        .given("an object exists")
        .and_then(|b| b.with_request(RequestSpec::get("/objects/1")))
        .and_then(|b| b.will_respond_with(ResponseSpec::new(200).with_body(object_body())))
        .expect("object interaction stages are in order")
}

/// Contract with two object interactions.
#[must_use]
pub fn sample_contract() -> Contract {
    let mut contract = Contract::new("sanity-consumer", "sanity-provider");
    for description in ["a request for an object", "a request for another object"] {
        let interaction = object_interaction(description)
            .build(contract.specification())
            .expect("object interaction encodes");
        contract.add_interaction(interaction);
    }
    contract
}
