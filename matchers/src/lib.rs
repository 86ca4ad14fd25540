//! Matching rules and generators for consumer-driven contracts.
//!
//! A [`Node`] tree mixes plain JSON with [`Matcher`]s at any depth. The
//! [`Encoder`] turns such a tree into the example document plus the
//! matching-rule and generator maps keyed by [`JsonPath`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod encoder;
pub mod error;
pub mod matcher;
pub mod path;
pub mod spec;

pub use encoder::{Encoded, Encoder};
pub use error::{EncodingError, EncodingResult};
pub use matcher::{MAX_EACH_LIKE_MIN, Matcher, MatcherKind, Node};
pub use path::JsonPath;
pub use spec::SpecVersion;
