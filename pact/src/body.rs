//! Request and response bodies.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use pactum_matchers::{Encoded, Encoder, EncodingError, EncodingResult, Matcher, Node};
use serde_json::{Map, Value};

/// Body of a request or response.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// JSON document, optionally carrying matchers
    Json(Node),
    /// Plain text, compared verbatim
    Text(String),
    /// Raw bytes
    Binary {
        /// Payload
        content: Vec<u8>,
        /// MIME type, if known
        content_type: Option<String>,
    },
}

impl Body {
    /// Binary body with a known content type.
    #[must_use]
    pub fn binary(content: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        Self::Binary {
            content: content.into(),
            content_type: Some(content_type.into()),
        }
    }

    /// Encode the body into its example document plus rules rooted at `$`.
    ///
    /// Binary bodies with a content type become a base64 envelope checked by
    /// a `contentType` rule. Without a content type the bytes must be UTF-8
    /// and are written as text.
    ///
    /// # Errors
    ///
    /// Returns an [`EncodingError`] for malformed matchers or bytes that
    /// cannot be represented in the document.
    pub fn encode(&self, encoder: &Encoder) -> EncodingResult<Encoded> {
        match self {
            Self::Json(node) => encoder.encode(node),
            Self::Text(text) => Ok(Encoded {
                example: Value::String(text.clone()),
                ..Encoded::default()
            }),
            Self::Binary {
                content,
                content_type: Some(mime),
            } => {
                let rules = encoder.encode(&Node::from(Matcher::content_type(mime.as_str())))?;
                let mut envelope = Map::new();
                envelope.insert("content".to_string(), Value::String(STANDARD.encode(content)));
                envelope.insert("contentType".to_string(), Value::String(mime.clone()));
                envelope.insert("encoded".to_string(), Value::String("base64".to_string()));
                Ok(Encoded {
                    example: Value::Object(envelope),
                    ..rules
                })
            }
            Self::Binary {
                content,
                content_type: None,
            } => {
                let text = std::str::from_utf8(content).map_err(|e| {
                    EncodingError::non_serializable(format!(
                        "{} bytes without a content type are not valid UTF-8: {e}",
                        content.len()
                    ))
                })?;
                Ok(Encoded {
                    example: Value::String(text.to_string()),
                    ..Encoded::default()
                })
            }
        }
    }
}

impl From<Node> for Body {
    fn from(node: Node) -> Self {
        Self::Json(node)
    }
}

impl From<Matcher> for Body {
    fn from(matcher: Matcher) -> Self {
        Self::Json(Node::from(matcher))
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Self::Json(Node::from(value))
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}
