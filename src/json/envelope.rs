use super::decoder::decode_into;
use crate::error::{Error, ErrorType, Result};
use crate::query::{build_operation, OperationKind, Variables};
use crate::shape::Shape;
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use serde_json::{Map, Value as JSValue};
use std::fmt;

/// The body of a GraphQL request as it's sent over HTTP.
///
/// [Reference](https://graphql.github.io/graphql-over-http/draft/#sec-Request-Parameters)
#[derive(Debug, Clone, Serialize)]
pub struct Request<'a> {
    pub query: String,
    #[serde(skip_serializing_if = "no_variables")]
    pub variables: &'a Variables,
}

fn no_variables(variables: &&Variables) -> bool {
    variables.is_empty()
}

impl<'a> Request<'a> {
    /// Build the operation text for the shape `T` and pair it with its variables.
    pub fn new<T: Shape>(kind: OperationKind, variables: &'a Variables) -> Result<Self> {
        Ok(Request {
            query: build_operation::<T>(kind, variables)?,
            variables,
        })
    }

    /// Serialize the request to a JSON body.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|err| {
            Error::new(
                format!("Request can't be serialized to JSON: {}", err),
                ErrorType::InvalidVariable,
            )
        })
    }
}

/// The body of a GraphQL response, with its `data` left undecoded.
///
/// A body must be a JSON object; its properties other than `data` and `errors` are ignored.
#[derive(Debug)]
pub struct Response {
    data: Option<Box<RawValue>>,
    errors: Option<Vec<ErrorItem>>,
}

impl Response {
    /// Parse a response body.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|err| {
            Error::new(
                format!("Response body isn't a GraphQL response: {}", err),
                ErrorType::MalformedJson,
            )
        })
    }

    /// Returns the raw JSON source of the `data` property, if it's present and not `null`.
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref().map(RawValue::get)
    }

    /// Returns the errors the server reported.
    pub fn errors(&self) -> &[ErrorItem] {
        self.errors.as_deref().unwrap_or(&[])
    }

    /// Decode the response's `data` into a shape and surface the server's errors.
    ///
    /// Any error that's returned carries the operation text and the server's error items. If
    /// decoding succeeds but the server reported errors, an [`ErrorType::Response`] error is
    /// returned and the shape keeps whatever partial data the server sent.
    pub fn decode_into<T: Shape>(&self, shape: &mut T, operation: &str) -> Result<()> {
        if let Some(data) = self.data() {
            decode_into(data.as_bytes(), shape).map_err(|err| {
                err.with_operation(operation)
                    .with_errors(self.errors().to_vec())
            })?;
        }
        let errors = self.errors();
        if errors.is_empty() {
            return Ok(());
        }
        tracing::debug!(errors = errors.len(), "GraphQL response contains errors");
        let messages: Vec<&str> = errors.iter().map(ErrorItem::message).collect();
        Err(Error::new(
            format!("Response with errors: {}", messages.join("; ")),
            ErrorType::Response,
        )
        .with_operation(operation)
        .with_errors(errors.to_vec()))
    }
}

/// An error reported by the server in the `errors` list of a response.
///
/// Every property of the error is kept verbatim, which gives access to `path`, `locations`, and
/// `extensions`. An error item serializes back into exactly those properties.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Errors)
#[derive(Debug, PartialEq, Clone, Default)]
pub struct ErrorItem {
    message: String,
    raw: Map<String, JSValue>,
}

impl ErrorItem {
    /// Returns the error's `message`, or an empty string if the server sent none.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns every property of the error as the server sent it.
    #[inline]
    pub fn raw(&self) -> &Map<String, JSValue> {
        &self.raw
    }

    /// Returns a single property of the error, e.g. `extensions`.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&JSValue> {
        self.raw.get(key)
    }
}

impl From<Map<String, JSValue>> for ErrorItem {
    fn from(raw: Map<String, JSValue>) -> Self {
        let message = match raw.get("message") {
            Some(JSValue::String(message)) => message.clone(),
            _ => String::new(),
        };
        ErrorItem { message, raw }
    }
}

impl Serialize for ErrorItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ErrorItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Option::<Map<String, JSValue>>::deserialize(deserializer)?;
        Ok(raw.map(ErrorItem::from).unwrap_or_default())
    }
}

impl<'de> Deserialize<'de> for Response {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(ResponseVisitor)
    }
}

struct ResponseVisitor;

impl<'de> Visitor<'de> for ResponseVisitor {
    type Value = Response;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a GraphQL response object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Response, A::Error> {
        let mut response = Response {
            data: None,
            errors: None,
        };
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "data" => response.data = map.next_value()?,
                "errors" => response.errors = map.next_value()?,
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(response)
    }
}
