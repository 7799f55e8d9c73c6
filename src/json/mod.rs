//! # JSON Decoding
//!
//! The `graphql_shape::json` module decodes GraphQL responses into [Shape](crate::shape::Shape)s.
//!
//! - [decode_into] reads a JSON object as a forward-only token stream and writes every value into
//!   the members the shape declares for it. One JSON value may be written into several members
//!   at once when a shape contains inline members or inline fragments, which is how a single
//!   response object satisfies every branch of a polymorphic selection that it matches.
//! - [Request] and [Response] are the JSON bodies exchanged with a GraphQL server, and
//!   [ErrorItem] is an error reported by the server.
//!
//! Sending requests is left to the caller's HTTP client of choice.

mod decoder;
mod envelope;
mod lexer;
mod receivers;
mod tokens;

pub use decoder::decode_into;
pub use envelope::{ErrorItem, Request, Response};
