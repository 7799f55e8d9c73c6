//! `graphql_shape`
//! =========
//!
//! _Typed GraphQL operations from a single declaration._
//!
//! The **`graphql_shape`** library follows two goals:
//!
//! - To derive the text of a GraphQL operation from a plain Rust type
//! - To decode the response into that same type without an intermediate JSON tree
//!
//! A shape is declared once using the [`shape!`] macro. Its members are selections, tagged members
//! carry arguments and directives, and optional members tagged as inline fragments (`... on User`)
//! form the branches of a polymorphic selection. The document builder in the [query] module
//! renders the shape and its [Variables] as an operation, and the decoder in the [json] module
//! streams the response's JSON tokens into an instance of the shape, writing each value into every
//! member that requested it.
//!
//! ```
//! use graphql_shape::{build_operation, decode_into, shape, OperationKind, Variables};
//!
//! shape! {
//!     #[derive(Debug, Default)]
//!     struct Search {
//!         #[graphql("search(text: $text)")]
//!         results: Vec<SearchResult>,
//!     }
//! }
//!
//! shape! {
//!     #[derive(Debug, Default)]
//!     struct SearchResult {
//!         #[graphql("... on User")]
//!         user: Option<User>,
//!         #[graphql("... on Organization")]
//!         organization: Option<Organization>,
//!     }
//! }
//!
//! shape! {
//!     #[derive(Debug, Default)]
//!     struct User {
//!         login: String,
//!     }
//! }
//!
//! shape! {
//!     #[derive(Debug, Default)]
//!     struct Organization {
//!         login: String,
//!         member_count: i32,
//!     }
//! }
//!
//! let variables = Variables::new().with("text", "octo").unwrap();
//! let operation = build_operation::<Search>(OperationKind::Query, &variables).unwrap();
//! assert_eq!(
//!     operation,
//!     "query($text:String!){search(text: $text){... on User{login},... on Organization{login,memberCount}}}"
//! );
//!
//! let mut search = Search::default();
//! decode_into(br#"{"search":[{"login":"octocat"},{"memberCount":3}]}"#, &mut search).unwrap();
//! assert_eq!(search.results[0].user.as_ref().unwrap().login, "octocat");
//! assert!(search.results[1].user.is_none());
//! assert_eq!(search.results[1].organization.as_ref().unwrap().member_count, 3);
//! ```
//!
//! [A good place to start learning more about this crate is the `shape` module...](shape)

pub mod error;
pub mod json;
pub mod mapping;
pub mod query;
pub mod scalar;
pub mod shape;

pub use error::{Error, ErrorType, Result};
pub use json::decode_into;
pub use query::{build_operation, OperationKind, Variables};
pub use scalar::ID;
pub use shape::Shape;
