//! # Document Builder
//!
//! The `graphql_shape::query` module turns a [Shape](crate::shape::Shape) and a set of
//! [Variables] into the text of a GraphQL operation. The text is a pure function of the shape's
//! static structure and the variables' types; it's built fresh for every request.
//!
//! - [build_operation] walks the shape and emits the operation keyword, the variable
//!   definitions, and the selection set.
//! - [Variables] holds variable values in insertion order and infers each variable's GraphQL
//!   [Type] from the Rust type of its value using the [InputType] trait.

mod builder;
mod variables;

pub use builder::{build_operation, OperationKind};
pub use variables::{InputType, Type, VariableDefinition, Variables};
