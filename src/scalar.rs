//! # Scalars
//!
//! Scalar types that don't have a natural Rust counterpart.

use crate::error::Result;
use crate::query::{InputType, Type};
use crate::shape::{type_mismatch, Kind, Scalar, Shape};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The GraphQL `ID` type.
///
/// An `ID` is serialized like a `String`, but passing one as a variable declares the variable as
/// `ID!` instead of `String!`. When decoding, both JSON strings and JSON numbers are accepted.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ID(pub String);

impl ID {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ID {
    fn from(value: &str) -> Self {
        ID(value.to_string())
    }
}

impl From<String> for ID {
    fn from(value: String) -> Self {
        ID(value)
    }
}

impl fmt::Display for ID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl InputType for ID {
    #[inline]
    fn input_type() -> Type {
        Type::named("ID")
    }
}

impl Shape for ID {
    #[inline]
    fn kind() -> Kind {
        Kind::Scalar("ID")
    }

    fn write_scalar(&mut self, value: &Scalar<'_>) -> Result<()> {
        match value {
            Scalar::String(value) | Scalar::Number(value) => {
                self.0.clear();
                self.0.push_str(value);
                Ok(())
            }
            Scalar::Bool(_) => Err(type_mismatch::<Self>("boolean")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ID;
    use crate::error::ErrorType;
    use crate::query::InputType;
    use crate::shape::{Scalar, Shape};

    #[test]
    fn serializes_as_string() {
        assert_eq!(serde_json::to_string(&ID::from("123")).unwrap(), r#""123""#);
        let id: ID = serde_json::from_str(r#""abc""#).unwrap();
        assert_eq!(id.as_str(), "abc");
    }

    #[test]
    fn input_type() {
        assert_eq!(ID::input_type().to_string(), "ID!");
        assert_eq!(<Option<ID>>::input_type().to_string(), "ID");
    }

    #[test]
    fn decodes_strings_and_numbers() {
        let mut id = ID::default();
        id.write_scalar(&Scalar::String("abc")).unwrap();
        assert_eq!(id, ID::from("abc"));
        id.write_scalar(&Scalar::Number("42")).unwrap();
        assert_eq!(id, ID::from("42"));
        let error = id.write_scalar(&Scalar::Bool(true)).unwrap_err();
        assert_eq!(error.error_type(), ErrorType::TypeMismatch);
    }
}
