use crate::error::{Error, ErrorType, Result};
use hashbrown::HashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value as JSValue;
use std::fmt;

/// A GraphQL type reference, as used in variable definitions.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Type-References)
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Type {
    /// A reference to a named input type, which is a leaf node of a [Type].
    NamedType(&'static str),
    /// A list node wrapper for a Type.
    ListType(Box<Type>),
    /// A non-null node wrapper for a Type.
    NonNullType(Box<Type>),
}

impl Type {
    /// A non-null reference to a named type, e.g. `ID!`.
    pub fn named(name: &'static str) -> Type {
        Type::NonNullType(Box::new(Type::NamedType(name)))
    }

    /// A non-null list of this type, e.g. `[ID!]!`.
    pub fn list(self) -> Type {
        Type::NonNullType(Box::new(Type::ListType(Box::new(self))))
    }

    /// Removes exactly one non-null marker from the outside of this type, if it has one.
    pub fn nullable(self) -> Type {
        match self {
            Type::NonNullType(inner) => *inner,
            other => other,
        }
    }

    /// Write this type to a buffer implementing the [fmt::Write] trait.
    pub fn write_to_buffer(&self, buffer: &mut dyn fmt::Write) -> fmt::Result {
        match self {
            Type::NamedType(name) => buffer.write_str(name),
            Type::ListType(inner) => {
                buffer.write_str("[")?;
                inner.write_to_buffer(buffer)?;
                buffer.write_str("]")
            }
            Type::NonNullType(inner) => {
                inner.write_to_buffer(buffer)?;
                buffer.write_str("!")
            }
        }
    }
}

impl fmt::Display for Type {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to_buffer(f)
    }
}

/// Trait for values that can be passed as GraphQL variables.
///
/// The GraphQL type of a variable's definition is inferred from the Rust type of its value: a
/// plain value is non-null, an [`Option`] removes one non-null marker, and a [`Vec`] or slice
/// wraps its element type in a list.
///
/// Named input types implement this trait by returning [`Type::named`]:
///
/// ```
/// use graphql_shape::query::{InputType, Type};
///
/// #[derive(serde::Serialize)]
/// struct ReviewInput {
///     stars: i32,
/// }
///
/// impl InputType for ReviewInput {
///     fn input_type() -> Type {
///         Type::named("ReviewInput")
///     }
/// }
/// ```
pub trait InputType: Serialize {
    fn input_type() -> Type;
}

macro_rules! named_input_type {
    ($name:literal, $($ty:ty),*) => {
        $(
            impl InputType for $ty {
                #[inline]
                fn input_type() -> Type {
                    Type::named($name)
                }
            }
        )*
    };
}

named_input_type!("Int", i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
named_input_type!("Float", f32, f64);
named_input_type!("String", str, String);
named_input_type!("Boolean", bool);

impl<T: InputType> InputType for Option<T> {
    #[inline]
    fn input_type() -> Type {
        T::input_type().nullable()
    }
}

impl<T: InputType> InputType for Vec<T> {
    #[inline]
    fn input_type() -> Type {
        T::input_type().list()
    }
}

impl<T: InputType> InputType for [T] {
    #[inline]
    fn input_type() -> Type {
        T::input_type().list()
    }
}

impl<T: InputType + ?Sized> InputType for Box<T> {
    #[inline]
    fn input_type() -> Type {
        T::input_type()
    }
}

impl<'a, T: InputType + ?Sized> InputType for &'a T {
    #[inline]
    fn input_type() -> Type {
        T::input_type()
    }
}

/// A single variable: its name, its inferred type, and its value.
#[derive(Debug, PartialEq, Clone)]
pub struct VariableDefinition {
    pub name: String,
    pub of_type: Type,
    pub value: JSValue,
}

/// An insertion-ordered map of variables for an operation.
///
/// Variable definitions are emitted in insertion order. Inserting a name twice replaces the
/// earlier definition in place.
#[derive(Debug, Default, Clone)]
pub struct Variables {
    definitions: Vec<VariableDefinition>,
    index: HashMap<String, usize>,
}

impl Variables {
    /// Create an empty map of variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable, inferring its GraphQL type from the type of `value`.
    pub fn insert<T: InputType + ?Sized>(&mut self, name: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|err| {
            Error::new(
                format!("Variable ${} can't be serialized: {}", name, err),
                ErrorType::InvalidVariable,
            )
        })?;
        let definition = VariableDefinition {
            name: name.to_string(),
            of_type: T::input_type(),
            value,
        };
        match self.index.get(name) {
            Some(&idx) => self.definitions[idx] = definition,
            None => {
                self.index.insert(name.to_string(), self.definitions.len());
                self.definitions.push(definition);
            }
        }
        Ok(())
    }

    /// Add a variable and return the map, for chaining.
    pub fn with<T: InputType + ?Sized>(mut self, name: &str, value: &T) -> Result<Self> {
        self.insert(name, value)?;
        Ok(self)
    }

    /// Returns the value of the variable named `name`.
    pub fn get(&self, name: &str) -> Option<&JSValue> {
        self.index
            .get(name)
            .map(|&idx| &self.definitions[idx].value)
    }

    /// Checks whether no variables have been added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Iterate over the variable definitions in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, VariableDefinition> {
        self.definitions.iter()
    }
}

impl<'a> IntoIterator for &'a Variables {
    type Item = &'a VariableDefinition;
    type IntoIter = std::slice::Iter<'a, VariableDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Variables serialize to a JSON object of their values, in insertion order.
impl Serialize for Variables {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.definitions.len()))?;
        for definition in self.definitions.iter() {
            map.serialize_entry(&definition.name, &definition.value)?;
        }
        map.end()
    }
}
