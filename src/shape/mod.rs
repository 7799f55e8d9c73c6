//! # Shapes
//!
//! The `graphql_shape::shape` module contains the [Shape] trait, which describes a Rust type as a
//! GraphQL selection and as a destination for a decoded response at the same time.
//!
//! A shape's static structure is described by a [Kind], a closed set of variants: leaf scalars,
//! optional values, lists, and objects whose members are described by [Field]s. Objects are
//! typically declared using the [`shape!`](crate::shape!) macro, which resolves each member's
//! [FieldInfo] once per type.
//!
//! ```
//! use graphql_shape::shape;
//!
//! shape! {
//!     #[derive(Debug, Default)]
//!     pub struct Viewer {
//!         pub login: String,
//!         #[graphql("repositories(first: 10)")]
//!         pub repositories: Vec<Repository>,
//!     }
//! }
//!
//! shape! {
//!     #[derive(Debug, Default)]
//!     pub struct Repository {
//!         pub name: String,
//!         pub stargazer_count: Option<i64>,
//!     }
//! }
//! ```

mod macros;

use crate::error::{Error, ErrorType, Result};
use crate::mapping::{FieldInfo, Member};
use std::any::type_name;
use std::fmt;

/// Static description of how a shape maps to GraphQL.
#[derive(Debug, Clone, Copy)]
pub enum Kind {
    /// A leaf value carrying its GraphQL scalar name, which terminates the selection tree.
    Scalar(&'static str),
    /// A value that's absent until the decoder first writes through it.
    Optional(fn() -> Kind),
    /// A list of values of the element kind.
    List(fn() -> Kind),
    /// A record whose members are selections.
    Object(Object),
}

impl Kind {
    /// Strip all optional wrappers off this kind.
    #[inline]
    pub fn unwrap_optional(self) -> Kind {
        let mut kind = self;
        while let Kind::Optional(inner) = kind {
            kind = inner();
        }
        kind
    }

    /// Returns the object this kind describes, looking through optional wrappers.
    #[inline]
    pub fn object(self) -> Option<Object> {
        match self.unwrap_optional() {
            Kind::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the element kind if this is a list, looking through optional wrappers.
    #[inline]
    pub fn element(self) -> Option<Kind> {
        match self.unwrap_optional() {
            Kind::List(element) => Some(element()),
            _ => None,
        }
    }
}

/// Static description of an object shape and its members.
#[derive(Clone, Copy)]
pub struct Object {
    name: &'static str,
    fields: fn() -> &'static [Field],
}

impl Object {
    /// Create an object description from a unique type name and a function listing its fields.
    pub fn new(name: &'static str, fields: fn() -> &'static [Field]) -> Self {
        Object { name, fields }
    }

    /// Returns the unique name of the Rust type this object describes.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the members of this object in declaration order.
    #[inline]
    pub fn fields(&self) -> &'static [Field] {
        (self.fields)()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object").field("name", &self.name).finish()
    }
}

/// One member of an object shape: its GraphQL mapping and its own kind.
#[derive(Debug, Clone)]
pub struct Field {
    info: FieldInfo,
    kind: fn() -> Kind,
}

impl Field {
    /// Resolve a member's mapping and pair it with the member's kind.
    pub fn new(member: &Member, kind: fn() -> Kind) -> Self {
        Field {
            info: FieldInfo::new(member),
            kind,
        }
    }

    #[inline]
    pub fn info(&self) -> &FieldInfo {
        &self.info
    }

    #[inline]
    pub fn kind(&self) -> Kind {
        (self.kind)()
    }
}

/// A JSON leaf value that's about to be written into a shape.
///
/// Numbers are kept in their source representation so that every destination can parse them
/// into its own primitive type without losing precision.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Scalar<'a> {
    Bool(bool),
    Number(&'a str),
    String(&'a str),
}

impl<'a> Scalar<'a> {
    fn describe(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "boolean",
            Scalar::Number(_) => "number",
            Scalar::String(_) => "string",
        }
    }
}

/// Creates the error for a JSON value that can't be stored in the destination type `T`.
pub fn type_mismatch<T: ?Sized>(what: &str) -> Error {
    Error::new(
        format!("Cannot decode JSON {} into {}", what, type_name::<T>()),
        ErrorType::TypeMismatch,
    )
}

/// Trait for types that describe a GraphQL selection and receive its decoded response.
///
/// The static [`Shape::kind`] drives the document builder. The remaining methods are the hooks
/// that the decoder uses to mutate an instance in place; their default implementations reject
/// the operation, so that leaf types only implement [`Shape::write_scalar`], lists only
/// implement the list methods, and objects only implement [`Shape::member_mut`].
pub trait Shape {
    /// Describe this type's static structure.
    fn kind() -> Kind
    where
        Self: Sized;

    /// Returns the member at `index` in declaration order, materializing this value first if
    /// it's absent.
    fn member_mut(&mut self, index: usize) -> Option<&mut dyn Shape> {
        let _ = index;
        None
    }

    /// Returns the list element at `index`.
    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Shape> {
        let _ = index;
        None
    }

    /// Truncates this list to be empty, keeping its allocation.
    fn list_reset(&mut self) -> Result<()> {
        Err(type_mismatch::<Self>("array"))
    }

    /// Appends a zero-valued element to this list and returns its index.
    fn list_push(&mut self) -> Result<usize> {
        Err(type_mismatch::<Self>("array"))
    }

    /// Stores a JSON leaf value.
    fn write_scalar(&mut self, value: &Scalar<'_>) -> Result<()> {
        Err(type_mismatch::<Self>(value.describe()))
    }
}

impl Shape for String {
    #[inline]
    fn kind() -> Kind {
        Kind::Scalar("String")
    }

    fn write_scalar(&mut self, value: &Scalar<'_>) -> Result<()> {
        match value {
            Scalar::String(value) => {
                self.clear();
                self.push_str(value);
                Ok(())
            }
            _ => Err(type_mismatch::<Self>(value.describe())),
        }
    }
}

impl Shape for bool {
    #[inline]
    fn kind() -> Kind {
        Kind::Scalar("Boolean")
    }

    fn write_scalar(&mut self, value: &Scalar<'_>) -> Result<()> {
        match value {
            Scalar::Bool(value) => {
                *self = *value;
                Ok(())
            }
            _ => Err(type_mismatch::<Self>(value.describe())),
        }
    }
}

macro_rules! number_shape {
    ($name:literal, $($ty:ty),*) => {
        $(
            impl Shape for $ty {
                #[inline]
                fn kind() -> Kind {
                    Kind::Scalar($name)
                }

                fn write_scalar(&mut self, value: &Scalar<'_>) -> Result<()> {
                    match value {
                        Scalar::Number(number) => {
                            *self = lexical_core::parse::<$ty>(number.as_bytes()).map_err(|_| {
                                type_mismatch::<Self>(&format!("number {}", number))
                            })?;
                            Ok(())
                        }
                        _ => Err(type_mismatch::<Self>(value.describe())),
                    }
                }
            }
        )*
    };
}

number_shape!("Int", i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
number_shape!("Float", f32, f64);

impl<T: Shape + Default> Shape for Option<T> {
    #[inline]
    fn kind() -> Kind {
        Kind::Optional(T::kind)
    }

    fn member_mut(&mut self, index: usize) -> Option<&mut dyn Shape> {
        self.get_or_insert_with(T::default).member_mut(index)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Shape> {
        self.get_or_insert_with(T::default).element_mut(index)
    }

    fn list_reset(&mut self) -> Result<()> {
        self.get_or_insert_with(T::default).list_reset()
    }

    fn list_push(&mut self) -> Result<usize> {
        self.get_or_insert_with(T::default).list_push()
    }

    fn write_scalar(&mut self, value: &Scalar<'_>) -> Result<()> {
        self.get_or_insert_with(T::default).write_scalar(value)
    }
}

impl<T: Shape> Shape for Box<T> {
    #[inline]
    fn kind() -> Kind {
        T::kind()
    }

    fn member_mut(&mut self, index: usize) -> Option<&mut dyn Shape> {
        (**self).member_mut(index)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Shape> {
        (**self).element_mut(index)
    }

    fn list_reset(&mut self) -> Result<()> {
        (**self).list_reset()
    }

    fn list_push(&mut self) -> Result<usize> {
        (**self).list_push()
    }

    fn write_scalar(&mut self, value: &Scalar<'_>) -> Result<()> {
        (**self).write_scalar(value)
    }
}

impl<T: Shape + Default> Shape for Vec<T> {
    #[inline]
    fn kind() -> Kind {
        Kind::List(T::kind)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Shape> {
        self.get_mut(index).map(|element| element as &mut dyn Shape)
    }

    fn list_reset(&mut self) -> Result<()> {
        self.clear();
        Ok(())
    }

    fn list_push(&mut self) -> Result<usize> {
        self.push(T::default());
        Ok(self.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::{Kind, Scalar, Shape};
    use crate::error::ErrorType;

    crate::shape! {
        #[derive(Debug, Default, PartialEq)]
        struct Pet {
            name: String,
            #[graphql("... on Dog")]
            dog: Option<Dog>,
        }
    }

    crate::shape! {
        #[derive(Debug, Default, PartialEq)]
        struct Dog {
            barks: bool,
        }
    }

    #[test]
    fn kinds() {
        assert!(matches!(String::kind(), Kind::Scalar("String")));
        assert!(matches!(i32::kind(), Kind::Scalar("Int")));
        assert!(matches!(f64::kind(), Kind::Scalar("Float")));
        assert!(matches!(<Option<bool>>::kind(), Kind::Optional(_)));
        assert!(matches!(<Vec<u8>>::kind(), Kind::List(_)));
        assert!(matches!(<Box<String>>::kind(), Kind::Scalar("String")));
        assert!(matches!(
            <Option<Option<Vec<String>>>>::kind().element(),
            Some(Kind::Scalar("String"))
        ));
    }

    #[test]
    fn object_fields() {
        let object = Pet::kind().object().unwrap();
        assert!(object.name().ends_with("Pet"));
        let fields = object.fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].info().field_name(), "name");
        assert!(fields[1].info().is_inline_fragment());
        assert!(fields[1].kind().object().is_some());
        // Field metadata is resolved once per type.
        assert!(std::ptr::eq(object.fields(), Pet::kind().object().unwrap().fields()));
    }

    #[test]
    fn members_materialize_lazily() {
        let mut pet = Pet::default();
        let dog = pet.member_mut(1).unwrap();
        assert!(dog.member_mut(0).unwrap().write_scalar(&Scalar::Bool(true)).is_ok());
        assert_eq!(pet.dog, Some(Dog { barks: true }));
        assert!(pet.member_mut(2).is_none());
    }

    #[test]
    fn scalars() {
        let mut int = 0i32;
        int.write_scalar(&Scalar::Number("-12")).unwrap();
        assert_eq!(int, -12);
        let error = int.write_scalar(&Scalar::Number("1.5")).unwrap_err();
        assert_eq!(error.error_type(), ErrorType::TypeMismatch);
        let error = int.write_scalar(&Scalar::Number("3000000000")).unwrap_err();
        assert_eq!(error.error_type(), ErrorType::TypeMismatch);

        let mut float = 0f64;
        float.write_scalar(&Scalar::Number("1.5e2")).unwrap();
        assert_eq!(float, 150.0);

        let mut string = String::from("old");
        string.write_scalar(&Scalar::String("new")).unwrap();
        assert_eq!(string, "new");
        let error = string.write_scalar(&Scalar::Number("1")).unwrap_err();
        assert_eq!(error.error_type(), ErrorType::TypeMismatch);
        assert_eq!(
            error.message(),
            "Cannot decode JSON number into alloc::string::String"
        );
    }

    #[test]
    fn lists() {
        let mut list = vec![1u8, 2];
        list.list_reset().unwrap();
        assert!(list.is_empty());
        assert_eq!(list.list_push().unwrap(), 0);
        list.element_mut(0)
            .unwrap()
            .write_scalar(&Scalar::Number("7"))
            .unwrap();
        assert_eq!(list, vec![7]);

        let mut name = String::new();
        let error = name.list_reset().unwrap_err();
        assert_eq!(error.error_type(), ErrorType::TypeMismatch);
    }

    crate::shape! {
        /// A user's public profile.
        #[derive(Debug, Default, PartialEq, serde::Serialize)]
        pub struct Profile {
            /// The handle a user signs in with.
            #[serde(rename = "handle")]
            #[graphql("login")]
            pub name: String,
            #[graphql("count")]
            /// Number of followers.
            count: i32,
        }
    }

    #[test]
    fn field_attributes() {
        let fields = Profile::kind().object().unwrap().fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].info().field_name(), "login");
        assert_eq!(fields[1].info().field_name(), "count");

        let operation = crate::build_operation::<Profile>(
            crate::OperationKind::Query,
            &crate::Variables::new(),
        )
        .unwrap();
        assert_eq!(operation, "query{login,count}");

        let mut profile = Profile::default();
        crate::decode_into(br#"{"login":"octocat","count":2}"#, &mut profile).unwrap();
        assert_eq!(profile.name, "octocat");
        assert_eq!(
            serde_json::to_value(&profile).unwrap(),
            serde_json::json!({ "handle": "octocat", "count": 2 })
        );
    }
}
