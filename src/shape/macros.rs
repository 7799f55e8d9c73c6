/// Declare a struct and implement [`Shape`](crate::shape::Shape) for it.
///
/// Every field becomes a selection. Doc comments and other attributes, like `#[serde(...)]`, are
/// kept on the struct's fields. A field may also carry one `#[graphql(...)]` attribute, which is
/// removed from the struct:
///
/// - `#[graphql("rules(first: 100)")]` uses the snippet verbatim instead of the field's name in
///   lower camel case, which allows arguments and directives to be appended.
/// - `#[graphql("... on User")]` declares the field as an inline fragment, which is one branch
///   of a polymorphic selection and is usually wrapped in an [`Option`].
/// - `#[graphql(embed)]` embeds another shape by value; its selections are spliced into this
///   struct's selection set.
/// - `#[graphql(embed, "base")]` embeds another shape but selects it as an ordinary field.
///
/// Generic structs aren't supported, since field metadata is cached per declared type.
#[macro_export]
macro_rules! shape {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$($field_attr:tt)*])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $crate::__shape_struct! {
            head [$(#[$meta])* $vis struct $name]
            done []
            fields [$({ [$([$($field_attr)*])*] [] $field_vis $field : $ty })*]
        }

        impl $crate::shape::Shape for $name {
            fn kind() -> $crate::shape::Kind {
                fn fields() -> &'static [$crate::shape::Field] {
                    static FIELDS: ::std::sync::OnceLock<::std::vec::Vec<$crate::shape::Field>> =
                        ::std::sync::OnceLock::new();
                    FIELDS.get_or_init(|| {
                        ::std::vec![
                            $(
                                $crate::shape::Field::new(
                                    &$crate::__shape_member!(
                                        $field ; $([$($field_attr)*])*
                                    ),
                                    <$ty as $crate::shape::Shape>::kind,
                                ),
                            )*
                        ]
                    })
                }
                $crate::shape::Kind::Object($crate::shape::Object::new(
                    ::std::any::type_name::<Self>(),
                    fields,
                ))
            }

            #[allow(unused_mut, unused_assignments, unused_variables)]
            fn member_mut(&mut self, index: usize) -> ::std::option::Option<&mut dyn $crate::shape::Shape> {
                let mut current = 0usize;
                $(
                    if index == current {
                        return ::std::option::Option::Some(&mut self.$field);
                    }
                    current += 1;
                )*
                ::std::option::Option::None
            }
        }
    };
}

/// Emits a struct declared with [`shape!`], without its `#[graphql(...)]` attributes.
///
/// Each field is `{ [pending attributes] [kept attributes] field tokens }`.
#[doc(hidden)]
#[macro_export]
macro_rules! __shape_struct {
    (
        head [$($head:tt)*]
        done [$($done:tt)*]
        fields [{ [[graphql $($skip:tt)*] $($pending:tt)*] [$($kept:tt)*] $($field:tt)* } $($rest:tt)*]
    ) => {
        $crate::__shape_struct! {
            head [$($head)*]
            done [$($done)*]
            fields [{ [$($pending)*] [$($kept)*] $($field)* } $($rest)*]
        }
    };
    (
        head [$($head:tt)*]
        done [$($done:tt)*]
        fields [{ [[$($attr:tt)*] $($pending:tt)*] [$($kept:tt)*] $($field:tt)* } $($rest:tt)*]
    ) => {
        $crate::__shape_struct! {
            head [$($head)*]
            done [$($done)*]
            fields [{ [$($pending)*] [$($kept)* #[$($attr)*]] $($field)* } $($rest)*]
        }
    };
    (
        head [$($head:tt)*]
        done [$($done:tt)*]
        fields [{ [] [$($kept:tt)*] $($field:tt)* } $($rest:tt)*]
    ) => {
        $crate::__shape_struct! {
            head [$($head)*]
            done [$($done)* $($kept)* $($field)*,]
            fields [$($rest)*]
        }
    };
    (head [$($head:tt)*] done [$($done:tt)*] fields []) => {
        $($head)* {
            $($done)*
        }
    };
}

/// Resolves the [`Member`](crate::mapping::Member) of a field from its first `#[graphql(...)]`
/// attribute.
#[doc(hidden)]
#[macro_export]
macro_rules! __shape_member {
    ($field:ident ; [graphql($($args:tt)*)] $($rest:tt)*) => {
        $crate::__shape_member!(@args ::std::stringify!($field), $($args)*)
    };
    ($field:ident ; [$($attr:tt)*] $($rest:tt)*) => {
        $crate::__shape_member!($field ; $($rest)*)
    };
    ($field:ident ;) => {
        $crate::mapping::Member::new(::std::stringify!($field))
    };
    (@args $ident:expr, embed) => {
        $crate::mapping::Member::new($ident).embedded()
    };
    (@args $ident:expr, embed, $tag:literal) => {
        $crate::mapping::Member::tagged($ident, $tag).embedded()
    };
    (@args $ident:expr, $tag:literal) => {
        $crate::mapping::Member::tagged($ident, $tag)
    };
}
