//! # Field Mapping
//!
//! The `graphql_shape::mapping` module decides how a single member of a shape maps to GraphQL.
//! The document builder and the decoder both go through [FieldInfo], so the name that's selected
//! in an operation is always the name that's expected in the response.
//!
//! A member is exactly one of:
//!
//! - an ordinary field, selected by its wire name, e.g. `name` or `rules(first: 100)`
//! - an inline member, whose own selections are spliced into the parent's selection set
//! - an inline fragment, e.g. `... on User`, which is one branch of a polymorphic selection

use heck::ToLowerCamelCase;
use std::borrow::Cow;

/// Static description of one member of a shape, as written down in its declaration.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Member {
    /// The Rust identifier of the member.
    pub ident: &'static str,
    /// An explicit GraphQL snippet for this member, if one was declared.
    pub tag: Option<&'static str>,
    /// Whether the member embeds another shape by value.
    pub embedded: bool,
}

impl Member {
    /// Describe a plain member without a tag.
    pub const fn new(ident: &'static str) -> Self {
        Member {
            ident,
            tag: None,
            embedded: false,
        }
    }

    /// Describe a member with an explicit GraphQL snippet.
    pub const fn tagged(ident: &'static str, tag: &'static str) -> Self {
        Member {
            ident,
            tag: Some(tag),
            embedded: false,
        }
    }

    /// Mark the member as embedding another shape by value.
    pub const fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }
}

/// Defines how a member of a shape maps to GraphQL, both when building operations and when
/// decoding responses.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct FieldInfo {
    inline: bool,
    graphql: Cow<'static, str>,
}

impl FieldInfo {
    /// Resolve the GraphQL mapping of a member.
    ///
    /// An embedded member without a tag is inline and has no GraphQL snippet of its own. Any
    /// other member uses its tag verbatim or, lacking one, its identifier in lower camel case.
    pub fn new(member: &Member) -> Self {
        let inline = member.embedded && member.tag.is_none();
        let graphql = match member.tag {
            _ if inline => Cow::Borrowed(""),
            Some(tag) => Cow::Borrowed(tag),
            None => Cow::Owned(wire_name(member.ident)),
        };
        FieldInfo { inline, graphql }
    }

    /// Returns the GraphQL snippet of this member, which satisfies either the `Field` or the
    /// `InlineFragment` production without its trailing selection set.
    ///
    /// For example this can return `"... on User"`, `"name"`, or `"rules(first:100)"`.
    #[inline]
    pub fn graphql(&self) -> &str {
        &self.graphql
    }

    /// Returns the name of the field in a response, or an empty string if this member is inline
    /// or an inline fragment. For an aliased field this is the alias.
    pub fn field_name(&self) -> &str {
        if self.inline || self.is_inline_fragment() {
            return "";
        }
        let graphql = self.graphql.trim();
        match graphql.find(&['(', ':', '@'][..]) {
            Some(idx) => graphql[..idx].trim(),
            None => graphql,
        }
    }

    /// Returns true if the member's own selections are spliced into its parent's selection set.
    #[inline]
    pub fn is_inline(&self) -> bool {
        self.inline
    }

    /// Returns true if the member's GraphQL snippet is an inline fragment, e.g. `... on User`.
    #[inline]
    pub fn is_inline_fragment(&self) -> bool {
        self.graphql.trim_start().starts_with("...")
    }

    /// Returns true if incoming JSON objects fan out into this member.
    #[inline]
    pub(crate) fn is_fan_out(&self) -> bool {
        self.inline || self.is_inline_fragment()
    }
}

/// Converts a Rust identifier to the default GraphQL field name.
fn wire_name(ident: &str) -> String {
    ident.trim_start_matches("r#").to_lower_camel_case()
}
