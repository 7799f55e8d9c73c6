use super::variables::Variables;
use crate::error::{Error, ErrorType, Result};
use crate::shape::{Kind, Shape};
use std::fmt;

/// The kind of operation a document is built for.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Operations)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    /// Returns the keyword that starts an operation of this kind.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
        }
    }
}

impl fmt::Display for OperationKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the text of an operation selecting the shape `T`.
///
/// The output is compact: selections are separated by `,` and no whitespace is emitted other
/// than what field tags contain themselves.
///
/// ```
/// use graphql_shape::{build_operation, shape, OperationKind, Variables};
///
/// shape! {
///     #[derive(Default)]
///     struct Query {
///         #[graphql("user(id: $id)")]
///         user: Option<User>,
///     }
/// }
///
/// shape! {
///     #[derive(Default)]
///     struct User {
///         name: String,
///     }
/// }
///
/// let variables = Variables::new().with("id", "4").unwrap();
/// let text = build_operation::<Query>(OperationKind::Query, &variables).unwrap();
/// assert_eq!(text, "query($id:String!){user(id: $id){name}}");
/// ```
pub fn build_operation<T: Shape>(kind: OperationKind, variables: &Variables) -> Result<String> {
    let mut builder = QueryBuilder::default();
    builder.operation(kind, T::kind(), variables)?;
    tracing::debug!(operation = %builder.buffer, "built GraphQL operation");
    Ok(builder.buffer)
}

#[derive(Default)]
pub(crate) struct QueryBuilder {
    buffer: String,
    comma: bool,
    ancestors: Vec<&'static str>,
}

impl QueryBuilder {
    fn operation(&mut self, kind: OperationKind, root: Kind, variables: &Variables) -> Result<()> {
        self.buffer.push_str(kind.as_str());
        self.variable_definitions(variables);
        if self.selection_set(root, false)? == 0 {
            return Err(Error::new(
                format!("Invalid {} shape: the root selection set is empty", kind),
                ErrorType::InvalidShape,
            ));
        }
        Ok(())
    }

    /// [Reference](https://spec.graphql.org/October2021/#VariableDefinitions)
    fn variable_definitions(&mut self, variables: &Variables) {
        if variables.is_empty() {
            return;
        }
        self.buffer.push('(');
        for (idx, definition) in variables.iter().enumerate() {
            if idx > 0 {
                self.buffer.push(',');
            }
            self.buffer.push('$');
            self.buffer.push_str(&definition.name);
            self.buffer.push(':');
            self.buffer.push_str(&definition.of_type.to_string());
        }
        self.buffer.push(')');
    }

    /// Render the selection set of `kind` and return how many selections it contributed.
    ///
    /// Inline members don't open a selection set of their own; their selections count towards
    /// the enclosing one.
    fn selection_set(&mut self, kind: Kind, inline: bool) -> Result<usize> {
        match kind {
            Kind::Scalar(_) => Ok(0),
            Kind::Optional(inner) => self.selection_set(inner(), inline),
            // JSON arrays can only be decoded into lists, never into a parent's members.
            Kind::List(element) => self.selection_set(element(), false),
            Kind::Object(object) => {
                if self.ancestors.contains(&object.name()) {
                    return Err(Error::new(
                        format!("Shape {} selects itself recursively", object.name()),
                        ErrorType::InvalidShape,
                    ));
                }
                self.ancestors.push(object.name());
                if !inline {
                    self.buffer.push('{');
                    self.comma = false;
                }
                let mut count = 0;
                for field in object.fields() {
                    let info = field.info();
                    if info.is_inline() {
                        count += self.selection_set(field.kind(), true)?;
                    } else {
                        if self.comma {
                            self.buffer.push(',');
                        }
                        self.buffer.push_str(info.graphql());
                        self.selection_set(field.kind(), false)?;
                        self.comma = true;
                        count += 1;
                    }
                }
                if !inline {
                    self.buffer.push('}');
                }
                self.ancestors.pop();
                Ok(count)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{build_operation, OperationKind, QueryBuilder};
    use crate::error::ErrorType;
    use crate::query::Variables;
    use crate::scalar::ID;
    use crate::shape::{Kind, Shape};

    fn selection_set(kind: Kind) -> String {
        let mut builder = QueryBuilder::default();
        builder.selection_set(kind, false).unwrap();
        builder.buffer
    }

    crate::shape! {
        #[derive(Default)]
        struct Named {
            field1: String,
        }
    }

    crate::shape! {
        #[derive(Default)]
        struct Embedding {
            field2: String,
            #[graphql(embed)]
            named: Named,
        }
    }

    crate::shape! {
        #[derive(Default)]
        struct TaggedEmbedding {
            #[graphql(embed, "named")]
            named: Named,
            field2: String,
        }
    }

    #[test]
    fn embedded_members() {
        assert_eq!(selection_set(Embedding::kind()), "{field2,field1}");
        assert_eq!(selection_set(TaggedEmbedding::kind()), "{named{field1},field2}");
    }

    crate::shape! {
        #[derive(Default)]
        struct Rules {
            id: String,
        }
    }

    crate::shape! {
        #[derive(Default)]
        struct Ruleset {
            id: String,
            name: String,
            #[graphql("rules(first:100)")]
            rules: Rules,
        }
    }

    crate::shape! {
        #[derive(Default)]
        struct Rulesets {
            rulesets: Vec<Ruleset>,
        }
    }

    #[test]
    fn nested_selections() {
        assert_eq!(
            selection_set(Rulesets::kind()),
            "{rulesets{id,name,rules(first:100){id}}}"
        );
    }

    crate::shape! {
        #[derive(Default)]
        struct Empty {}
    }

    crate::shape! {
        #[derive(Default)]
        struct WithEmpty {
            #[graphql(embed)]
            empty: Empty,
            id: String,
        }
    }

    crate::shape! {
        #[derive(Default)]
        struct OnlyEmpty {
            #[graphql(embed)]
            empty: Empty,
        }
    }

    #[test]
    fn empty_selections() {
        assert_eq!(selection_set(WithEmpty::kind()), "{id}");

        let error = build_operation::<Empty>(OperationKind::Query, &Variables::new()).unwrap_err();
        assert_eq!(error.error_type(), ErrorType::InvalidShape);
        let error =
            build_operation::<OnlyEmpty>(OperationKind::Query, &Variables::new()).unwrap_err();
        assert_eq!(error.error_type(), ErrorType::InvalidShape);
        let error = build_operation::<i32>(OperationKind::Query, &Variables::new()).unwrap_err();
        assert_eq!(error.error_type(), ErrorType::InvalidShape);
        assert_eq!(
            error.message(),
            "Invalid query shape: the root selection set is empty"
        );
    }

    crate::shape! {
        #[derive(Default)]
        struct Person {
            age: String,
        }
    }

    crate::shape! {
        #[derive(Default)]
        struct Animal {
            age: String,
            legs: i32,
            empty: Empty,
        }
    }

    crate::shape! {
        #[derive(Default)]
        struct Search {
            #[graphql("search(text: $text)")]
            results: Vec<SearchResult>,
        }
    }

    crate::shape! {
        #[derive(Default)]
        struct SearchResult {
            #[graphql("__typename")]
            typename: String,
            #[graphql("... on Person")]
            person: Option<Person>,
            #[graphql("... on Animal")]
            animal: Option<Animal>,
        }
    }

    #[test]
    fn inline_fragments() {
        let variables = Variables::new().with("text", "rex").unwrap();
        let text = build_operation::<Search>(OperationKind::Query, &variables).unwrap();
        assert_eq!(
            text,
            "query($text:String!){search(text: $text){__typename,... on Person{age},... on Animal{age,legs,empty{}}}}"
        );
    }

    crate::shape! {
        #[derive(Default)]
        struct AddStar {
            #[graphql("addStar(input: {starrableId: $id})")]
            add_star: StarResult,
        }
    }

    crate::shape! {
        #[derive(Default)]
        struct StarResult {
            client_mutation_id: Option<String>,
        }
    }

    #[test]
    fn variable_definitions() {
        let variables = Variables::new()
            .with("id", &ID::from("MDEwOlJlcG9zaXRvcnk"))
            .unwrap()
            .with("count", &Some(3))
            .unwrap()
            .with("ids", &vec![ID::from("a")])
            .unwrap();
        let text = build_operation::<AddStar>(OperationKind::Mutation, &variables).unwrap();
        assert_eq!(
            text,
            "mutation($id:ID!,$count:Int,$ids:[ID!]!){addStar(input: {starrableId: $id}){clientMutationId}}"
        );
    }

    crate::shape! {
        #[derive(Default)]
        struct Tree {
            name: String,
            children: Vec<Tree>,
        }
    }

    #[test]
    fn recursive_selections() {
        let error = build_operation::<Tree>(OperationKind::Query, &Variables::new()).unwrap_err();
        assert_eq!(error.error_type(), ErrorType::InvalidShape);
    }

    #[test]
    fn list_root() {
        let text = build_operation::<Option<Vec<Named>>>(OperationKind::Query, &Variables::new())
            .unwrap();
        assert_eq!(text, "query{field1}");
    }
}
