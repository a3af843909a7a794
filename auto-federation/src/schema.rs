//! Canonical type model extracted from an apollo-compiler [`Schema`].
//!
//! Only the parts of the schema that end up in the federated SDL are kept: object, input object,
//! scalar, enum and union definitions, in the order the schema declares them. Built-in types
//! (standard scalars, introspection types) and interfaces are skipped.

use apollo_compiler::ast;
use apollo_compiler::schema::ComponentName;
use apollo_compiler::schema::DirectiveList;
use apollo_compiler::schema::EnumValueDefinition;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::FieldDefinition;
use apollo_compiler::schema::InputValueDefinition;
use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::Schema;

/// Names of the root operation types, as recognised by auto synthesis.
pub(crate) const ROOT_OPERATION_TYPE_NAMES: [&str; 3] = ["Query", "Mutation", "Subscription"];

pub(crate) fn is_root_operation_type_name(name: &str) -> bool {
    ROOT_OPERATION_TYPE_NAMES.contains(&name)
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TypeDescriptor {
    pub(crate) name: Name,
    pub(crate) directives: Vec<Node<ast::Directive>>,
    pub(crate) body: TypeBody,
}

/// Kind-specific content of a [`TypeDescriptor`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TypeBody {
    Object(Vec<FieldDescriptor>),
    Input(Vec<FieldDescriptor>),
    Scalar,
    Enum(Vec<Node<EnumValueDefinition>>),
    Union(Vec<ComponentName>),
}

impl TypeBody {
    /// The SDL keyword declaring this kind of type.
    pub(crate) fn keyword(&self) -> &'static str {
        match self {
            TypeBody::Object(_) => "type",
            TypeBody::Input(_) => "input",
            TypeBody::Scalar => "scalar",
            TypeBody::Enum(_) => "enum",
            TypeBody::Union(_) => "union",
        }
    }

    pub(crate) fn fields(&self) -> &[FieldDescriptor] {
        match self {
            TypeBody::Object(fields) | TypeBody::Input(fields) => fields,
            TypeBody::Scalar | TypeBody::Enum(_) | TypeBody::Union(_) => &[],
        }
    }
}

/// A field, input field or argument. Arguments never carry arguments of their own.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FieldDescriptor {
    pub(crate) name: Name,
    pub(crate) ty: ast::Type,
    pub(crate) default_value: Option<Node<ast::Value>>,
    pub(crate) arguments: Vec<FieldDescriptor>,
}

impl FieldDescriptor {
    fn from_field(field: &FieldDefinition) -> Self {
        Self {
            name: field.name.clone(),
            ty: field.ty.clone(),
            default_value: None,
            arguments: field
                .arguments
                .iter()
                .map(|argument| Self::from_input_value(argument))
                .collect(),
        }
    }

    fn from_input_value(value: &InputValueDefinition) -> Self {
        Self {
            name: value.name.clone(),
            ty: (*value.ty).clone(),
            default_value: value.default_value.clone(),
            arguments: Vec::new(),
        }
    }
}

fn directive_nodes(directives: &DirectiveList) -> Vec<Node<ast::Directive>> {
    directives
        .iter()
        .map(|directive| directive.node.clone())
        .collect()
}

fn extract_type(name: &Name, ty: &ExtendedType) -> Option<TypeDescriptor> {
    let body = match ty {
        ExtendedType::Object(object) => TypeBody::Object(
            object
                .fields
                .values()
                .map(|field| FieldDescriptor::from_field(field))
                .collect(),
        ),
        ExtendedType::InputObject(input) => TypeBody::Input(
            input
                .fields
                .values()
                .map(|field| FieldDescriptor::from_input_value(field))
                .collect(),
        ),
        ExtendedType::Scalar(_) => TypeBody::Scalar,
        ExtendedType::Enum(enum_type) => TypeBody::Enum(
            enum_type
                .values
                .values()
                .map(|value| value.node.clone())
                .collect(),
        ),
        ExtendedType::Union(union_type) => {
            TypeBody::Union(union_type.members.iter().cloned().collect())
        }
        ExtendedType::Interface(_) => return None,
    };
    Some(TypeDescriptor {
        name: name.clone(),
        directives: directive_nodes(ty.directives()),
        body,
    })
}

/// Extracts the type descriptors of `schema`, in declaration order.
pub(crate) fn extract_types(schema: &Schema) -> Vec<TypeDescriptor> {
    schema
        .types
        .iter()
        .filter(|(_, ty)| !ty.is_built_in())
        .filter_map(|(name, ty)| extract_type(name, ty))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(sdl: &str) -> Vec<TypeDescriptor> {
        let schema = Schema::parse(sdl, "schema.graphql").unwrap();
        extract_types(&schema)
    }

    #[test]
    fn keeps_declaration_order_and_skips_built_ins() {
        let types = extract(
            r#"
            type Post { pid: ID! }
            type Query { topPosts(count: Int): [Post] }
            interface Node { id: ID! }
            scalar Date
            union Result = Post
            enum Color { RED GREEN }
            input PostInput { title: String! }
            "#,
        );
        let names: Vec<_> = types.iter().map(|ty| ty.name.as_str()).collect();
        assert_eq!(
            names,
            ["Post", "Query", "Date", "Result", "Color", "PostInput"]
        );
        let keywords: Vec<_> = types.iter().map(|ty| ty.body.keyword()).collect();
        assert_eq!(keywords, ["type", "type", "scalar", "union", "enum", "input"]);
    }

    #[test]
    fn captures_fields_arguments_and_defaults() {
        let types = extract(
            r#"
            type Query { users(first: Int = 10, filter: Filter): [User!]! }
            type User { id: ID! }
            input Filter { name: String = "bob" }
            "#,
        );
        let query = &types[0];
        let users = &query.body.fields()[0];
        assert_eq!(users.name.as_str(), "users");
        assert_eq!(users.ty.to_string(), "[User!]!");
        assert_eq!(users.default_value, None);
        assert_eq!(users.arguments.len(), 2);
        assert_eq!(users.arguments[0].name.as_str(), "first");
        assert_eq!(users.arguments[0].ty.to_string(), "Int");
        assert_eq!(
            users.arguments[0]
                .default_value
                .as_ref()
                .map(|value| value.to_string()),
            Some("10".to_owned())
        );
        assert!(users.arguments[0].arguments.is_empty());

        let filter = &types[2];
        assert!(matches!(filter.body, TypeBody::Input(_)));
        assert_eq!(
            filter.body.fields()[0]
                .default_value
                .as_ref()
                .map(|value| value.to_string()),
            Some(r#""bob""#.to_owned())
        );
    }

    #[test]
    fn captures_type_directives_enum_values_and_union_members() {
        let types = extract(
            r#"
            directive @tag(name: String!) on OBJECT | ENUM
            type Query { a: A }
            type A @tag(name: "a") { id: ID! }
            type B { id: ID! }
            union AB = A | B
            enum Size @tag(name: "size") { SMALL LARGE }
            "#,
        );
        assert_eq!(types[1].directives.len(), 1);
        assert_eq!(types[1].directives[0].to_string(), r#"@tag(name: "a")"#);

        let TypeBody::Union(members) = &types[3].body else {
            panic!("expected a union");
        };
        let members: Vec<_> = members.iter().map(|member| member.name.as_str()).collect();
        assert_eq!(members, ["A", "B"]);

        let TypeBody::Enum(values) = &types[4].body else {
            panic!("expected an enum");
        };
        let values: Vec<_> = values.iter().map(|value| value.value.as_str()).collect();
        assert_eq!(values, ["SMALL", "LARGE"]);
        assert_eq!(types[4].directives.len(), 1);
    }
}
